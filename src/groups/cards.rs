use super::GroupRunner;
use crate::api_client::{ApiRequest, ApiResponse};
use crate::expect::{Expect, Step};
use serde_json::json;

/// Card catalogue search; needs no fixture state.
pub async fn run(runner: &mut GroupRunner<'_>) {
    runner
        .run(
            Step::new(ApiRequest::get("/cards").query("name", "Sol Ring")).check_with(
                "GET /cards?name=Sol Ring -> 200 with results",
                Expect::status(200).and(Expect::len("/data", 1..=usize::MAX)),
                data_count,
            ),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get("/cards").query("name", "XyzNaoExiste999")).check_with(
                "GET /cards with an unknown name -> 200 with 0 results",
                Expect::status(200).and(Expect::len("/data", 0..=0)),
                data_count,
            ),
        )
        .await;
    runner
        .run(
            Step::new(
                ApiRequest::get("/cards")
                    .query("name", "Forest")
                    .query("limit", 2)
                    .query("page", 1),
            )
            .check_with(
                "GET /cards with limit=2 -> at most 2 results",
                Expect::status(200).and(Expect::len("/data", 0..=2)),
                data_count,
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/cards").query("set", "lea").query("limit", 5),
            "GET /cards?set=lea -> 200",
            Expect::status(200),
        )
        .await;

    runner
        .expect(
            ApiRequest::get("/cards/printings").query("name", "Sol Ring"),
            "GET /cards/printings?name=Sol Ring -> 200",
            Expect::status(200).and(Expect::at_least("/total_returned", 1)),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/cards/printings"),
            "GET /cards/printings without name -> 400",
            Expect::status(400),
        )
        .await;

    runner
        .expect(
            ApiRequest::post("/cards/resolve").json(json!({ "name": "Sol Ring" })),
            "POST /cards/resolve -> 200",
            Expect::status(200).and(Expect::at_least("/total_returned", 1)),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/cards/resolve").json(json!({ "name": "XyzAbsolutelyNotACard999" })),
            "POST /cards/resolve with an unknown name -> 404",
            Expect::status(404),
        )
        .await;
}

fn data_count(response: &ApiResponse) -> String {
    format!(
        "Got {}, count={}",
        response.status,
        response.array_at("/data").len()
    )
}
