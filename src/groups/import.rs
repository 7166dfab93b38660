use super::GroupRunner;
use crate::api_client::ApiRequest;
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use serde_json::json;

pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let token = &fixture.user_a.token;

    runner
        .run(
            Step::new(ApiRequest::post("/import").bearer(token).json(json!({
                "name": fixture.stamped("Imported Deck"),
                "format": "commander",
                "list": "1x Sol Ring\n1x Lightning Bolt\n10x Forest",
            })))
            .check(
                "POST /import text list -> 200 with deck",
                Expect::status(200).and(Expect::has_key("deck")),
            )
            .check_with(
                "Import resolved the cards",
                Expect::at_least("/cards_imported", 2),
                |r| format!("cards_imported={}", r.body["cards_imported"]),
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/import")
                .bearer(token)
                .json(json!({ "format": "commander", "list": "1x Sol Ring" })),
            "POST /import without name -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/import")
                .bearer(token)
                .json(json!({ "name": "No List", "format": "commander" })),
            "POST /import without list -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/import").json(json!({
                "name": "Hijacked",
                "format": "commander",
                "list": "1x Sol Ring",
            })),
            "POST /import without token -> 401",
            Expect::status(401),
        )
        .await;

    runner
        .run(
            Step::new(ApiRequest::post("/import/validate").bearer(token).json(json!({
                "format": "commander",
                "list": "1x Sol Ring\n1x XyzInexistentCard999",
            })))
            .check("POST /import/validate -> 200", Expect::status(200))
            .check_with(
                "Validate reports found and unknown lines",
                Expect::len("/found_cards", 1..=usize::MAX)
                    .and(Expect::len("/not_found_lines", 1..=usize::MAX)),
                |r| {
                    format!(
                        "found={}, not_found={}",
                        r.array_at("/found_cards").len(),
                        r.array_at("/not_found_lines").len()
                    )
                },
            ),
        )
        .await;

    runner
        .expect(
            ApiRequest::post("/import/to-deck").bearer(token).json(json!({
                "deck_id": fixture.deck_a_id,
                "list": "5x Forest",
            })),
            "POST /import/to-deck -> 200",
            Expect::status(200),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/import/to-deck")
                .bearer(&fixture.user_b.token)
                .json(json!({ "deck_id": fixture.deck_a_id, "list": "1x Sol Ring" })),
            "POST /import/to-deck into another user's deck -> 403/404",
            Expect::status_in(&[403, 404]),
        )
        .await;
}
