use super::{GroupRunner, NIL_ID};
use crate::api_client::ApiRequest;
use crate::expect::Expect;
use crate::fixture::Fixture;
use serde_json::json;

pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    for (path, status) in [
        ("/health", "healthy"),
        ("/health/live", "alive"),
        ("/health/ready", "ready"),
    ] {
        runner
            .expect(
                ApiRequest::get(path),
                &format!("GET {} -> 200 {}", path, status),
                Expect::status(200).and(Expect::equals("/status", json!(status))),
            )
            .await;
    }

    runner
        .expect(
            ApiRequest::get("/rules").query("q", "mulligan").query("limit", 5),
            "GET /rules?q=mulligan -> 200",
            Expect::status(200),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/rules")
                .query("q", "commander")
                .query("meta", "true"),
            "GET /rules?meta=true -> 200 with meta",
            // Only object bodies are required to carry the meta block
            Expect::status(200).and(Expect::satisfies(|r| {
                !r.body.is_object() || r.has_key("meta")
            })),
        )
        .await;

    runner
        .expect(
            ApiRequest::get("/sets").query("limit", 5),
            "GET /sets -> 200",
            Expect::status(200).and(Expect::has_key("data")),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/sets").query("code", "LEA"),
            "GET /sets?code=LEA -> 200",
            Expect::status(200),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/sets").query("q", "alpha"),
            "GET /sets?q=alpha -> 200",
            Expect::status(200),
        )
        .await;

    runner
        .expect(
            ApiRequest::get(format!("/market/card/{}", fixture.cards.sol_ring)),
            "GET /market/card/:id -> 200",
            Expect::status(200).and(Expect::has_key("name")),
        )
        .await;
    runner
        .expect(
            ApiRequest::get(format!("/market/card/{}", NIL_ID)),
            "GET /market/card with an unknown card -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/market/movers"),
            "GET /market/movers -> 200",
            Expect::status(200),
        )
        .await;

    runner
        .expect(ApiRequest::get("/"), "GET / -> 200", Expect::status(200))
        .await;
}
