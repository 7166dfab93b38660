use super::{GroupRunner, NIL_ID, short};
use crate::api_client::ApiRequest;
use crate::expect::Expect;
use crate::fixture::Fixture;
use serde_json::json;

/// Runs after every other deck consumer, on a throwaway deck.
pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let owner = &fixture.user_a.token;

    let created = runner
        .send(ApiRequest::post("/decks").bearer(owner).json(json!({
            "name": fixture.stamped("To Delete"),
            "format": "standard",
        })))
        .await;
    let deck_id = created.str_at("/id").unwrap_or_default().to_string();
    tracing::debug!(deck = %short(&deck_id), "Created deck for deletion");
    let path = format!("/decks/{}", deck_id);

    if !deck_id.is_empty() {
        runner
            .expect(
                ApiRequest::delete(&path).bearer(&fixture.user_b.token),
                "DELETE /decks/:id by another user -> 404",
                Expect::status(404),
            )
            .await;
    }

    runner
        .expect(
            ApiRequest::delete(&path),
            "DELETE /decks/:id without token -> 401",
            Expect::status(401),
        )
        .await;

    if !deck_id.is_empty() {
        runner
            .expect(
                ApiRequest::delete(&path).bearer(owner),
                "DELETE /decks/:id own deck -> 204",
                Expect::status(204),
            )
            .await;
        runner
            .expect(
                ApiRequest::delete(&path).bearer(owner),
                "DELETE an already deleted deck -> 404",
                Expect::status(404),
            )
            .await;
    }

    runner
        .expect(
            ApiRequest::delete(format!("/decks/{}", NIL_ID)).bearer(owner),
            "DELETE an unknown deck -> 404",
            Expect::status(404),
        )
        .await;
}
