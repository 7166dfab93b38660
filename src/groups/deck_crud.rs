use super::{GroupRunner, NIL_ID, short};
use crate::api_client::ApiRequest;
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use serde_json::json;

/// Creates deck A (user A) and the public deck B with two cards (user B),
/// then exercises listing, detail, ownership and update rules.
pub async fn run(runner: &mut GroupRunner<'_>, fixture: &mut Fixture) {
    let user_a = fixture.user_a.token.clone();
    let user_b = fixture.user_b.token.clone();

    let response = runner
        .run(
            Step::new(ApiRequest::post("/decks").bearer(&user_a).json(json!({
                "name": fixture.stamped("Test Deck A"),
                "format": "commander",
                "description": "E2E test deck",
            })))
            .check(
                "POST /decks creates a deck -> 200/201",
                Expect::status_in(&[200, 201]).and(Expect::has_key("id")),
            ),
        )
        .await;
    fixture.deck_a_id = response.str_at("/id").unwrap_or_default().to_string();

    let response = runner
        .run(
            Step::new(ApiRequest::post("/decks").bearer(&user_b).json(json!({
                "name": fixture.stamped("Test Deck B"),
                "format": "commander",
                "description": "Public deck B",
                "cards": [
                    { "card_id": fixture.cards.sol_ring, "quantity": 1 },
                    { "card_id": fixture.cards.lightning_bolt, "quantity": 1 },
                ],
            })))
            .check(
                "POST /decks creates a deck with cards -> 200/201",
                Expect::status_in(&[200, 201]).and(Expect::has_key("id")),
            ),
        )
        .await;
    fixture.deck_b_id = response.str_at("/id").unwrap_or_default().to_string();

    // Creation does not necessarily honour `is_public`
    if !fixture.deck_b_id.is_empty() {
        runner
            .send(
                ApiRequest::put(format!("/decks/{}", fixture.deck_b_id))
                    .bearer(&user_b)
                    .json(json!({ "is_public": true })),
            )
            .await;
    }

    runner
        .run(
            Step::new(ApiRequest::post("/decks").bearer(&user_a).json(json!({})))
                .check("POST /decks without name/format -> 400", Expect::status(400)),
        )
        .await;
    runner
        .run(
            Step::new(
                ApiRequest::post("/decks")
                    .bearer(&user_a)
                    .json(json!({ "name": "No format" })),
            )
            .check("POST /decks without format -> 400", Expect::status(400)),
        )
        .await;
    runner
        .run(
            Step::new(
                ApiRequest::post("/decks").json(json!({ "name": "No auth", "format": "commander" })),
            )
            .check("POST /decks without token -> 401", Expect::status(401)),
        )
        .await;

    let deck_a = fixture.deck_a_id.clone();
    let listed = deck_a.clone();
    runner
        .run(
            Step::new(ApiRequest::get("/decks").bearer(&user_a))
                .check_with(
                    "GET /decks lists my decks -> 200",
                    Expect::status(200).and(Expect::IsArray),
                    |r| format!("Got {}, array={}", r.status, r.body.is_array()),
                )
                .check_with(
                    "GET /decks contains the created deck",
                    Expect::satisfies(move |r| {
                        r.body
                            .as_array()
                            .is_some_and(|decks| decks.iter().any(|d| d["id"] == listed.as_str()))
                    }),
                    move |_| format!("deck_a_id={}... not in list", short(&deck_a)),
                ),
        )
        .await;

    runner
        .run(
            Step::new(ApiRequest::get(format!("/decks/{}", fixture.deck_a_id)).bearer(&user_a))
                .check(
                    "GET /decks/:id detail -> 200",
                    Expect::status(200).and(Expect::satisfies(|r| {
                        r.str_at("/name")
                            .is_some_and(|name| name.starts_with("Test Deck A"))
                    })),
                ),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get(format!("/decks/{}", fixture.deck_a_id)).bearer(&user_b))
                .check("GET /decks/:id of another user -> 404", Expect::status(404)),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get(format!("/decks/{}", NIL_ID)).bearer(&user_a))
                .check("GET /decks/:id unknown -> 404", Expect::status(404)),
        )
        .await;

    runner
        .run(
            Step::new(
                ApiRequest::put(format!("/decks/{}", fixture.deck_a_id))
                    .bearer(&user_a)
                    .json(json!({
                        "name": fixture.stamped("Updated Deck A"),
                        "description": "Updated!",
                        "is_public": true,
                    })),
            )
            .check(
                "PUT /decks/:id updates name/description/visibility -> 200",
                Expect::status(200),
            ),
        )
        .await;
    runner
        .run(
            Step::new(
                ApiRequest::put(format!("/decks/{}", fixture.deck_a_id))
                    .bearer(&user_b)
                    .json(json!({ "name": "Hijacked" })),
            )
            .check("PUT /decks/:id of another user -> 404", Expect::status(404)),
        )
        .await;
    runner
        .run(
            Step::new(
                ApiRequest::put(format!("/decks/{}", fixture.deck_a_id))
                    .bearer(&user_a)
                    .json(json!({
                        "cards": [
                            { "card_id": fixture.cards.sol_ring, "quantity": 1 },
                            { "card_id": fixture.cards.basic_land, "quantity": 10 },
                        ],
                    })),
            )
            .check(
                "PUT /decks/:id with cards replaces the list -> 200",
                Expect::status(200),
            ),
        )
        .await;
}
