use super::GroupRunner;
use crate::api_client::ApiRequest;
use crate::expect::Expect;
use crate::fixture::Fixture;
use serde_json::json;

pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let token = &fixture.user_a.token;
    let deck = format!("/decks/{}", fixture.deck_a_id);

    runner
        .expect(
            ApiRequest::post(format!("{}/cards", deck))
                .bearer(token)
                .json(json!({ "card_id": fixture.cards.lightning_bolt, "quantity": 1 })),
            "POST /decks/:id/cards adds a card -> 200",
            Expect::status(200).and(Expect::equals("/ok", json!(true))),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/cards", deck))
                .bearer(token)
                .json(json!({ "quantity": 1 })),
            "POST /decks/:id/cards without card_id -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/cards", deck))
                .bearer(token)
                .json(json!({ "card_id": fixture.cards.lightning_bolt, "quantity": 0 })),
            "POST /decks/:id/cards with quantity=0 -> 400",
            Expect::status(400),
        )
        .await;

    // Basic lands are exempt from the singleton rule
    runner
        .expect(
            ApiRequest::post(format!("{}/cards/bulk", deck))
                .bearer(token)
                .json(json!({
                    "cards": [
                        { "card_id": fixture.cards.basic_land, "quantity": 5, "is_commander": false },
                    ],
                })),
            "POST /decks/:id/cards/bulk -> 200",
            Expect::status(200).and(Expect::equals("/ok", json!(true))),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/cards/bulk", deck))
                .bearer(token)
                .json(json!({ "cards": [] })),
            "POST /decks/:id/cards/bulk with no cards -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/cards/set", deck))
                .bearer(token)
                .json(json!({ "card_id": fixture.cards.basic_land, "quantity": 20 })),
            "POST /decks/:id/cards/set with an absolute quantity -> 200",
            Expect::status(200),
        )
        .await;

    runner
        .expect(
            ApiRequest::get(format!("{}/export", deck)).bearer(token),
            "GET /decks/:id/export -> 200 with text",
            Expect::status(200).and(Expect::has_key("text")),
        )
        .await;
    // Either verdict is fine as long as the deck gets validated
    runner
        .expect(
            ApiRequest::post(format!("{}/validate", deck)).bearer(token),
            "POST /decks/:id/validate answers (200 or 400)",
            Expect::status_in(&[200, 400]),
        )
        .await;
    runner
        .expect(
            ApiRequest::get(format!("{}/analysis", deck)).bearer(token),
            "GET /decks/:id/analysis -> 200",
            Expect::status(200).and(Expect::has_key("mana_curve")),
        )
        .await;
    runner
        .expect(
            ApiRequest::get(format!("{}/simulate", deck)).bearer(token),
            "GET /decks/:id/simulate -> 200",
            Expect::status(200).and(Expect::has_key("iterations")),
        )
        .await;
}
