use super::{GroupRunner, NIL_ID};
use crate::api_client::ApiRequest;
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use serde_json::json;

pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let user_a = &fixture.user_a.token;
    let user_b = &fixture.user_b.token;
    let deck = format!("/decks/{}", fixture.deck_a_id);
    let unknown = format!("/decks/{}", NIL_ID);

    runner
        .expect(
            ApiRequest::post(format!("{}/pricing", deck))
                .bearer(user_a)
                .json(json!({})),
            "POST /decks/:id/pricing -> 200",
            Expect::status(200).and(Expect::has_any_key(&["total", "items", "total_usd"])),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/pricing", deck))
                .bearer(user_a)
                .json(json!({ "force": true })),
            "POST /decks/:id/pricing with force=true -> 200",
            Expect::status(200),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/pricing", unknown))
                .bearer(user_a)
                .json(json!({})),
            "POST /decks/:id/pricing of an unknown deck -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/pricing", deck))
                .bearer(user_b)
                .json(json!({})),
            "POST /decks/:id/pricing of another user's deck -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/pricing", deck)).json(json!({})),
            "POST /decks/:id/pricing without token -> 401",
            Expect::status(401),
        )
        .await;

    runner
        .expect(
            ApiRequest::post(format!("{}/ai-analysis", deck))
                .bearer(user_a)
                .json(json!({ "force": true })),
            "POST /decks/:id/ai-analysis -> 200",
            Expect::status(200).and(Expect::has_any_key(&["synergy_score", "deck_id"])),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/ai-analysis", unknown))
                .bearer(user_a)
                .json(json!({})),
            "POST /decks/:id/ai-analysis of an unknown deck -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/ai-analysis", deck))
                .bearer(user_b)
                .json(json!({})),
            "POST /decks/:id/ai-analysis of another user's deck -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/ai-analysis", deck))
                .bearer(user_a)
                .json(json!({})),
            "POST /decks/:id/ai-analysis served from cache -> 200",
            Expect::status(200),
        )
        .await;

    // 500 is tolerated: the server may run without an AI provider key
    runner
        .expect(
            ApiRequest::post(format!("{}/recommendations", deck))
                .bearer(user_a)
                .json(json!({})),
            "POST /decks/:id/recommendations -> 200 or 500 (no AI key)",
            Expect::status_in(&[200, 500]),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("{}/recommendations", unknown))
                .bearer(user_a)
                .json(json!({})),
            "POST /decks/:id/recommendations of an unknown deck -> 404/500",
            Expect::status_in(&[404, 500]),
        )
        .await;

    replace_printing(runner, fixture, &deck).await;
}

async fn replace_printing(runner: &mut GroupRunner<'_>, fixture: &Fixture, deck: &str) {
    let user_a = &fixture.user_a.token;
    let replace = format!("{}/cards/replace", deck);

    // Another printing of a card already in the deck
    let printings = runner
        .send(ApiRequest::get("/cards/printings").query("name", "Sol Ring"))
        .await;
    let other_printing = if printings.status == 200 {
        printings
            .array_at("/data")
            .iter()
            .filter_map(|printing| printing["id"].as_str())
            .find(|id| *id != fixture.cards.sol_ring)
            .map(str::to_string)
    } else {
        None
    };

    runner
        .expect(
            ApiRequest::post(&replace).bearer(user_a).json(json!({})),
            "POST /decks/:id/cards/replace without fields -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(&replace)
                .bearer(user_a)
                .json(json!({ "old_card_id": fixture.cards.sol_ring })),
            "POST cards/replace without new_card_id -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::post(&replace).bearer(user_a).json(json!({
                "old_card_id": fixture.cards.sol_ring,
                "new_card_id": fixture.cards.sol_ring,
            })))
            .check_with(
                "POST cards/replace with the same card -> 200 (no-op)",
                Expect::status(200).and(Expect::equals("/changed", json!(false))),
                |r| format!("Got {}: {}", r.status, r.body),
            ),
        )
        .await;

    match other_printing {
        Some(new_card_id) => {
            runner
                .expect(
                    ApiRequest::post(&replace).bearer(user_a).json(json!({
                        "old_card_id": fixture.cards.sol_ring,
                        "new_card_id": new_card_id,
                    })),
                    "POST cards/replace with another printing -> 200",
                    Expect::status(200).and(Expect::equals("/ok", json!(true))),
                )
                .await;
        }
        None => runner.record(
            "POST cards/replace with another printing -> SKIP (single printing)",
            true,
            "Sol Ring has a single printing",
        ),
    }

    runner
        .expect(
            ApiRequest::post(&replace).bearer(user_a).json(json!({
                "old_card_id": NIL_ID,
                "new_card_id": fixture.cards.sol_ring,
            })),
            "POST cards/replace with an unknown old card -> 400/404",
            Expect::status_in(&[400, 404, 500]),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(&replace)
                .bearer(&fixture.user_b.token)
                .json(json!({
                    "old_card_id": fixture.cards.sol_ring,
                    "new_card_id": fixture.cards.lightning_bolt,
                })),
            "POST cards/replace on another user's deck -> 404",
            Expect::status_in(&[404, 500]),
        )
        .await;
}
