use super::{GroupRunner, NIL_ID};
use crate::api_client::ApiRequest;
use crate::expect::Expect;
use crate::fixture::Fixture;
use serde_json::json;

pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let token = &fixture.user_a.token;
    let deck_a = fixture.deck_a_id.as_str();
    let deck_b = fixture.deck_b_id.as_str();

    runner
        .expect(
            ApiRequest::post("/ai/explain").bearer(token).json(json!({
                "card_name": "Sol Ring",
                "oracle_text": "{T}: Add {C}{C}.",
                "type_line": "Artifact",
                "card_id": fixture.cards.sol_ring,
            })),
            "POST /ai/explain -> 200 with explanation",
            Expect::status(200).and(Expect::has_key("explanation")),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/explain").bearer(token).json(json!({})),
            "POST /ai/explain without card_name -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/explain").json(json!({ "card_name": "Sol Ring" })),
            "POST /ai/explain without token -> 401",
            Expect::status(401),
        )
        .await;

    runner
        .expect(
            ApiRequest::post("/ai/archetypes")
                .bearer(token)
                .json(json!({ "deck_id": deck_a })),
            "POST /ai/archetypes -> 200 with options",
            Expect::status(200).and(Expect::has_any_key(&["options", "archetype"])),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/archetypes").bearer(token).json(json!({})),
            "POST /ai/archetypes without deck_id -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/archetypes")
                .bearer(token)
                .json(json!({ "deck_id": NIL_ID })),
            "POST /ai/archetypes with an unknown deck -> 404",
            Expect::status(404),
        )
        .await;

    runner
        .expect(
            ApiRequest::post("/ai/generate").bearer(token).json(json!({
                "prompt": "Aggressive red goblin deck",
                "format": "Commander",
            })),
            "POST /ai/generate -> 200 with a deck",
            Expect::status(200).and(Expect::has_any_key(&["generated_deck", "cards"])),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/generate").bearer(token).json(json!({})),
            "POST /ai/generate without prompt -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/generate").json(json!({ "prompt": "test", "format": "standard" })),
            "POST /ai/generate without token -> 401",
            Expect::status(401),
        )
        .await;

    // 400 is legitimate for a commander deck without a selected commander
    runner
        .expect(
            ApiRequest::post("/ai/optimize")
                .bearer(token)
                .json(json!({ "deck_id": deck_a, "archetype": "aggro" })),
            "POST /ai/optimize -> 200 or 400",
            Expect::status_in(&[200, 400]),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/optimize").bearer(token).json(json!({})),
            "POST /ai/optimize without deck_id -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/optimize")
                .bearer(token)
                .json(json!({ "deck_id": NIL_ID, "archetype": "aggro" })),
            "POST /ai/optimize with an unknown deck -> 404",
            Expect::status(404),
        )
        .await;

    simulations(runner, fixture, deck_a, deck_b).await;

    runner
        .expect(
            ApiRequest::post("/ai/weakness-analysis")
                .bearer(token)
                .json(json!({ "deck_id": deck_a })),
            "POST /ai/weakness-analysis -> 200",
            Expect::status(200),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/weakness-analysis")
                .bearer(token)
                .json(json!({})),
            "POST /ai/weakness-analysis without deck_id -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/weakness-analysis")
                .bearer(token)
                .json(json!({ "deck_id": NIL_ID })),
            "POST /ai/weakness-analysis with an unknown deck -> 404",
            Expect::status(404),
        )
        .await;
}

async fn simulations(runner: &mut GroupRunner<'_>, fixture: &Fixture, deck_a: &str, deck_b: &str) {
    let token = &fixture.user_a.token;

    // The simulation store may be missing columns on some deployments
    runner
        .expect(
            ApiRequest::post("/ai/simulate").bearer(token).json(json!({
                "deck_id": deck_a,
                "type": "goldfish",
                "simulations": 100,
            })),
            "POST /ai/simulate goldfish -> 200 or 500",
            Expect::status_in(&[200, 500]),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/simulate").bearer(token).json(json!({})),
            "POST /ai/simulate without deck_id -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/simulate")
                .bearer(token)
                .json(json!({ "deck_id": NIL_ID })),
            "POST /ai/simulate with an unknown deck -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/simulate")
                .bearer(token)
                .json(json!({ "deck_id": deck_a, "type": "matchup" })),
            "POST /ai/simulate matchup without opponent -> 400",
            Expect::status(400),
        )
        .await;

    runner
        .expect(
            ApiRequest::post("/ai/simulate-matchup").bearer(token).json(json!({
                "my_deck_id": deck_a,
                "opponent_deck_id": deck_b,
                "simulations": 10,
            })),
            "POST /ai/simulate-matchup -> 200",
            Expect::status(200),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/simulate-matchup")
                .bearer(token)
                .json(json!({})),
            "POST /ai/simulate-matchup without ids -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/simulate-matchup")
                .bearer(token)
                .json(json!({ "my_deck_id": NIL_ID, "opponent_deck_id": deck_b })),
            "POST /ai/simulate-matchup with an unknown own deck -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/ai/simulate-matchup")
                .bearer(token)
                .json(json!({ "my_deck_id": deck_a, "opponent_deck_id": NIL_ID })),
            "POST /ai/simulate-matchup with an unknown opponent -> 404",
            Expect::status(404),
        )
        .await;
}
