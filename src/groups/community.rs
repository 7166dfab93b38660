use super::{GroupRunner, NIL_ID};
use crate::api_client::{ApiRequest, ApiResponse};
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let user_a = &fixture.user_a.token;
    let user_b = &fixture.user_b.token;

    runner
        .run(
            Step::new(ApiRequest::get("/community/users").query("q", &fixture.user_a.username))
                .check_with(
                    "GET /community/users?q=... -> 200 with results",
                    Expect::status(200).and(Expect::at_least("/total", 1)),
                    |r| format!("Got {}, total={}", r.status, r.body["total"]),
                ),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/community/users"),
            "GET /community/users without q -> 400 or empty 200",
            Expect::status_in(&[400, 200]),
        )
        .await;

    let profile = format!("/community/users/{}", fixture.user_a.id);
    runner
        .expect(
            ApiRequest::get(&profile),
            "GET /community/users/:id public profile -> 200",
            Expect::status(200).and(Expect::has_key("user")),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get(&profile).bearer(user_b)).check_with(
                "GET /community/users/:id with auth -> has is_following",
                Expect::status(200).and(Expect::satisfies(|r| r.at("/user/is_following").is_some())),
                |r| {
                    format!(
                        "Got {}, has_is_following={}",
                        r.status,
                        r.at("/user/is_following").is_some()
                    )
                },
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::get(format!("/community/users/{}", NIL_ID)),
            "GET /community/users/:id unknown -> 404",
            Expect::status(404),
        )
        .await;

    runner
        .expect(
            ApiRequest::get("/community/decks"),
            "GET /community/decks -> 200",
            Expect::status(200).and(Expect::has_key("data")),
        )
        .await;
    runner
        .run(
            Step::new(
                ApiRequest::get("/community/decks").query("search", fixture.stamped("Test Deck B")),
            )
            .check_with(
                "GET /community/decks?search=... finds the public deck",
                Expect::status(200).and(Expect::at_least("/total", 1)),
                |r| format!("Got {}, total={}", r.status, r.body["total"]),
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/community/decks").query("format", "commander"),
            "GET /community/decks?format=commander -> 200",
            Expect::status(200),
        )
        .await;

    runner
        .run(
            Step::new(ApiRequest::get(format!("/community/decks/{}", fixture.deck_b_id)))
                .check(
                    "GET /community/decks/:id (public) -> 200",
                    Expect::status(200).and(Expect::has_key("name")),
                )
                .check_with(
                    "Public deck carries owner info",
                    Expect::has_any_key(&["owner_username", "owner_id"]),
                    |r| format!("keys={:?}", object_keys(&r.body)),
                ),
        )
        .await;

    // Deck A went public during the CRUD group, so a fresh private deck is needed
    let private = runner
        .send(ApiRequest::post("/decks").bearer(user_a).json(json!({
            "name": fixture.stamped("Private Deck"),
            "format": "standard",
            "is_public": false,
        })))
        .await;
    let private_id = private.str_at("/id").unwrap_or_default().to_string();
    if private_id.is_empty() {
        runner.record(
            "GET /community/decks/:id (private) -> 404",
            false,
            "Could not create private deck",
        );
    } else {
        runner
            .expect(
                ApiRequest::get(format!("/community/decks/{}", private_id)),
                "GET /community/decks/:id (private) -> 404",
                Expect::status(404),
            )
            .await;
    }

    let copy = runner
        .run(
            Step::new(
                ApiRequest::post(format!("/community/decks/{}", fixture.deck_b_id)).bearer(user_a),
            )
            .check(
                "POST /community/decks/:id copies the deck -> 201",
                Expect::status(201).and(Expect::equals("/success", json!(true))),
            )
            .check_with(
                "Copied deck is named as a copy",
                Expect::satisfies(|r| is_copy_name(r.str_at("/deck/name").unwrap_or_default())),
                |r| format!("name={}", r.str_at("/deck/name").unwrap_or_default()),
            ),
        )
        .await;
    verify_copy(runner, fixture, &copy).await;

    runner
        .expect(
            ApiRequest::post(format!("/community/decks/{}", fixture.deck_b_id)),
            "POST /community/decks/:id without token -> 401",
            Expect::status(401),
        )
        .await;
    if !private_id.is_empty() {
        runner
            .expect(
                ApiRequest::post(format!("/community/decks/{}", private_id)).bearer(user_b),
                "POST /community/decks/:id (private) -> 404",
                Expect::status(404),
            )
            .await;
    }
}

/// The copy belongs to user A and holds the same cards as deck B.
async fn verify_copy(runner: &mut GroupRunner<'_>, fixture: &Fixture, copy: &ApiResponse) {
    let Some(copy_id) = copy.str_at("/deck/id").filter(|id| !id.is_empty()) else {
        runner.record(
            "Copied deck is owned by the copier",
            false,
            "copy response carries no deck id",
        );
        return;
    };

    let original = runner
        .send(
            ApiRequest::get(format!("/decks/{}", fixture.deck_b_id)).bearer(&fixture.user_b.token),
        )
        .await;
    let expected_cards = card_entries(&original.body);
    runner
        .run(
            Step::new(ApiRequest::get(format!("/decks/{}", copy_id)).bearer(&fixture.user_a.token))
                .check("Copied deck is owned by the copier", Expect::status(200))
                .check_with(
                    "Copied deck has the original card list",
                    Expect::satisfies(move |r| {
                        !expected_cards.is_empty() && card_entries(&r.body) == expected_cards
                    }),
                    |r| format!("Got {}, cards={:?}", r.status, card_entries(&r.body)),
                ),
        )
        .await;
}

/// Card id to total quantity, read from the `cards` array of a deck.
pub fn card_entries(deck: &Value) -> BTreeMap<String, u64> {
    let mut entries = BTreeMap::new();
    for card in deck["cards"].as_array().map(Vec::as_slice).unwrap_or_default() {
        let Some(id) = card["card_id"].as_str().or_else(|| card["id"].as_str()) else {
            continue;
        };
        let quantity = card["quantity"].as_u64().unwrap_or(1);
        *entries.entry(id.to_string()).or_insert(0) += quantity;
    }
    entries
}

pub fn is_copy_name(name: &str) -> bool {
    let name = name.to_lowercase();
    ["copy", "cópia", "copia"]
        .iter()
        .any(|marker| name.contains(marker))
}

fn object_keys(body: &Value) -> Vec<&str> {
    body.as_object()
        .map(|object| object.keys().take(10).map(String::as_str).collect())
        .unwrap_or_default()
}
