use crate::helpers::{TestApi, assert_failed, assert_passed, bearer, fixture, spawn_api};
use crate::test_data::{TOKEN_A, TOKEN_B};
use deckcheck::groups::{Category, community};
use deckcheck::report::Recorder;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

const COPY_ID: &str = "deck-b-copy";

fn deck_b_cards() -> Value {
    json!({
        "id": "deck-b",
        "cards": [
            { "card_id": "card-sol-ring", "quantity": 1 },
            { "card_id": "card-lightning-bolt", "quantity": 1 },
        ],
    })
}

async fn mount_copy(api: &TestApi, copy_body: Value) {
    Mock::given(method("GET"))
        .and(path("/decks/deck-b"))
        .and(header("Authorization", bearer(TOKEN_B).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(deck_b_cards()))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/community/decks/deck-b"))
        .and(header("Authorization", bearer(TOKEN_A).as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "deck": { "id": COPY_ID, "name": "Test Deck B 1718000000 (Copy)" },
        })))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/decks/{}", COPY_ID)))
        .and(header("Authorization", bearer(TOKEN_A).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(copy_body))
        .mount(&api.server)
        .await;
}

#[tokio::test]
async fn copied_deck_matches_the_original() {
    // Arrange
    let api = spawn_api().await;
    mount_copy(&api, deck_b_cards()).await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    community::run(&mut api.runner(Category::Community, &mut recorder), &fixture).await;

    // Assert
    assert_passed(&recorder, "POST /community/decks/:id copies the deck -> 201");
    assert_passed(&recorder, "Copied deck is named as a copy");
    assert_passed(&recorder, "Copied deck is owned by the copier");
    assert_passed(&recorder, "Copied deck has the original card list");
}

#[tokio::test]
async fn copy_with_different_cards_is_reported() {
    // Arrange
    let api = spawn_api().await;
    mount_copy(
        &api,
        json!({ "id": COPY_ID, "cards": [{ "card_id": "card-sol-ring", "quantity": 1 }] }),
    )
    .await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    community::run(&mut api.runner(Category::Community, &mut recorder), &fixture).await;

    // Assert
    assert_passed(&recorder, "Copied deck is owned by the copier");
    assert_failed(&recorder, "Copied deck has the original card list");
}

#[tokio::test]
async fn failed_private_deck_creation_is_recorded_as_a_failure() {
    // Arrange
    let api = spawn_api().await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    community::run(&mut api.runner(Category::Community, &mut recorder), &fixture).await;

    // Assert
    let result = crate::helpers::outcome(&recorder, "GET /community/decks/:id (private) -> 404");
    assert!(!result.passed);
    assert_eq!(result.detail, "Could not create private deck");
    assert_failed(&recorder, "Copied deck is owned by the copier");
}
