use crate::helpers::{assert_passed, bearer, fixture, spawn_api};
use crate::test_data::{TOKEN_A, TOKEN_B};
use deckcheck::groups::{Category, deck_delete};
use deckcheck::report::Recorder;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn throwaway_deck_is_deleted_exactly_once() {
    // Arrange
    let api = spawn_api().await;
    Mock::given(method("POST"))
        .and(path("/decks"))
        .and(body_partial_json(json!({ "format": "standard" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "deck-del" })))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/decks/deck-del"))
        .and(header("Authorization", bearer(TOKEN_B).as_str()))
        .respond_with(ResponseTemplate::new(404))
        .mount(&api.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/decks/deck-del"))
        .and(header("Authorization", bearer(TOKEN_A).as_str()))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("DELETE"))
        .and(header("Authorization", bearer(TOKEN_A).as_str()))
        .respond_with(ResponseTemplate::new(404))
        .mount(&api.server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&api.server)
        .await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    deck_delete::run(&mut api.runner(Category::DeckDelete, &mut recorder), &fixture).await;

    // Assert
    let summary = recorder.summary();
    assert!(summary.passed(), "{}", summary.render());
    assert_eq!(summary.total(), 5);
    assert_passed(&recorder, "DELETE an already deleted deck -> 404");
}

#[tokio::test]
async fn ownership_checks_are_skipped_when_creation_fails() {
    // Arrange
    let api = spawn_api().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&api.server)
        .await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    deck_delete::run(&mut api.runner(Category::DeckDelete, &mut recorder), &fixture).await;

    // Assert
    let names: Vec<&str> = recorder.results().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "DELETE /decks/:id without token -> 401",
            "DELETE an unknown deck -> 404",
        ]
    );
    assert_passed(&recorder, "DELETE /decks/:id without token -> 401");
}
