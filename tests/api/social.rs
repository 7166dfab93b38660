use crate::helpers::{assert_passed, bearer, fixture, spawn_api};
use crate::test_data::{TOKEN_B, USER_A_ID, USER_B_ID};
use deckcheck::groups::{Category, NIL_ID, social};
use deckcheck::report::Recorder;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, Request, Respond, ResponseTemplate};

/// Follow endpoint of user A as seen by user B.
#[derive(Clone, Default)]
struct FollowState {
    following: Arc<AtomicBool>,
}

impl Respond for FollowState {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match request.method.as_str() {
            "POST" => self.following.store(true, Ordering::SeqCst),
            "DELETE" => self.following.store(false, Ordering::SeqCst),
            _ => {}
        }
        ResponseTemplate::new(200)
            .set_body_json(json!({ "is_following": self.following.load(Ordering::SeqCst) }))
    }
}

async fn mount_follow_graph(api: &crate::helpers::TestApi, state: &FollowState) {
    Mock::given(path(format!("/users/{}/follow", USER_A_ID)))
        .and(header("Authorization", bearer(TOKEN_B).as_str()))
        .respond_with(state.clone())
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/users/{}/follow", USER_B_ID)))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Cannot follow yourself" })),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/users/{}/follow", NIL_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "User not found" })))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/users/{}/followers", USER_A_ID)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": USER_B_ID }], "total": 1 })),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/users/{}/following", USER_B_ID)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": USER_A_ID }], "total": 1 })),
        )
        .mount(&api.server)
        .await;
}

#[tokio::test]
async fn follow_unfollow_cycle_passes_and_ends_following() {
    // Arrange
    let api = spawn_api().await;
    let state = FollowState::default();
    mount_follow_graph(&api, &state).await;
    Mock::given(method("GET"))
        .and(path("/community/decks"))
        .and(query_param("following", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&api.server)
        .await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    social::run(&mut api.runner(Category::Social, &mut recorder), &fixture).await;

    // Assert
    assert!(
        recorder.summary().passed(),
        "{}",
        recorder.summary().render()
    );
    assert_passed(&recorder, "POST /users/:id/follow again -> 200 (idempotent)");
    assert_passed(
        &recorder,
        "GET follow status after unfollow -> is_following=false",
    );
    assert!(state.following.load(Ordering::SeqCst));
}

#[tokio::test]
async fn following_feed_falls_back_to_the_dedicated_endpoint() {
    // Arrange
    let api = spawn_api().await;
    mount_follow_graph(&api, &FollowState::default()).await;
    Mock::given(method("GET"))
        .and(path("/community/decks/following"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&api.server)
        .await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    social::run(&mut api.runner(Category::Social, &mut recorder), &fixture).await;

    // Assert
    assert_passed(&recorder, "Deck feed of followed users -> 200");
}
