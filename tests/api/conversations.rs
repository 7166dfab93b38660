use crate::helpers::{TestApi, assert_failed, assert_passed, bearer, fixture, spawn_api};
use crate::test_data::{CONVERSATION_ID, TOKEN_A, TOKEN_C, USER_A_ID, USER_B_ID};
use deckcheck::groups::{Category, NIL_ID, conversations};
use deckcheck::report::Recorder;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn messages_path() -> String {
    format!("/conversations/{}/messages", CONVERSATION_ID)
}

async fn mount_creation(api: &TestApi) {
    Mock::given(method("POST"))
        .and(path("/conversations"))
        .and(body_partial_json(json!({ "user_id": USER_B_ID })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": CONVERSATION_ID })))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/conversations"))
        .and(body_partial_json(json!({ "user_id": USER_A_ID })))
        .respond_with(ResponseTemplate::new(400))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/conversations"))
        .and(body_partial_json(json!({ "user_id": NIL_ID })))
        .respond_with(ResponseTemplate::new(404))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/conversations"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "user_id is required" })),
        )
        .mount(&api.server)
        .await;
}

async fn mount_messages(api: &TestApi) {
    Mock::given(path(messages_path()))
        .and(header("Authorization", bearer(TOKEN_C).as_str()))
        .respond_with(ResponseTemplate::new(403))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path(messages_path()))
        .and(body_partial_json(json!({ "message": "" })))
        .respond_with(ResponseTemplate::new(400))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path(messages_path()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "msg-1" })))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path(messages_path()))
        .and(header("Authorization", bearer(TOKEN_A).as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": "msg-1" }, { "id": "msg-2" }], "total": 2 })),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/conversations/{}/read", CONVERSATION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "marked_read": 1 })))
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .and(header("Authorization", bearer(TOKEN_A).as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": CONVERSATION_ID }], "total": 1 })),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&api.server)
        .await;
}

#[tokio::test]
async fn well_behaved_messaging_api_passes_every_check() {
    // Arrange
    let api = spawn_api().await;
    mount_creation(&api).await;
    mount_messages(&api).await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    conversations::run(&mut api.runner(Category::Conversations, &mut recorder), &fixture).await;

    // Assert
    let summary = recorder.summary();
    assert!(summary.passed(), "{}", summary.render());
    assert_passed(
        &recorder,
        "POST /conversations again -> same conversation (idempotent)",
    );
    assert_passed(&recorder, "POST message from an outsider -> 403");
    assert_passed(&recorder, "GET messages as an outsider -> 403");
    assert!(summary.categories.iter().all(|t| t.category == "DM"));
}

#[tokio::test]
async fn duplicate_creation_with_a_new_id_is_a_failure() {
    // Arrange
    let api = spawn_api().await;
    Mock::given(method("POST"))
        .and(path("/conversations"))
        .and(body_partial_json(json!({ "user_id": USER_B_ID })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": CONVERSATION_ID })))
        .up_to_n_times(1)
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/conversations"))
        .and(body_partial_json(json!({ "user_id": USER_B_ID })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "conv-2" })))
        .mount(&api.server)
        .await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    conversations::run(&mut api.runner(Category::Conversations, &mut recorder), &fixture).await;

    // Assert
    assert_passed(
        &recorder,
        "POST /conversations creates a conversation -> 200/201",
    );
    assert_failed(
        &recorder,
        "POST /conversations again -> same conversation (idempotent)",
    );
}

#[tokio::test]
async fn message_checks_are_skipped_without_a_conversation() {
    // Arrange
    let api = spawn_api().await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    conversations::run(&mut api.runner(Category::Conversations, &mut recorder), &fixture).await;

    // Assert
    assert!(
        recorder
            .results()
            .iter()
            .all(|r| !r.name.contains("messages") && !r.name.contains("outsider"))
    );
    assert_failed(&recorder, "POST /conversations creates a conversation -> 200/201");
}
