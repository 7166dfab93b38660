use crate::helpers::spawn_api;
use crate::test_data::{TEST_RUN_STAMP, TOKEN_A, USER_A_ID};
use claims::assert_matches;
use deckcheck::orchestrator::{Orchestrator, RunOutcome};
use deckcheck::setup::SetupError;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn failed_registration_aborts_the_run() {
    // Arrange
    let api = spawn_api().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "database unavailable" })),
        )
        .expect(1)
        .named("Only the first registration is attempted")
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(0)
        .mount(&api.server)
        .await;
    let orchestrator = Orchestrator::new(api.client, api.pacing);

    // Act
    let outcome = orchestrator.run(TEST_RUN_STAMP.to_string()).await;

    // Assert
    assert!(!outcome.passed());
    assert_matches!(
        outcome,
        RunOutcome::SetupFailed(SetupError::Registration {
            label: "A",
            status: 500,
            ..
        })
    );
}

#[tokio::test]
async fn every_group_runs_in_order_with_auth_last() {
    // Arrange
    let api = spawn_api().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": TOKEN_A,
            "user": { "id": USER_A_ID },
        })))
        .expect(7)
        .named("Three setup registrations and four from the auth group")
        .mount(&api.server)
        .await;
    for (name, id) in [("Sol Ring", "card-sol-ring"), ("Lightning Bolt", "card-lightning-bolt")] {
        Mock::given(method("GET"))
            .and(path("/cards"))
            .and(query_param("name", name))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [{ "id": id, "name": name }] })),
            )
            .mount(&api.server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(query_param("name", "Forest"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "card-forest", "name": "Forest", "type_line": "Basic Land — Forest" }],
        })))
        .mount(&api.server)
        .await;
    let orchestrator = Orchestrator::new(api.client, api.pacing);

    // Act
    let outcome = orchestrator.run(TEST_RUN_STAMP.to_string()).await;

    // Assert
    let RunOutcome::Completed(summary) = outcome else {
        panic!("Setup was expected to succeed");
    };
    let categories: Vec<&str> = summary
        .categories
        .iter()
        .map(|t| t.category.as_str())
        .collect();
    assert_eq!(
        categories,
        vec![
            "DECK",
            "DECK_CARDS",
            "DECK_ADV",
            "AI",
            "COMMUNITY",
            "SOCIAL",
            "PROFILE",
            "DM",
            "IMPORT",
            "NOTIF",
            "CARDS",
            "INFRA",
            "DECK_DEL",
            "AUTH",
        ]
    );
    // Most endpoints are not mocked, so the run completes with failures
    assert!(!summary.passed());
    assert_eq!(summary.passed_count() + summary.failed_count(), summary.total());
}
