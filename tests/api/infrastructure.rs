use crate::helpers::{TestApi, assert_failed, assert_passed, fixture, spawn_api};
use deckcheck::groups::{Category, NIL_ID, infrastructure};
use deckcheck::report::Recorder;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mount_get(api: &TestApi, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&api.server)
        .await;
}

async fn mount_healthy_api(api: &TestApi, health: &str) {
    mount_get(api, "/health", json!({ "status": health })).await;
    mount_get(api, "/health/live", json!({ "status": "alive" })).await;
    mount_get(api, "/health/ready", json!({ "status": "ready" })).await;
    // Rules searches with `meta=true` may come back as a bare list
    Mock::given(method("GET"))
        .and(path("/rules"))
        .and(query_param("meta", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "rule": "903.1" }])))
        .mount(&api.server)
        .await;
    mount_get(api, "/rules", json!({ "data": [] })).await;
    mount_get(api, "/sets", json!({ "data": [{ "code": "LEA" }] })).await;
    Mock::given(method("GET"))
        .and(path(format!("/market/card/{}", NIL_ID)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&api.server)
        .await;
    mount_get(api, "/market/card/card-sol-ring", json!({ "name": "Sol Ring" })).await;
    mount_get(api, "/market/movers", json!({ "gainers": [], "losers": [] })).await;
    mount_get(api, "/", json!({ "name": "deck api" })).await;
}

#[tokio::test]
async fn healthy_api_passes_every_infrastructure_check() {
    // Arrange
    let api = spawn_api().await;
    mount_healthy_api(&api, "healthy").await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    infrastructure::run(&mut api.runner(Category::Infrastructure, &mut recorder), &fixture).await;

    // Assert
    let summary = recorder.summary();
    assert!(summary.passed(), "{}", summary.render());
    assert_eq!(summary.total(), 12);
    assert_passed(&recorder, "GET /rules?meta=true -> 200 with meta");
}

#[tokio::test]
async fn degraded_health_status_fails_the_health_check() {
    // Arrange
    let api = spawn_api().await;
    mount_healthy_api(&api, "degraded").await;
    let fixture = fixture();
    let mut recorder = Recorder::default();

    // Act
    infrastructure::run(&mut api.runner(Category::Infrastructure, &mut recorder), &fixture).await;

    // Assert
    assert_failed(&recorder, "GET /health -> 200 healthy");
    assert_passed(&recorder, "GET /health/live -> 200 alive");
    assert_eq!(recorder.summary().failed_count(), 1);
}
