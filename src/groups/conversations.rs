use super::{GroupRunner, NIL_ID};
use crate::api_client::ApiRequest;
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use serde_json::json;

/// Direct messages between A and B; C plays the outsider.
pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let user_a = &fixture.user_a.token;

    let created = runner
        .expect(
            ApiRequest::post("/conversations")
                .bearer(user_a)
                .json(json!({ "user_id": fixture.user_b.id })),
            "POST /conversations creates a conversation -> 200/201",
            Expect::status_in(&[200, 201]).and(Expect::has_key("id")),
        )
        .await;
    let conversation_id = created.str_at("/id").unwrap_or_default().to_string();

    runner
        .expect(
            ApiRequest::post("/conversations")
                .bearer(user_a)
                .json(json!({ "user_id": fixture.user_a.id })),
            "POST /conversations with oneself -> 400",
            Expect::status(400),
        )
        .await;

    let first_id = conversation_id.clone();
    let reported_id = conversation_id.clone();
    runner
        .run(
            Step::new(
                ApiRequest::post("/conversations")
                    .bearer(user_a)
                    .json(json!({ "user_id": fixture.user_b.id })),
            )
            .check_with(
                "POST /conversations again -> same conversation (idempotent)",
                Expect::status_in(&[200, 201]).and(Expect::satisfies(move |r| {
                    r.str_at("/id") == Some(first_id.as_str())
                })),
                move |r| {
                    format!(
                        "Got {}, same_id={}",
                        r.status,
                        r.str_at("/id") == Some(reported_id.as_str())
                    )
                },
            ),
        )
        .await;

    runner
        .expect(
            ApiRequest::post("/conversations").bearer(user_a).json(json!({})),
            "POST /conversations without user_id -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post("/conversations")
                .bearer(user_a)
                .json(json!({ "user_id": NIL_ID })),
            "POST /conversations with an unknown user -> 404",
            Expect::status(404),
        )
        .await;

    if !conversation_id.is_empty() {
        messages(runner, fixture, &conversation_id).await;
    }

    let listed_id = conversation_id.clone();
    runner
        .run(
            Step::new(ApiRequest::get("/conversations").bearer(user_a))
                .check(
                    "GET /conversations -> 200 with data",
                    Expect::status(200).and(Expect::has_key("data")),
                )
                .check_with(
                    "Conversations include the new one",
                    Expect::satisfies(move |r| {
                        r.array_at("/data")
                            .iter()
                            .any(|c| c["id"] == listed_id.as_str())
                    }),
                    |r| format!("count={}", r.array_at("/data").len()),
                ),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/conversations"),
            "GET /conversations without token -> 401",
            Expect::status(401),
        )
        .await;
}

async fn messages(runner: &mut GroupRunner<'_>, fixture: &Fixture, conversation_id: &str) {
    let path = format!("/conversations/{}/messages", conversation_id);

    runner
        .expect(
            ApiRequest::post(&path)
                .bearer(&fixture.user_a.token)
                .json(json!({ "message": "Hi, how are you?" })),
            "POST /conversations/:id/messages -> 201",
            Expect::status(201).and(Expect::has_key("id")),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(&path)
                .bearer(&fixture.user_b.token)
                .json(json!({ "message": "Great! And you?" })),
            "POST reply from B -> 201",
            Expect::status(201),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(&path)
                .bearer(&fixture.user_a.token)
                .json(json!({ "message": "" })),
            "POST empty message -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(&path)
                .bearer(&fixture.user_c.token)
                .json(json!({ "message": "Intruder" })),
            "POST message from an outsider -> 403",
            Expect::status(403),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get(&path).bearer(&fixture.user_a.token)).check_with(
                "GET /conversations/:id/messages -> 200",
                Expect::status(200).and(Expect::at_least("/total", 2)),
                |r| format!("Got {}, total={}", r.status, r.body["total"]),
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::get(&path).bearer(&fixture.user_c.token),
            "GET messages as an outsider -> 403",
            Expect::status(403),
        )
        .await;
    runner
        .expect(
            ApiRequest::put(format!("/conversations/{}/read", conversation_id))
                .bearer(&fixture.user_a.token),
            "PUT /conversations/:id/read -> 200",
            Expect::status(200).and(Expect::has_key("marked_read")),
        )
        .await;
}
