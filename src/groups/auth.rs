use super::GroupRunner;
use crate::api_client::ApiRequest;
use crate::expect::{Expect, Step};
use crate::fixture::{Fixture, TEST_PASSWORD};
use serde_json::{Value, json};

/// Registration and login rules. Every auth endpoint is rate limited, so the
/// group pauses between calls and runs only after the orchestrator's cooldown.
pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let stamp = &fixture.run_stamp;
    let user_a = &fixture.user_a;

    let registrations: [(Value, &str, &[u16]); 4] = [
        (json!({}), "POST /auth/register without fields -> 400", &[400]),
        (
            json!({ "username": "ab", "email": "a@b.com", "password": "123456" }),
            "POST /auth/register with a short username -> 400",
            &[400],
        ),
        (
            json!({
                "username": format!("test_short_pw_{}", stamp),
                "email": format!("shortpw_{}@t.com", stamp),
                "password": "123",
            }),
            "POST /auth/register with a short password -> 400",
            &[400],
        ),
        (
            json!({
                "username": user_a.username,
                "email": user_a.email(),
                "password": TEST_PASSWORD,
            }),
            "POST /auth/register duplicate -> 400/409",
            &[400, 409],
        ),
    ];
    for (body, name, statuses) in registrations {
        runner
            .expect(
                ApiRequest::post("/auth/register").json(body),
                name,
                Expect::status_in(statuses),
            )
            .await;
        runner.pause().await;
    }

    runner
        .run(
            Step::new(
                ApiRequest::post("/auth/login")
                    .json(json!({ "email": user_a.email(), "password": TEST_PASSWORD })),
            )
            .check(
                "POST /auth/login -> 200 with token",
                Expect::status(200).and(Expect::has_key("token")),
            ),
        )
        .await;
    runner.pause().await;

    let logins: [(Value, &str, &[u16]); 3] = [
        (
            json!({ "email": user_a.email(), "password": "WrongPassword123" }),
            "POST /auth/login with a wrong password -> 401",
            &[401],
        ),
        (
            json!({ "email": "nobody@nope.com", "password": TEST_PASSWORD }),
            "POST /auth/login with an unknown email -> 401",
            &[401],
        ),
        (
            json!({}),
            "POST /auth/login without fields -> 400/401",
            &[400, 401],
        ),
    ];
    for (body, name, statuses) in logins {
        runner
            .expect(
                ApiRequest::post("/auth/login").json(body),
                name,
                Expect::status_in(statuses),
            )
            .await;
        runner.pause().await;
    }

    runner
        .expect(
            ApiRequest::get("/auth/me").bearer(&user_a.token),
            "GET /auth/me with token -> 200",
            Expect::status(200).and(Expect::has_key("user")),
        )
        .await;
    runner.pause().await;
    runner
        .expect(
            ApiRequest::get("/auth/me"),
            "GET /auth/me without token -> 401",
            Expect::status(401),
        )
        .await;
}
