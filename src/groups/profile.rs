use super::GroupRunner;
use crate::api_client::ApiRequest;
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use serde_json::json;

pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let token = &fixture.user_a.token;

    runner
        .expect(
            ApiRequest::get("/users/me").bearer(token),
            "GET /users/me -> 200",
            Expect::status(200).and(Expect::has_key("user")),
        )
        .await;

    let display_name = format!("Nick_{}", fixture.run_stamp);
    runner
        .run(
            Step::new(
                ApiRequest::patch("/users/me")
                    .bearer(token)
                    .json(json!({ "display_name": &display_name })),
            )
            .check("PATCH /users/me display_name -> 200", Expect::status(200))
            .check_with(
                "display_name is updated",
                Expect::equals("/user/display_name", json!(&display_name)),
                |r| format!("display_name={}", r.str_at("/user/display_name").unwrap_or_default()),
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::patch("/users/me")
                .bearer(token)
                .json(json!({ "avatar_url": "https://example.com/avatar.png" })),
            "PATCH /users/me avatar_url -> 200",
            Expect::status(200),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::patch("/users/me").bearer(token).json(json!({
                "location_state": "SP",
                "location_city": "São Paulo",
            })))
            .check("PATCH /users/me location -> 200", Expect::status(200))
            .check_with(
                "Location is stored",
                Expect::equals("/user/location_state", json!("SP"))
                    .and(Expect::equals("/user/location_city", json!("São Paulo"))),
                |r| {
                    format!(
                        "state={}, city={}",
                        r.body["user"]["location_state"], r.body["user"]["location_city"]
                    )
                },
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::patch("/users/me")
                .bearer(token)
                .json(json!({ "trade_notes": "Cash or in-person trades only" })),
            "PATCH /users/me trade_notes -> 200",
            Expect::status(200),
        )
        .await;

    for (body, name) in [
        (
            json!({ "display_name": "A".repeat(60) }),
            "PATCH display_name over 50 chars -> 400",
        ),
        (
            json!({ "avatar_url": "not-a-url" }),
            "PATCH invalid avatar_url -> 400",
        ),
        (
            json!({ "location_state": "SPP" }),
            "PATCH location_state over 2 chars -> 400",
        ),
        (json!({}), "PATCH /users/me with an empty body -> 400"),
    ] {
        runner
            .expect(
                ApiRequest::patch("/users/me").bearer(token).json(body),
                name,
                Expect::status(400),
            )
            .await;
    }

    runner
        .expect(
            ApiRequest::patch("/users/me").json(json!({ "display_name": "Hijacked" })),
            "PATCH /users/me without token -> 401",
            Expect::status(401),
        )
        .await;
}
