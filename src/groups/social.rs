use super::{GroupRunner, NIL_ID};
use crate::api_client::{ApiRequest, ApiResponse};
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use serde_json::json;

/// Follow graph: B follows A (twice), C follows A, B unfollows and re-follows A.
pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let user_a = &fixture.user_a;
    let user_b = &fixture.user_b;
    let follow_a = format!("/users/{}/follow", user_a.id);

    runner
        .expect(
            ApiRequest::post(&follow_a).bearer(&user_b.token),
            "POST /users/:id/follow (B follows A) -> 200",
            Expect::status(200).and(Expect::equals("/is_following", json!(true))),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(&follow_a).bearer(&user_b.token),
            "POST /users/:id/follow again -> 200 (idempotent)",
            Expect::status(200),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("/users/{}/follow", user_b.id)).bearer(&user_b.token),
            "POST /users/:id/follow on oneself -> 400",
            Expect::status(400),
        )
        .await;
    runner
        .expect(
            ApiRequest::post(format!("/users/{}/follow", NIL_ID)).bearer(&user_b.token),
            "POST /users/:id/follow unknown user -> 404",
            Expect::status(404),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get(&follow_a).bearer(&user_b.token)).check_with(
                "GET /users/:id/follow status -> 200 is_following=true",
                Expect::status(200).and(Expect::equals("/is_following", json!(true))),
                following_detail,
            ),
        )
        .await;

    let user_b_id = user_b.id.clone();
    runner
        .run(
            Step::new(
                ApiRequest::get(format!("/users/{}/followers", user_a.id)).bearer(&user_a.token),
            )
            .check(
                "GET /users/:id/followers -> 200 with data",
                Expect::status(200).and(Expect::has_key("data")),
            )
            .check_with(
                "Followers include user B",
                Expect::satisfies(move |r| lists_user(r, &user_b_id)),
                |r| format!("follower_count={}", total_or_len(r)),
            ),
        )
        .await;
    let user_a_id = user_a.id.clone();
    runner
        .run(
            Step::new(
                ApiRequest::get(format!("/users/{}/following", user_b.id)).bearer(&user_b.token),
            )
            .check(
                "GET /users/:id/following -> 200 with data",
                Expect::status(200).and(Expect::has_key("data")),
            )
            .check_with(
                "Following includes user A",
                Expect::satisfies(move |r| lists_user(r, &user_a_id)),
                |r| format!("total={}", total_or_len(r)),
            ),
        )
        .await;

    // A second follower gives the notification and feed checks something to find
    runner
        .send(ApiRequest::post(&follow_a).bearer(&fixture.user_c.token))
        .await;

    let feed = runner
        .send(
            ApiRequest::get("/community/decks")
                .query("following", "true")
                .bearer(&user_b.token),
        )
        .await;
    if feed.status == 200 && feed.has_key("data") {
        runner.record(
            "Deck feed of followed users -> 200",
            true,
            format!("Got {}", feed.status),
        );
    } else {
        runner
            .expect(
                ApiRequest::get("/community/decks/following").bearer(&user_b.token),
                "Deck feed of followed users -> 200",
                Expect::status(200),
            )
            .await;
    }

    runner
        .expect(
            ApiRequest::delete(&follow_a).bearer(&user_b.token),
            "DELETE /users/:id/follow (unfollow) -> 200",
            Expect::status(200).and(Expect::equals("/is_following", json!(false))),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get(&follow_a).bearer(&user_b.token)).check_with(
                "GET follow status after unfollow -> is_following=false",
                Expect::status(200).and(Expect::equals("/is_following", json!(false))),
                following_detail,
            ),
        )
        .await;

    // Later groups expect B to follow A
    runner
        .send(ApiRequest::post(&follow_a).bearer(&user_b.token))
        .await;
}

fn following_detail(response: &ApiResponse) -> String {
    format!(
        "Got {}, is_following={}",
        response.status, response.body["is_following"]
    )
}

fn lists_user(response: &ApiResponse, user_id: &str) -> bool {
    response
        .array_at("/data")
        .iter()
        .any(|user| user["id"] == user_id)
}

fn total_or_len(response: &ApiResponse) -> u64 {
    response
        .at("/total")
        .and_then(|total| total.as_u64())
        .unwrap_or(response.array_at("/data").len() as u64)
}
