use super::GroupRunner;
use crate::api_client::ApiRequest;
use crate::expect::{Expect, Step};
use crate::fixture::Fixture;
use std::collections::BTreeSet;

/// User A has been followed and messaged by now, so there is something to read.
pub async fn run(runner: &mut GroupRunner<'_>, fixture: &Fixture) {
    let token = &fixture.user_a.token;

    let listing = runner
        .run(
            Step::new(ApiRequest::get("/notifications").bearer(token))
                .check(
                    "GET /notifications -> 200 with data",
                    Expect::status(200).and(Expect::has_key("data")),
                )
                .check_with(
                    "User A has notifications (follow + DM)",
                    Expect::len("/data", 1..=usize::MAX),
                    |r| format!("count={}", r.array_at("/data").len()),
                )
                .check_with(
                    "Notifications include new_follower",
                    Expect::satisfies(|r| {
                        r.array_at("/data")
                            .iter()
                            .any(|n| n["type"] == "new_follower")
                    }),
                    |r| {
                        let types: BTreeSet<&str> = r
                            .array_at("/data")
                            .iter()
                            .filter_map(|n| n["type"].as_str())
                            .collect();
                        format!("types={:?}", types)
                    },
                ),
        )
        .await;

    runner
        .expect(
            ApiRequest::get("/notifications/count").bearer(token),
            "GET /notifications/count -> 200",
            Expect::status(200).and(Expect::has_key("unread")),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/notifications")
                .bearer(token)
                .query("unread_only", "true"),
            "GET /notifications?unread_only=true -> 200",
            Expect::status(200),
        )
        .await;

    if let Some(id) = listing
        .array_at("/data")
        .first()
        .and_then(|n| n["id"].as_str())
    {
        let path = format!("/notifications/{}/read", id);
        runner
            .expect(
                ApiRequest::put(&path).bearer(token),
                "PUT /notifications/:id/read -> 200",
                Expect::status(200),
            )
            .await;
        runner
            .expect(
                ApiRequest::put(&path).bearer(token),
                "PUT an already read notification -> 200 or 404",
                Expect::status_in(&[200, 404]),
            )
            .await;
    }

    runner
        .expect(
            ApiRequest::put("/notifications/read-all").bearer(token),
            "PUT /notifications/read-all -> 200",
            Expect::status(200).and(Expect::has_key("marked_read")),
        )
        .await;
    runner
        .run(
            Step::new(ApiRequest::get("/notifications/count").bearer(token)).check_with(
                "Unread count after read-all -> 0",
                Expect::status(200).and(Expect::equals("/unread", serde_json::json!(0))),
                |r| format!("unread={}", r.body["unread"]),
            ),
        )
        .await;
    runner
        .expect(
            ApiRequest::get("/notifications"),
            "GET /notifications without token -> 401",
            Expect::status(401),
        )
        .await;
}
