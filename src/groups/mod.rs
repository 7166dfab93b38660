//! Test groups, one per functional area of the API.

pub mod ai;
pub mod auth;
pub mod cards;
pub mod community;
pub mod conversations;
pub mod deck_advanced;
pub mod deck_cards;
pub mod deck_crud;
pub mod deck_delete;
pub mod import;
pub mod infrastructure;
pub mod notifications;
pub mod profile;
pub mod social;

use crate::api_client::{ApiClient, ApiRequest, ApiResponse};
use crate::expect::{Expect, Step};
use crate::orchestrator::Pacing;
use crate::report::Recorder;

/// Well-formed id that no resource ever has.
pub const NIL_ID: &str = "00000000-0000-0000-0000-000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Auth,
    Deck,
    DeckCards,
    DeckAdvanced,
    Ai,
    Community,
    Social,
    Profile,
    Conversations,
    Import,
    Notifications,
    Cards,
    Infrastructure,
    DeckDelete,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Auth => "AUTH",
            Category::Deck => "DECK",
            Category::DeckCards => "DECK_CARDS",
            Category::DeckAdvanced => "DECK_ADV",
            Category::Ai => "AI",
            Category::Community => "COMMUNITY",
            Category::Social => "SOCIAL",
            Category::Profile => "PROFILE",
            Category::Conversations => "DM",
            Category::Import => "IMPORT",
            Category::Notifications => "NOTIF",
            Category::Cards => "CARDS",
            Category::Infrastructure => "INFRA",
            Category::DeckDelete => "DECK_DEL",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Auth => "authentication",
            Category::Deck => "deck CRUD",
            Category::DeckCards => "deck card management",
            Category::DeckAdvanced => "advanced deck features",
            Category::Ai => "AI endpoints",
            Category::Community => "community",
            Category::Social => "follow graph",
            Category::Profile => "user profile",
            Category::Conversations => "direct messages",
            Category::Import => "deck import",
            Category::Notifications => "notifications",
            Category::Cards => "card search",
            Category::Infrastructure => "health, rules, sets and market",
            Category::DeckDelete => "deck deletion",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Executes the steps of one group and files their outcomes under its category.
pub struct GroupRunner<'a> {
    category: Category,
    client: &'a ApiClient,
    pacing: &'a Pacing,
    recorder: &'a mut Recorder,
}

impl<'a> GroupRunner<'a> {
    pub fn new(
        category: Category,
        client: &'a ApiClient,
        pacing: &'a Pacing,
        recorder: &'a mut Recorder,
    ) -> Self {
        Self {
            category,
            client,
            pacing,
            recorder,
        }
    }

    /// Sends the step's request and records one result per check.
    pub async fn run(&mut self, step: Step) -> ApiResponse {
        let response = self.client.send(&step.request).await;
        for check in &step.checks {
            let passed = check.expect.evaluate(&response);
            self.recorder.record(
                self.category.as_str(),
                check.name.as_str(),
                passed,
                check.detail(&response),
            );
        }
        response
    }

    /// Shorthand for a step with a single check.
    pub async fn expect(&mut self, request: ApiRequest, name: &str, expect: Expect) -> ApiResponse {
        self.run(Step::new(request).check(name, expect)).await
    }

    /// Sends a request whose outcome is not asserted.
    pub async fn send(&mut self, request: ApiRequest) -> ApiResponse {
        self.client.send(&request).await
    }

    /// Records an outcome that was not derived from a single response.
    pub fn record(&mut self, name: &str, passed: bool, detail: impl Into<String>) {
        self.recorder
            .record(self.category.as_str(), name, passed, detail);
    }

    /// Waits between calls to rate-limited endpoints.
    pub async fn pause(&self) {
        tokio::time::sleep(self.pacing.registration_delay).await;
    }
}

/// Prefix of an id for progress details.
pub(crate) fn short(id: &str) -> String {
    id.chars().take(8).collect()
}
