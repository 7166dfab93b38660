use crate::api_client::ApiClient;
use crate::fixture::Fixture;
use crate::groups::{
    Category, GroupRunner, ai, auth, cards, community, conversations, deck_advanced, deck_cards,
    deck_crud, deck_delete, import, infrastructure, notifications, profile, social,
};
use crate::report::{Recorder, Summary};
use crate::setup::{self, SetupError};
use std::time::Duration;

/// Client-side pacing towards the API's rate limiter.
#[derive(Clone, Debug)]
pub struct Pacing {
    /// Pause after every registration and between authentication calls.
    pub registration_delay: Duration,
    /// Pause before the authentication group, once the other groups are done.
    pub auth_cooldown: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            registration_delay: Duration::from_secs(3),
            auth_cooldown: Duration::from_secs(30),
        }
    }
}

impl Pacing {
    pub fn immediate() -> Self {
        Self {
            registration_delay: Duration::ZERO,
            auth_cooldown: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    SetupFailed(SetupError),
    Completed(Summary),
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        match self {
            RunOutcome::SetupFailed(_) => false,
            RunOutcome::Completed(summary) => summary.passed(),
        }
    }
}

pub struct Orchestrator {
    client: ApiClient,
    pacing: Pacing,
}

impl Orchestrator {
    pub fn new(client: ApiClient, pacing: Pacing) -> Self {
        Self { client, pacing }
    }

    /// Prepares the fixture, then runs every group in order.
    #[tracing::instrument(name = "Running the end-to-end suite", skip_all, fields(api = %self.client.base_url()))]
    pub async fn run(&self, run_stamp: String) -> RunOutcome {
        let mut fixture = match setup::prepare(&self.client, &self.pacing, run_stamp).await {
            Ok(fixture) => fixture,
            Err(e) => {
                tracing::error!(error.message = %e, "Setup failed");
                return RunOutcome::SetupFailed(e);
            }
        };
        let mut recorder = Recorder::echoing();
        self.run_groups(&mut fixture, &mut recorder).await;
        RunOutcome::Completed(recorder.summary())
    }

    pub async fn run_groups(&self, fixture: &mut Fixture, recorder: &mut Recorder) {
        deck_crud::run(&mut self.runner(Category::Deck, recorder), fixture).await;
        deck_cards::run(&mut self.runner(Category::DeckCards, recorder), fixture).await;
        deck_advanced::run(&mut self.runner(Category::DeckAdvanced, recorder), fixture).await;
        ai::run(&mut self.runner(Category::Ai, recorder), fixture).await;
        community::run(&mut self.runner(Category::Community, recorder), fixture).await;
        social::run(&mut self.runner(Category::Social, recorder), fixture).await;
        profile::run(&mut self.runner(Category::Profile, recorder), fixture).await;
        conversations::run(&mut self.runner(Category::Conversations, recorder), fixture).await;
        import::run(&mut self.runner(Category::Import, recorder), fixture).await;
        notifications::run(&mut self.runner(Category::Notifications, recorder), fixture).await;
        cards::run(&mut self.runner(Category::Cards, recorder)).await;
        infrastructure::run(&mut self.runner(Category::Infrastructure, recorder), fixture).await;
        deck_delete::run(&mut self.runner(Category::DeckDelete, recorder), fixture).await;

        // The earlier groups use up the rate-limit window the auth endpoints share
        println!(
            "\n  Waiting {}s for the rate-limit window to expire...",
            self.pacing.auth_cooldown.as_secs()
        );
        tokio::time::sleep(self.pacing.auth_cooldown).await;
        auth::run(&mut self.runner(Category::Auth, recorder), fixture).await;
    }

    fn runner<'a>(&'a self, category: Category, recorder: &'a mut Recorder) -> GroupRunner<'a> {
        println!("\n{} TESTS ({})", category, category.title());
        GroupRunner::new(category, &self.client, &self.pacing, recorder)
    }
}
