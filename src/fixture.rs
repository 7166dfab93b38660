use secrecy::Secret;

/// Password shared by every account the harness registers.
pub const TEST_PASSWORD: &str = "Test1234";

/// A registered account: bearer token plus the id the API assigned to it.
#[derive(Clone, Debug)]
pub struct Principal {
    pub username: String,
    pub id: String,
    pub token: Secret<String>,
}

impl Principal {
    pub fn email(&self) -> String {
        email_for(&self.username)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CardIds {
    pub sol_ring: String,
    pub lightning_bolt: String,
    /// A basic land printing, so decks may hold any number of copies.
    pub basic_land: String,
}

/// Run-scoped state shared by the test groups.
///
/// Setup fills in users and cards; the deck groups record the decks they
/// create so later groups can reuse them.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub run_stamp: String,
    pub user_a: Principal,
    pub user_b: Principal,
    pub user_c: Principal,
    pub cards: CardIds,
    pub deck_a_id: String,
    pub deck_b_id: String,
}

impl Fixture {
    pub fn new(run_stamp: String, users: [Principal; 3], cards: CardIds) -> Self {
        let [user_a, user_b, user_c] = users;
        Self {
            run_stamp,
            user_a,
            user_b,
            user_c,
            cards,
            deck_a_id: String::new(),
            deck_b_id: String::new(),
        }
    }

    /// Unique per-run name, e.g. `Test Deck A 1718000000`.
    pub fn stamped(&self, prefix: &str) -> String {
        format!("{} {}", prefix, self.run_stamp)
    }
}

/// Seconds since the epoch, used to keep usernames unique across runs.
pub fn run_stamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

pub fn username_for(role: &str, run_stamp: &str) -> String {
    format!("gen_{}_{}", role, run_stamp)
}

pub fn email_for(username: &str) -> String {
    format!("{}@test.com", username)
}
