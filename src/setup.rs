use crate::api_client::{ApiClient, ApiRequest, ApiResponse};
use crate::fixture::{CardIds, Fixture, Principal, TEST_PASSWORD, email_for, username_for};
use crate::orchestrator::Pacing;
use secrecy::Secret;
use serde_json::{Value, json};

pub const BASIC_LAND_NAME: &str = "Forest";
const BASIC_LAND_SEARCH_LIMIT: u32 = 50;

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("registering user {label} returned {status}: {body}")]
    Registration {
        label: &'static str,
        status: u16,
        body: Value,
    },
    #[error("registration of user {label} did not return a token and a user id")]
    MissingCredentials { label: &'static str },
    #[error("looking up card `{name}` returned {status} without results")]
    CardLookup { name: String, status: u16 },
}

/// Registers the three accounts and resolves the reference cards.
#[tracing::instrument(name = "Preparing the test fixture", skip(client, pacing))]
pub async fn prepare(
    client: &ApiClient,
    pacing: &Pacing,
    run_stamp: String,
) -> Result<Fixture, SetupError> {
    println!("\nSETUP: registering users and looking up cards...\n");

    let user_a = register(client, pacing, "A", &username_for("a", &run_stamp)).await?;
    let user_b = register(client, pacing, "B", &username_for("b", &run_stamp)).await?;
    let user_c = register(client, pacing, "C", &username_for("c", &run_stamp)).await?;

    let sol_ring = find_card(client, "Sol Ring").await?;
    println!("  Card 1: Sol Ring ({})", short_id(&sol_ring));
    let lightning_bolt = find_card(client, "Lightning Bolt").await?;
    println!("  Card 2: Lightning Bolt ({})", short_id(&lightning_bolt));
    let (basic_land_id, basic_land) = find_basic_land(client, BASIC_LAND_NAME).await?;
    println!(
        "  Card 3: {} [{}] ({})",
        basic_land["name"].as_str().unwrap_or_default(),
        basic_land["type_line"].as_str().unwrap_or_default(),
        short_id(&basic_land_id)
    );
    println!();

    let cards = CardIds {
        sol_ring,
        lightning_bolt,
        basic_land: basic_land_id,
    };
    Ok(Fixture::new(run_stamp, [user_a, user_b, user_c], cards))
}

/// Registers one account, then waits out the registration delay.
#[tracing::instrument(name = "Registering a test user", skip(client, pacing))]
async fn register(
    client: &ApiClient,
    pacing: &Pacing,
    label: &'static str,
    username: &str,
) -> Result<Principal, SetupError> {
    let response = client
        .send(&ApiRequest::post("/auth/register").json(json!({
            "username": username,
            "email": email_for(username),
            "password": TEST_PASSWORD,
        })))
        .await;
    if response.status != 201 {
        return Err(SetupError::Registration {
            label,
            status: response.status,
            body: response.body,
        });
    }
    match (response.str_at("/token"), response.str_at("/user/id")) {
        (Some(token), Some(id)) => {
            let user = Principal {
                username: username.to_string(),
                id: id.to_string(),
                token: Secret::new(token.to_string()),
            };
            println!("  User {}: {} ({})", label, user.username, short_id(&user.id));
            tokio::time::sleep(pacing.registration_delay).await;
            Ok(user)
        }
        _ => Err(SetupError::MissingCredentials { label }),
    }
}

async fn search_cards(client: &ApiClient, name: &str, limit: u32) -> ApiResponse {
    client
        .send(
            &ApiRequest::get("/cards")
                .query("name", name)
                .query("limit", limit),
        )
        .await
}

async fn find_card(client: &ApiClient, name: &str) -> Result<String, SetupError> {
    let response = search_cards(client, name, 1).await;
    response
        .array_at("/data")
        .first()
        .filter(|_| response.status == 200)
        .and_then(|card| card["id"].as_str())
        .map(str::to_string)
        .ok_or_else(|| SetupError::CardLookup {
            name: name.to_string(),
            status: response.status,
        })
}

/// The chosen printing's id, plus the card itself for the progress line.
async fn find_basic_land(client: &ApiClient, name: &str) -> Result<(String, Value), SetupError> {
    let response = search_cards(client, name, BASIC_LAND_SEARCH_LIMIT).await;
    let candidates = if response.status == 200 {
        response.array_at("/data")
    } else {
        &[]
    };
    select_basic_land(candidates, name)
        .and_then(|card| Some((card["id"].as_str()?.to_string(), card.clone())))
        .ok_or_else(|| SetupError::CardLookup {
            name: name.to_string(),
            status: response.status,
        })
}

/// Picks the printing of `name` that is a basic land.
///
/// Falls back to the first card named exactly `name`, then to the first card.
pub fn select_basic_land<'a>(cards: &'a [Value], name: &str) -> Option<&'a Value> {
    let exact_name = |card: &&Value| card["name"].as_str() == Some(name);
    cards
        .iter()
        .filter(exact_name)
        .find(|card| {
            card["type_line"]
                .as_str()
                .is_some_and(|t| t.to_lowercase().contains("basic land"))
        })
        .or_else(|| cards.iter().find(exact_name))
        .or_else(|| cards.first())
}

fn short_id(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("{}...", prefix)
}
