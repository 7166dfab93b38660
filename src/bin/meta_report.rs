//! Prints aggregate statistics about the `meta_decks` table as JSON.
//!
//! Connection parameters come from `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`,
//! `DB_PASSWORD` and `DB_REQUIRE_SSL`.

use anyhow::Context;
use deckcheck::configuration::DatabaseSettings;
use deckcheck::meta_report;
use deckcheck::telemetry::{get_subscriber, init_subscriber};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = get_subscriber("meta_report".into(), "warn".into(), std::io::stderr);
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("Failed to initialise logging: {:?}", e);
    }

    match report().await {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn report() -> anyhow::Result<String> {
    let settings = DatabaseSettings::from_env().context("Failed to read the DB_* settings.")?;
    let json = meta_report::run(&settings).await?;
    Ok(json)
}
