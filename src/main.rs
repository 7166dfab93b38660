use clap::Parser;
use deckcheck::configuration::get_configuration;
use deckcheck::fixture::run_stamp;
use deckcheck::orchestrator::{Orchestrator, RunOutcome};
use deckcheck::telemetry::{get_subscriber, harness_filter, init_subscriber};
use std::process::ExitCode;

/// End-to-end test suite for the deck-building API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API base URL
    #[arg(long)]
    api: Option<String>,

    /// Show every request and response
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let subscriber = get_subscriber("deckcheck".into(), harness_filter(args.verbose), std::io::stderr);
    init_subscriber(subscriber)?;

    let mut configuration = get_configuration()?;
    if let Some(api) = args.api {
        configuration.harness.base_url = api;
    }
    let client = configuration.harness.client()?;

    let rule = "=".repeat(65);
    println!("{}", rule);
    println!("  DECK API END-TO-END SUITE");
    println!("  API: {}", client.base_url());
    println!("  Started: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{}", rule);

    let orchestrator = Orchestrator::new(client, configuration.harness.pacing());
    let outcome = orchestrator.run(run_stamp()).await;
    match &outcome {
        RunOutcome::SetupFailed(e) => {
            println!("\nSETUP FAILED, aborting: {}", e);
        }
        RunOutcome::Completed(summary) => {
            println!("{}", summary.render());
        }
    }

    Ok(if outcome.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
