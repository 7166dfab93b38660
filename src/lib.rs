pub mod api_client;
pub mod configuration;
pub mod expect;
pub mod fixture;
pub mod groups;
pub mod meta_report;
pub mod orchestrator;
pub mod report;
pub mod setup;
pub mod telemetry;
