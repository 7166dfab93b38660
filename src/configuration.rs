use crate::api_client::{ApiClient, RetryPolicy};
use crate::orchestrator::Pacing;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://evolution-cartinhas.8ktevp.easypanel.host";

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub harness: HarnessSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct HarnessSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub registration_delay_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub auth_cooldown_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_rate_limit_retries: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub rate_limit_backoff_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_rate_limit_backoff_milliseconds: u64,
}

impl HarnessSettings {
    pub fn client(&self) -> Result<ApiClient, reqwest::Error> {
        ApiClient::new(self.base_url.clone(), self.timeout(), self.retry_policy())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_milliseconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_rate_limit_retries,
            backoff: Duration::from_millis(self.rate_limit_backoff_milliseconds),
            max_backoff: Duration::from_millis(self.max_rate_limit_backoff_milliseconds),
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            registration_delay: Duration::from_millis(self.registration_delay_milliseconds),
            auth_cooldown: Duration::from_millis(self.auth_cooldown_milliseconds),
        }
    }
}

/// Connection parameters of the reporting database.
///
/// Read from `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` and
/// `DB_REQUIRE_SSL`, each falling back to a compiled-in default.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    #[serde(rename = "name")]
    pub database_name: String,
    #[serde(rename = "user")]
    pub username: String,
    pub password: Secret<String>,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix("DB"))
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("host", "localhost")?
            .set_default("port", 5433)?
            .set_default("name", "halder")?
            .set_default("user", "postgres")?
            .set_default("password", "postgres")?
            .set_default("require_ssl", false)?
            .add_source(environment)
            .build()?
            .try_deserialize::<DatabaseSettings>()
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            // Try an encrypted connection, fallback to unencrypted if it fails
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database_name)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("No current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `hosted` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "hosted".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .set_default("harness.base_url", DEFAULT_API_URL)?
        .set_default("harness.request_timeout_milliseconds", 30_000)?
        .set_default("harness.registration_delay_milliseconds", 3_000)?
        .set_default("harness.auth_cooldown_milliseconds", 30_000)?
        .set_default("harness.max_rate_limit_retries", 3)?
        .set_default("harness.rate_limit_backoff_milliseconds", 15_000)?
        .set_default("harness.max_rate_limit_backoff_milliseconds", 60_000)?
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_HARNESS__BASE_URL=http://localhost:8080` would set `Settings.harness.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The possible runtime environment for the harness.
pub enum Environment {
    Local,
    Hosted,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Hosted => "hosted",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "hosted" => Ok(Self::Hosted),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `hosted`.",
                other
            )),
        }
    }
}
