//! Aggregate statistics over the `meta_decks` table.
use crate::configuration::DatabaseSettings;
use serde_json::Value;
use sqlx::{Connection, PgConnection};

#[derive(Debug, serde::Serialize, sqlx::FromRow, PartialEq)]
pub struct FormatCount {
    pub format: Option<String>,
    pub c: i32,
}

#[derive(Debug, serde::Serialize)]
pub struct MetaReport {
    pub total_meta_decks: i32,
    pub by_format: Vec<FormatCount>,
    pub mtgtop8_count: i32,
    /// The newest rows as the database renders them to JSON.
    pub latest_samples: Vec<Value>,
}

#[derive(thiserror::Error, Debug)]
pub enum MetaReportError {
    #[error("Failed to connect to Postgres.")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to query the meta_decks table.")]
    Query(#[from] sqlx::Error),
    #[error("Failed to serialize the report.")]
    Serialize(#[from] serde_json::Error),
}

/// Connects, collects, disconnects and renders the report as pretty JSON.
#[tracing::instrument(name = "Building the meta deck report", skip_all, fields(host = %settings.host, database = %settings.database_name))]
pub async fn run(settings: &DatabaseSettings) -> Result<String, MetaReportError> {
    let mut connection = PgConnection::connect_with(&settings.connect_options())
        .await
        .map_err(MetaReportError::Connect)?;
    let report = collect(&mut connection).await?;
    connection.close().await?;
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn collect(connection: &mut PgConnection) -> Result<MetaReport, sqlx::Error> {
    let total_meta_decks = sqlx::query_scalar::<_, i32>("SELECT COUNT(*)::int AS c FROM meta_decks")
        .fetch_one(&mut *connection)
        .await?;

    let by_format = sqlx::query_as::<_, FormatCount>(
        r#"
        SELECT format::text AS format, COUNT(*)::int AS c
        FROM meta_decks
        GROUP BY format
        ORDER BY c DESC
        "#,
    )
    .fetch_all(&mut *connection)
    .await?;

    let mtgtop8_count = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT COUNT(*)::int AS c
        FROM meta_decks
        WHERE source_url ILIKE 'https://www.mtgtop8.com/%'
        "#,
    )
    .fetch_one(&mut *connection)
    .await?;

    let latest_samples = sqlx::query_scalar::<_, Value>(
        r#"
        SELECT row_to_json(latest)
        FROM (
            SELECT format, archetype, placement, source_url, created_at
            FROM meta_decks
            ORDER BY created_at DESC
            LIMIT 12
        ) AS latest
        "#,
    )
    .fetch_all(&mut *connection)
    .await?;
    tracing::debug!(total_meta_decks, samples = latest_samples.len(), "Collected meta deck statistics");

    Ok(MetaReport {
        total_meta_decks,
        by_format,
        mtgtop8_count,
        latest_samples,
    })
}
