use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config,
    db::{DocumentClient, DocumentDatabase},
    error::Error,
};

/// Initialize the global tracing subscriber
///
/// Verbosity is read from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connect to the document store and select the configured database
pub async fn connect_to_database(
    config: &Config,
) -> Result<(DocumentClient, DocumentDatabase), Error> {
    let client =
        DocumentClient::connect(&config.database_url, config.database_max_connections).await?;
    let db = client.database(&config.database_name);

    tracing::info!(database = %config.database_name, "Connected to document store");

    Ok((client, db))
}
