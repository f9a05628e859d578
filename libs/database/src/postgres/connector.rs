use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use super::PostgresConfig;
use crate::common::{RetryConfig, retry_with_backoff};

/// Connect with the default pool settings.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_from_config(PostgresConfig::new(database_url)).await
}

pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(config.into_connect_options()).await
}

pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let max_connections = options.get_max_connections();
    let db = Database::connect(options).await?;
    info!(?max_connections, "connected to PostgreSQL");
    Ok(db)
}

/// Connect, retrying with exponential backoff. `None` uses [`RetryConfig::default`].
pub async fn connect_with_retry(
    database_url: &str,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    connect_from_config_with_retry(PostgresConfig::new(database_url), retry_config).await
}

pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    let options = config.into_connect_options();
    retry_with_backoff(
        || connect_with_options(options.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
}
