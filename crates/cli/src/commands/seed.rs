//! Reference-data seeding commands.

use thiserror::Error;

use habitloop_server::config::{ConfigError, ServerConfig};
use habitloop_server::db::{self, CategoryRepository, RepositoryError};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Upsert the default habit categories. Idempotent.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an upsert fails.
pub async fn categories() -> Result<(), SeedError> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Seeding default categories...");
    CategoryRepository::new(&pool).seed_defaults().await?;

    tracing::info!("Default categories seeded!");
    Ok(())
}
