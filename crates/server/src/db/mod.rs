//! Database operations for the habit service's `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` - Public identity read model (accounts managed externally)
//! - `categories` - Habit categories (seeded via CLI)
//! - `habits` - Habit registry; soft-deleted via `is_active`
//! - `habit_completions` - Append-only completion log, unique per (habit, day)
//! - `user_follows` - Directed follow edges, unique per ordered pair
//!
//! All uniqueness invariants are enforced by unique indexes, not application
//! locks; conflicting inserts surface as typed errors mapped from
//! `is_unique_violation()`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p habitloop-cli -- migrate
//! ```

pub mod categories;
pub mod completions;
pub mod follows;
pub mod habits;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use completions::CompletionRepository;
pub use follows::FollowRepository;
pub use habits::HabitRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate active habit name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A completion already exists for this (habit, day).
    #[error("completion already recorded for this date")]
    DuplicateCompletion,

    /// A follow edge already exists for this (follower, followee) pair.
    #[error("follow relationship already exists")]
    DuplicateFollow,

    /// A user attempted to follow themselves.
    #[error("users cannot follow themselves")]
    SelfFollow,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
