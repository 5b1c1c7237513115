//! Category read-model repository.
//!
//! Categories have no HTTP mutation surface; the default set is seeded by
//! the CLI and referenced by habits for display grouping.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use habitloop_core::CategoryId;

use super::RepositoryError;
use crate::models::category::Category;

/// The default category set seeded on first run.
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Health & Fitness", "#EF4444", "heart"),
    ("Learning", "#3B82F6", "book"),
    ("Productivity", "#10B981", "zap"),
    ("Mindfulness", "#8B5CF6", "brain"),
    ("Social", "#F59E0B", "users"),
    ("Hobbies", "#EC4899", "palette"),
    ("Finance", "#059669", "dollar-sign"),
    ("Other", "#6B7280", "more-horizontal"),
];

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    color: String,
    icon: String,
    created_at: DateTime<Utc>,
}

/// Repository for category reads and seeding.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, color, icon, created_at
            FROM categories
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Category {
                id: CategoryId::new(r.id),
                name: r.name,
                color: r.color,
                icon: r.icon,
                created_at: r.created_at,
            })
            .collect())
    }

    /// Upsert the default category set. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any upsert fails.
    pub async fn seed_defaults(&self) -> Result<(), RepositoryError> {
        for (name, color, icon) in DEFAULT_CATEGORIES.iter().copied() {
            sqlx::query(
                r"
                INSERT INTO categories (name, color, icon)
                VALUES ($1, $2, $3)
                ON CONFLICT (name) DO UPDATE SET color = EXCLUDED.color, icon = EXCLUDED.icon
                ",
            )
            .bind(name)
            .bind(color)
            .bind(icon)
            .execute(self.pool)
            .await?;
        }

        Ok(())
    }
}
