//! Habit registry repository.
//!
//! Habits are never hard-deleted: delete clears `is_active` so historical
//! completions keep joinable metadata. The "one active habit per (owner,
//! name)" invariant lives in a partial unique index and surfaces here as
//! `RepositoryError::Conflict`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use habitloop_core::{CategoryId, Frequency, HabitId, UserId};

use super::RepositoryError;
use crate::models::category::CategoryRef;
use crate::models::habit::{Habit, HabitInput, HabitWithCategory};

const DUPLICATE_NAME_MESSAGE: &str = "You already have an active habit with this name";

/// Habit row as stored, without joins.
#[derive(Debug, sqlx::FromRow)]
struct HabitRow {
    id: i32,
    user_id: i32,
    category_id: Option<i32>,
    name: String,
    description: Option<String>,
    frequency: String,
    target_count: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Habit row left-joined with its category.
#[derive(Debug, sqlx::FromRow)]
struct HabitWithCategoryRow {
    id: i32,
    user_id: i32,
    category_id: Option<i32>,
    name: String,
    description: Option<String>,
    frequency: String,
    target_count: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: Option<String>,
    category_color: Option<String>,
    category_icon: Option<String>,
}

fn parse_frequency(raw: &str) -> Result<Frequency, RepositoryError> {
    Frequency::from_str(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid frequency in database: {e}")))
}

impl HabitRow {
    fn into_habit(self) -> Result<Habit, RepositoryError> {
        let frequency = parse_frequency(&self.frequency)?;
        Ok(Habit {
            id: HabitId::new(self.id),
            user_id: UserId::new(self.user_id),
            category_id: self.category_id.map(CategoryId::new),
            name: self.name,
            description: self.description,
            frequency,
            target_count: self.target_count,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl HabitWithCategoryRow {
    fn into_habit_with_category(self) -> Result<HabitWithCategory, RepositoryError> {
        let frequency = parse_frequency(&self.frequency)?;
        let category = match (self.category_name, self.category_color, self.category_icon) {
            (Some(name), Some(color), Some(icon)) => Some(CategoryRef { name, color, icon }),
            _ => None,
        };
        Ok(HabitWithCategory {
            habit: Habit {
                id: HabitId::new(self.id),
                user_id: UserId::new(self.user_id),
                category_id: self.category_id.map(CategoryId::new),
                name: self.name,
                description: self.description,
                frequency,
                target_count: self.target_count,
                is_active: self.is_active,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            category,
        })
    }
}

const SELECT_WITH_CATEGORY: &str = r"
    SELECT h.id, h.user_id, h.category_id, h.name, h.description, h.frequency,
           h.target_count, h.is_active, h.created_at, h.updated_at,
           c.name AS category_name, c.color AS category_color, c.icon AS category_icon
    FROM habits h
    LEFT JOIN categories c ON c.id = h.category_id
";

/// Repository for habit registry operations.
pub struct HabitRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HabitRepository<'a> {
    /// Create a new habit repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's habits with category snapshots, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        owner: UserId,
        active: bool,
    ) -> Result<Vec<HabitWithCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, HabitWithCategoryRow>(&format!(
            "{SELECT_WITH_CATEGORY} WHERE h.user_id = $1 AND h.is_active = $2 ORDER BY h.created_at DESC"
        ))
        .bind(owner)
        .bind(active)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(HabitWithCategoryRow::into_habit_with_category)
            .collect()
    }

    /// Get one of the user's habits with its category snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        owner: UserId,
        id: HabitId,
    ) -> Result<Option<HabitWithCategory>, RepositoryError> {
        let row = sqlx::query_as::<_, HabitWithCategoryRow>(&format!(
            "{SELECT_WITH_CATEGORY} WHERE h.id = $1 AND h.user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        row.map(HabitWithCategoryRow::into_habit_with_category)
            .transpose()
    }

    /// Get one of the user's habits only if it is active.
    ///
    /// Check-ins require an active habit; a deactivated habit is treated as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned_active(
        &self,
        owner: UserId,
        id: HabitId,
    ) -> Result<Option<Habit>, RepositoryError> {
        let row = sqlx::query_as::<_, HabitRow>(
            r"
            SELECT id, user_id, category_id, name, description, frequency,
                   target_count, is_active, created_at, updated_at
            FROM habits
            WHERE id = $1 AND user_id = $2 AND is_active = TRUE
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        row.map(HabitRow::into_habit).transpose()
    }

    /// Create a new habit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owner already has an active
    /// habit with this name, `RepositoryError::Database` otherwise.
    pub async fn create(&self, owner: UserId, input: &HabitInput) -> Result<Habit, RepositoryError> {
        let row = sqlx::query_as::<_, HabitRow>(
            r"
            INSERT INTO habits (user_id, category_id, name, description, frequency, target_count)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, category_id, name, description, frequency,
                      target_count, is_active, created_at, updated_at
            ",
        )
        .bind(owner)
        .bind(input.category_id)
        .bind(input.trimmed_name())
        .bind(input.description.as_deref())
        .bind(input.frequency.as_str())
        .bind(input.target_count_or_default())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(DUPLICATE_NAME_MESSAGE.to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_habit()
    }

    /// Update one of the user's habits.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the habit doesn't exist or is
    /// owned by another user, `RepositoryError::Conflict` on a duplicate
    /// active name, `RepositoryError::Database` otherwise.
    pub async fn update(
        &self,
        owner: UserId,
        id: HabitId,
        input: &HabitInput,
    ) -> Result<Habit, RepositoryError> {
        let row = sqlx::query_as::<_, HabitRow>(
            r"
            UPDATE habits
            SET name = $3,
                description = $4,
                frequency = $5,
                target_count = $6,
                category_id = $7,
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, category_id, name, description, frequency,
                      target_count, is_active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(owner)
        .bind(input.trimmed_name())
        .bind(input.description.as_deref())
        .bind(input.frequency.as_str())
        .bind(input.target_count_or_default())
        .bind(input.category_id)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(DUPLICATE_NAME_MESSAGE.to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.ok_or(RepositoryError::NotFound)?.into_habit()
    }

    /// Count a user's active habits. Leaderboard eligibility input.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_active_for_user(&self, owner: UserId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM habits WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Soft-delete one of the user's habits.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the habit doesn't exist or is
    /// owned by another user, `RepositoryError::Database` otherwise.
    pub async fn soft_delete(&self, owner: UserId, id: HabitId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE habits
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
