//! Completion log repository.
//!
//! The log is append-only: rows are inserted by check-ins and deleted by
//! un-check-ins, never updated. At most one completion exists per
//! (habit, completion date); the unique index decides races between
//! concurrent check-ins and the loser observes `DuplicateCompletion`.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;

use habitloop_core::{CompletionId, Frequency, HabitId, UserId};

use super::RepositoryError;
use crate::models::category::CategoryRef;
use crate::models::completion::Completion;
use crate::models::habit::HabitStats;
use crate::models::social::{FeedHabit, FeedItem, FeedUser};

#[derive(Debug, sqlx::FromRow)]
struct CompletionRow {
    id: i32,
    habit_id: i32,
    user_id: i32,
    completion_date: NaiveDate,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CompletionRow> for Completion {
    fn from(row: CompletionRow) -> Self {
        Self {
            id: CompletionId::new(row.id),
            habit_id: HabitId::new(row.habit_id),
            user_id: UserId::new(row.user_id),
            completion_date: row.completion_date,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_completions: i64,
    week_completions: i64,
    last_completion_date: Option<NaiveDate>,
}

#[derive(Debug, sqlx::FromRow)]
struct FeedRow {
    id: i32,
    completion_date: NaiveDate,
    created_at: DateTime<Utc>,
    notes: Option<String>,
    habit_name: String,
    habit_frequency: String,
    category_name: Option<String>,
    category_color: Option<String>,
    category_icon: Option<String>,
    user_id: i32,
    username: String,
    first_name: String,
    last_name: String,
    avatar_url: Option<String>,
}

impl FeedRow {
    fn into_feed_item(self) -> Result<FeedItem, RepositoryError> {
        let frequency = Frequency::from_str(&self.habit_frequency).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid frequency in database: {e}"))
        })?;
        let category = match (self.category_name, self.category_color, self.category_icon) {
            (Some(name), Some(color), Some(icon)) => Some(CategoryRef { name, color, icon }),
            _ => None,
        };
        Ok(FeedItem {
            id: CompletionId::new(self.id),
            completion_date: self.completion_date,
            completed_at: self.created_at,
            notes: self.notes,
            habit: FeedHabit {
                name: self.habit_name,
                frequency,
                category,
            },
            user: FeedUser {
                id: UserId::new(self.user_id),
                username: self.username,
                first_name: self.first_name,
                last_name: self.last_name,
                avatar_url: self.avatar_url,
            },
        })
    }
}

/// Repository for the append-only completion log.
pub struct CompletionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompletionRepository<'a> {
    /// Create a new completion repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a completion for (habit, day).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateCompletion` if a completion already
    /// exists for this habit and date, `RepositoryError::Database` otherwise.
    pub async fn record(
        &self,
        habit_id: HabitId,
        owner: UserId,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Completion, RepositoryError> {
        let row = sqlx::query_as::<_, CompletionRow>(
            r"
            INSERT INTO habit_completions (habit_id, user_id, completion_date, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, habit_id, user_id, completion_date, notes, created_at
            ",
        )
        .bind(habit_id)
        .bind(owner)
        .bind(date)
        .bind(notes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::DuplicateCompletion;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Remove the completion for (habit, day) owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no matching completion exists,
    /// `RepositoryError::Database` otherwise.
    pub async fn remove(
        &self,
        habit_id: HabitId,
        owner: UserId,
        date: NaiveDate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM habit_completions
            WHERE habit_id = $1 AND user_id = $2 AND completion_date = $3
            ",
        )
        .bind(habit_id)
        .bind(owner)
        .bind(date)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// A habit's completion history, descending by completion date.
    ///
    /// `since` bounds the history from below (inclusive) when given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history(
        &self,
        habit_id: HabitId,
        since: Option<NaiveDate>,
    ) -> Result<Vec<Completion>, RepositoryError> {
        let rows = sqlx::query_as::<_, CompletionRow>(
            r"
            SELECT id, habit_id, user_id, completion_date, notes, created_at
            FROM habit_completions
            WHERE habit_id = $1 AND ($2::date IS NULL OR completion_date >= $2)
            ORDER BY completion_date DESC
            ",
        )
        .bind(habit_id)
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Completion::from).collect())
    }

    /// A habit's completion dates, descending. Streak calculator input.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn completion_dates(
        &self,
        habit_id: HabitId,
    ) -> Result<Vec<NaiveDate>, RepositoryError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r"
            SELECT completion_date
            FROM habit_completions
            WHERE habit_id = $1
            ORDER BY completion_date DESC
            ",
        )
        .bind(habit_id)
        .fetch_all(self.pool)
        .await?;

        Ok(dates)
    }

    /// Count a user's completions, optionally bounded below by a date
    /// (inclusive, day granularity).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(
        &self,
        owner: UserId,
        since: Option<NaiveDate>,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM habit_completions
            WHERE user_id = $1 AND ($2::date IS NULL OR completion_date >= $2)
            ",
        )
        .bind(owner)
        .bind(since)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Aggregate stats for one habit relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(
        &self,
        habit_id: HabitId,
        today: NaiveDate,
    ) -> Result<HabitStats, RepositoryError> {
        let week_ago = today - Duration::days(7);
        let row = sqlx::query_as::<_, StatsRow>(
            r"
            SELECT COUNT(*) AS total_completions,
                   COUNT(*) FILTER (WHERE completion_date >= $2) AS week_completions,
                   MAX(completion_date) AS last_completion_date
            FROM habit_completions
            WHERE habit_id = $1
            ",
        )
        .bind(habit_id)
        .bind(week_ago)
        .fetch_one(self.pool)
        .await?;

        Ok(HabitStats {
            total_completions: row.total_completions,
            week_completions: row.week_completions,
            last_completion_date: row.last_completion_date,
        })
    }

    /// One page of the activity feed for the given followed users.
    ///
    /// Joins each completion with its habit (regardless of `is_active`), the
    /// habit's category, and the completing user's public identity. Only
    /// completions logged at or after `logged_since` are eligible; ordering is
    /// by logged timestamp, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` on an unparseable habit row.
    pub async fn feed_page(
        &self,
        followed: &[UserId],
        logged_since: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedItem>, RepositoryError> {
        let followed_ids: Vec<i32> = followed.iter().map(UserId::as_i32).collect();
        let rows = sqlx::query_as::<_, FeedRow>(
            r"
            SELECT co.id, co.completion_date, co.created_at, co.notes,
                   h.name AS habit_name, h.frequency AS habit_frequency,
                   ca.name AS category_name, ca.color AS category_color, ca.icon AS category_icon,
                   u.id AS user_id, u.username, u.first_name, u.last_name, u.avatar_url
            FROM habit_completions co
            JOIN habits h ON h.id = co.habit_id
            JOIN users u ON u.id = co.user_id
            LEFT JOIN categories ca ON ca.id = h.category_id
            WHERE co.user_id = ANY($1) AND co.created_at >= $2
            ORDER BY co.created_at DESC
            OFFSET $3 LIMIT $4
            ",
        )
        .bind(&followed_ids)
        .bind(logged_since)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(FeedRow::into_feed_item).collect()
    }
}
