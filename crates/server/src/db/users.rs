//! User read-model repository.
//!
//! Accounts are created and mutated by the external auth layer; this
//! repository only reads the public identity fields the engine joins into
//! search results, leaderboards, and feeds.

use sqlx::PgPool;

use habitloop_core::UserId;

use super::RepositoryError;
use crate::models::user::{UserProfile, UserSearchResult};

#[derive(Debug, sqlx::FromRow)]
struct UserProfileRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    avatar_url: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserSearchRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    avatar_url: Option<String>,
    is_following: bool,
}

/// Repository for user identity reads.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's public profile by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_public(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r"
            SELECT id, username, first_name, last_name, avatar_url
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| UserProfile {
            id: UserId::new(r.id),
            username: r.username,
            first_name: r.first_name,
            last_name: r.last_name,
            avatar_url: r.avatar_url,
        }))
    }

    /// Whether a user exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        let exists =
            sqlx::query_scalar::<_, bool>(r"SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Case-insensitive substring search over username and names, excluding
    /// the viewer, each hit flagged with the viewer's follow state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        viewer: UserId,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserSearchResult>, RepositoryError> {
        let pattern = format!("%{}%", query.trim());
        let rows = sqlx::query_as::<_, UserSearchRow>(
            r"
            SELECT u.id, u.username, u.first_name, u.last_name, u.avatar_url,
                   (f.id IS NOT NULL) AS is_following
            FROM users u
            LEFT JOIN user_follows f
                ON f.follower_id = $1 AND f.following_id = u.id
            WHERE u.id <> $1
              AND (u.username ILIKE $2 OR u.first_name ILIKE $2 OR u.last_name ILIKE $2)
            ORDER BY u.username ASC
            LIMIT $3
            ",
        )
        .bind(viewer)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserSearchResult {
                id: UserId::new(r.id),
                username: r.username,
                first_name: r.first_name,
                last_name: r.last_name,
                avatar_url: r.avatar_url,
                is_following: r.is_following,
            })
            .collect())
    }

    /// Public profiles for a set of users, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn profiles_for(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserProfile>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(UserId::as_i32).collect();
        let rows = sqlx::query_as::<_, UserProfileRow>(
            r"
            SELECT id, username, first_name, last_name, avatar_url
            FROM users
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserProfile {
                id: UserId::new(r.id),
                username: r.username,
                first_name: r.first_name,
                last_name: r.last_name,
                avatar_url: r.avatar_url,
            })
            .collect())
    }
}
