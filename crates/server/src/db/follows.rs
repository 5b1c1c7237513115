//! Follow graph repository.
//!
//! Edges are directed and unique per ordered (follower, followee) pair.
//! Self-follows are rejected before the insert and also blocked by a CHECK
//! constraint so no service instance can write one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use habitloop_core::{FollowId, UserId};

use super::RepositoryError;
use crate::models::social::{Follow, FollowedUser, FollowerUser};

#[derive(Debug, sqlx::FromRow)]
struct FollowRow {
    id: i32,
    follower_id: i32,
    following_id: i32,
    created_at: DateTime<Utc>,
}

impl From<FollowRow> for Follow {
    fn from(row: FollowRow) -> Self {
        Self {
            id: FollowId::new(row.id),
            follower_id: UserId::new(row.follower_id),
            following_id: UserId::new(row.following_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FollowedUserRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    avatar_url: Option<String>,
    followed_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct FollowerUserRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    avatar_url: Option<String>,
    followed_at: DateTime<Utc>,
    is_following_back: bool,
}

/// Repository for the directed follow graph.
pub struct FollowRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FollowRepository<'a> {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a follow edge.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::SelfFollow` when follower and followee are
    /// the same user, `RepositoryError::DuplicateFollow` when the edge
    /// already exists, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<Follow, RepositoryError> {
        if follower == followee {
            return Err(RepositoryError::SelfFollow);
        }

        let row = sqlx::query_as::<_, FollowRow>(
            r"
            INSERT INTO user_follows (follower_id, following_id)
            VALUES ($1, $2)
            RETURNING id, follower_id, following_id, created_at
            ",
        )
        .bind(follower)
        .bind(followee)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::DuplicateFollow;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Delete a follow edge.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no edge exists,
    /// `RepositoryError::Database` otherwise.
    pub async fn delete(&self, follower: UserId, followee: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM user_follows
            WHERE follower_id = $1 AND following_id = $2
            ",
        )
        .bind(follower)
        .bind(followee)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// IDs of the users `user` follows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn followees_of(&self, user: UserId) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, i32>(
            r"SELECT following_id FROM user_follows WHERE follower_id = $1",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    /// IDs of the users following `user`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn followers_of(&self, user: UserId) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, i32>(
            r"SELECT follower_id FROM user_follows WHERE following_id = $1",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    /// Whether `a` follows `b`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_following(&self, a: UserId, b: UserId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM user_follows WHERE follower_id = $1 AND following_id = $2
            )
            ",
        )
        .bind(a)
        .bind(b)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// The viewer's following list with identity fields, newest edge first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn following_list(
        &self,
        viewer: UserId,
    ) -> Result<Vec<FollowedUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, FollowedUserRow>(
            r"
            SELECT u.id, u.username, u.first_name, u.last_name, u.avatar_url,
                   f.created_at AS followed_at
            FROM user_follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            ",
        )
        .bind(viewer)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| FollowedUser {
                id: UserId::new(r.id),
                username: r.username,
                first_name: r.first_name,
                last_name: r.last_name,
                avatar_url: r.avatar_url,
                followed_at: r.followed_at,
            })
            .collect())
    }

    /// The viewer's followers list, each flagged with whether the viewer
    /// follows them back. Newest edge first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn followers_list(
        &self,
        viewer: UserId,
    ) -> Result<Vec<FollowerUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, FollowerUserRow>(
            r"
            SELECT u.id, u.username, u.first_name, u.last_name, u.avatar_url,
                   f.created_at AS followed_at,
                   (back.id IS NOT NULL) AS is_following_back
            FROM user_follows f
            JOIN users u ON u.id = f.follower_id
            LEFT JOIN user_follows back
                ON back.follower_id = $1 AND back.following_id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC
            ",
        )
        .bind(viewer)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| FollowerUser {
                id: UserId::new(r.id),
                username: r.username,
                first_name: r.first_name,
                last_name: r.last_name,
                avatar_url: r.avatar_url,
                followed_at: r.followed_at,
                is_following_back: r.is_following_back,
            })
            .collect())
    }
}
