//! Social route handlers: follow graph, user search, feed, and leaderboard.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

use habitloop_core::{LeaderboardWindow, UserId};

use crate::db::{FollowRepository, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::social::{FeedItem, FollowedUser, FollowerUser, LeaderboardEntry};
use crate::models::user::UserSearchResult;
use crate::routes::habits::MessageResponse;
use crate::services::{feed, leaderboard};
use crate::state::AppState;

/// Minimum length of a user search query.
const MIN_SEARCH_QUERY_LEN: usize = 2;
/// Upper bound on page sizes; all reads are bounded.
const MAX_PAGE_LIMIT: i64 = 100;

/// Validate a caller-supplied page limit against `1..=MAX_PAGE_LIMIT`.
fn page_limit(requested: Option<i64>, default: i64) -> Result<i64> {
    let limit = requested.unwrap_or(default);
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }
    Ok(limit)
}

// =============================================================================
// Request shapes
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub period: Option<String>,
    pub limit: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/social/users/search?q=&limit=` - Search users to follow.
pub async fn search_users(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserSearchResult>>> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.len() < MIN_SEARCH_QUERY_LEN {
        return Err(AppError::BadRequest(
            "Search query must be at least 2 characters".to_string(),
        ));
    }
    let limit = page_limit(query.limit, 10)?;

    let results = UserRepository::new(state.pool()).search(user, q, limit).await?;
    Ok(Json(results))
}

/// `GET /api/social/following` - Users the viewer follows.
pub async fn following(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<FollowedUser>>> {
    let list = FollowRepository::new(state.pool()).following_list(user).await?;
    Ok(Json(list))
}

/// `GET /api/social/followers` - Users following the viewer, with
/// follows-back flags.
pub async fn followers(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<FollowerUser>>> {
    let list = FollowRepository::new(state.pool()).followers_list(user).await?;
    Ok(Json(list))
}

/// `POST /api/social/follow/{user_id}` - Follow a user.
pub async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(target): Path<UserId>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    // A follow target that doesn't exist is a 404, not a foreign-key error.
    if !UserRepository::new(state.pool()).exists(target).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    FollowRepository::new(state.pool()).create(user, target).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Successfully followed user".to_string(),
        }),
    ))
}

/// `DELETE /api/social/follow/{user_id}` - Unfollow a user.
pub async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(target): Path<UserId>,
) -> Result<Json<MessageResponse>> {
    FollowRepository::new(state.pool())
        .delete(user, target)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Follow relationship not found".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(MessageResponse {
        message: "Successfully unfollowed user".to_string(),
    }))
}

/// `GET /api/social/feed?limit=&offset=` - Followed users' recent activity.
pub async fn activity_feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<FeedItem>>> {
    let limit = page_limit(query.limit, 20)?;
    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::BadRequest("offset must not be negative".to_string()));
    }

    let items = feed::build_feed(state.pool(), user, limit, offset, Utc::now()).await?;
    Ok(Json(items))
}

/// `GET /api/social/leaderboard?period=&limit=` - Ranked social circle.
pub async fn leaderboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let window: LeaderboardWindow = query
        .period
        .as_deref()
        .unwrap_or(LeaderboardWindow::Week.as_str())
        .parse()?;
    let limit = page_limit(query.limit, 10)?;

    #[allow(clippy::cast_sign_loss)]
    let entries =
        leaderboard::build_leaderboard(state.pool(), user, window, limit as usize, Utc::now())
            .await?;
    Ok(Json(entries))
}
