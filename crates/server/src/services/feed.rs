//! Activity feed assembly.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use habitloop_core::UserId;

use crate::db::{CompletionRepository, FollowRepository, RepositoryError};
use crate::models::social::FeedItem;

/// How far back (from `now`) logged completions are eligible for the feed.
const FEED_WINDOW_DAYS: i64 = 7;

/// Build one page of the viewer's activity feed.
///
/// The feed shows completions logged by followed users within the trailing
/// seven days of `now`, newest first, paginated by `offset`/`limit` counted
/// from the most recent item. The viewer's own completions are excluded; a
/// viewer following nobody gets an empty page, not an error.
///
/// The window is keyed on when a completion was *logged* (`created_at`), not
/// the day it counts for, so back-filled check-ins surface when they happen.
///
/// # Errors
///
/// Returns `RepositoryError` if any store read fails.
pub async fn build_feed(
    pool: &PgPool,
    viewer: UserId,
    limit: i64,
    offset: i64,
    now: DateTime<Utc>,
) -> Result<Vec<FeedItem>, RepositoryError> {
    let followed = FollowRepository::new(pool).followees_of(viewer).await?;
    if followed.is_empty() {
        return Ok(Vec::new());
    }

    let logged_since = now - Duration::days(FEED_WINDOW_DAYS);
    CompletionRepository::new(pool)
        .feed_page(&followed, logged_since, limit, offset)
        .await
}
