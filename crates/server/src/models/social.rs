//! Social graph and aggregation output types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use habitloop_core::{CompletionId, FollowId, Frequency, UserId};

use super::category::CategoryRef;

/// A directed follow edge between two users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    /// Unique edge ID.
    pub id: FollowId,
    /// The observing user.
    pub follower_id: UserId,
    /// The observed user.
    pub following_id: UserId,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

/// A user in the viewer's following list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowedUser {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub followed_at: DateTime<Utc>,
}

/// A user in the viewer's followers list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerUser {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub followed_at: DateTime<Utc>,
    /// Whether the viewer follows this follower back.
    pub is_following_back: bool,
}

/// One row of the leaderboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    /// Completions within the requested window.
    pub total_completions: i64,
    /// Count of the user's active habits.
    pub active_habits: i64,
    /// Exactly one entry per board carries this flag.
    pub is_current_user: bool,
    /// Dense 1-based rank by sorted position.
    pub rank: usize,
}

/// Per-candidate tallies fetched from the stores before ranking.
#[derive(Debug, Clone)]
pub struct CandidateTally {
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub active_habits: i64,
    pub total_completions: i64,
}

/// The habit snapshot embedded in a feed item.
///
/// Taken from the joined habit row at query time, so a habit deactivated
/// after the completion was logged still renders correctly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedHabit {
    pub name: String,
    pub frequency: Frequency,
    pub category: Option<CategoryRef>,
}

/// The public identity embedded in a feed item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedUser {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

/// One activity-feed item: a followed user's completion with its joins.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: CompletionId,
    pub completion_date: NaiveDate,
    /// When the check-in was logged (the feed's sort key).
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub habit: FeedHabit,
    pub user: FeedUser,
}
