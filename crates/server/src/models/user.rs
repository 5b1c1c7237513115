//! User domain types.
//!
//! User accounts are owned by the external auth layer; the engine only reads
//! the public identity fields it needs for feed and leaderboard joins.

use serde::Serialize;

use habitloop_core::UserId;

/// Public identity fields for a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique user ID.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Avatar image URL, if set.
    pub avatar_url: Option<String>,
}

/// A user search hit, flagged with the viewer's follow state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResult {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    /// Whether the searching user already follows this user.
    pub is_following: bool,
}
