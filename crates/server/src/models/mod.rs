//! Domain types for the habit service.
//!
//! These types represent validated domain objects separate from database row
//! types; repositories convert rows into them at the boundary.

pub mod category;
pub mod completion;
pub mod habit;
pub mod social;
pub mod user;

pub use category::{Category, CategoryRef};
pub use completion::Completion;
pub use habit::{Habit, HabitInput, HabitStats, HabitWithCategory};
pub use social::{
    CandidateTally, FeedHabit, FeedItem, FeedUser, Follow, FollowedUser, FollowerUser,
    LeaderboardEntry,
};
pub use user::{UserProfile, UserSearchResult};
