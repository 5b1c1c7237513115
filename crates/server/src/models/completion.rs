//! Completion event domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use habitloop_core::{CompletionId, HabitId, UserId};

/// Maximum length of a check-in note.
pub const MAX_NOTES_LEN: usize = 500;

/// One immutable event recording that a habit was done on a calendar day.
///
/// `completion_date` is the UTC calendar day the habit counts for;
/// `created_at` is when the check-in was logged. The two are independent:
/// a user may back-fill yesterday's completion today.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    /// Unique completion ID.
    pub id: CompletionId,
    /// Habit this completion belongs to.
    pub habit_id: HabitId,
    /// Owner of the habit (denormalized for per-user aggregation).
    pub user_id: UserId,
    /// The calendar day completed.
    pub completion_date: NaiveDate,
    /// Optional free-form note.
    pub notes: Option<String>,
    /// When the check-in was logged.
    pub created_at: DateTime<Utc>,
}
