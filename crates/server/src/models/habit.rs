//! Habit domain types and input validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use habitloop_core::{CategoryId, Frequency, HabitId, UserId};

use super::category::CategoryRef;

/// Maximum length of a habit name.
pub const MAX_NAME_LEN: usize = 255;
/// Maximum length of a habit description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Allowed range for the per-period target count.
pub const TARGET_COUNT_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

/// A habit (domain type).
///
/// Habits are soft-deleted: `is_active` is cleared instead of removing the
/// row, so historical completions keep their joinable metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique habit ID.
    pub id: HabitId,
    /// User who owns this habit.
    pub user_id: UserId,
    /// Optional category reference.
    pub category_id: Option<CategoryId>,
    /// Habit name (unique per owner among active habits).
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Cadence: daily or weekly.
    pub frequency: Frequency,
    /// Target completions per period (1-10).
    pub target_count: i32,
    /// Whether the habit is active.
    pub is_active: bool,
    /// When the habit was created.
    pub created_at: DateTime<Utc>,
    /// When the habit was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A habit joined with its category snapshot.
#[derive(Debug, Clone)]
pub struct HabitWithCategory {
    pub habit: Habit,
    pub category: Option<CategoryRef>,
}

/// Aggregate completion statistics for one habit.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    /// All-time completion count.
    pub total_completions: i64,
    /// Completions in the trailing seven days (inclusive bound).
    pub week_completions: i64,
    /// Most recent completion date, if any.
    pub last_completion_date: Option<NaiveDate>,
}

/// Input payload for creating or updating a habit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub target_count: Option<i32>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Only honored on update; ignored on create.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl HabitInput {
    /// Validate field constraints before any store access.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message describing the first violation.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Habit name is required".to_string());
        }
        if name.len() > MAX_NAME_LEN {
            return Err(format!("Habit name cannot exceed {MAX_NAME_LEN} characters"));
        }
        if let Some(description) = &self.description
            && description.len() > MAX_DESCRIPTION_LEN
        {
            return Err(format!(
                "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            ));
        }
        if let Some(target) = self.target_count
            && !TARGET_COUNT_RANGE.contains(&target)
        {
            return Err("Target count must be between 1 and 10".to_string());
        }
        Ok(())
    }

    /// The target count to store, defaulting to 1 when omitted.
    #[must_use]
    pub fn target_count_or_default(&self) -> i32 {
        self.target_count.unwrap_or(1)
    }

    /// The trimmed habit name.
    #[must_use]
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, target: Option<i32>) -> HabitInput {
        HabitInput {
            name: name.to_string(),
            description: None,
            frequency: Frequency::Daily,
            target_count: target,
            category_id: None,
            is_active: None,
        }
    }

    #[test]
    fn accepts_minimal_input() {
        assert!(input("Read", None).validate().is_ok());
        assert_eq!(input("Read", None).target_count_or_default(), 1);
    }

    #[test]
    fn rejects_blank_name() {
        assert!(input("", None).validate().is_err());
        assert!(input("   ", None).validate().is_err());
    }

    #[test]
    fn rejects_overlong_name() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(input(&long, None).validate().is_err());
    }

    #[test]
    fn rejects_target_count_out_of_range() {
        assert!(input("Read", Some(0)).validate().is_err());
        assert!(input("Read", Some(11)).validate().is_err());
        assert!(input("Read", Some(1)).validate().is_ok());
        assert!(input("Read", Some(10)).validate().is_ok());
    }

    #[test]
    fn rejects_overlong_description() {
        let mut habit = input("Read", None);
        habit.description = Some("x".repeat(MAX_DESCRIPTION_LEN + 1));
        assert!(habit.validate().is_err());
    }

    #[test]
    fn trims_name() {
        assert_eq!(input("  Read  ", None).trimmed_name(), "Read");
    }
}
