//! Habit cadence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How often a habit is meant to be completed.
///
/// Stored as lowercase text in the database; streaks are computed on calendar
/// days for both cadences (the frequency is metadata for display and target
/// tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

impl Frequency {
    /// The lowercase database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`Frequency`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: {0:?} (expected \"daily\" or \"weekly\")")]
pub struct ParseFrequencyError(pub String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(ParseFrequencyError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tokens() {
        assert_eq!("daily".parse::<Frequency>(), Ok(Frequency::Daily));
        assert_eq!("weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!("monthly".parse::<Frequency>().is_err());
        assert!("Daily".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn round_trips_through_as_str() {
        for freq in [Frequency::Daily, Frequency::Weekly] {
            assert_eq!(freq.as_str().parse::<Frequency>(), Ok(freq));
        }
    }
}
