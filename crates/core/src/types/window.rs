//! Leaderboard time windows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The trailing time bound used to filter completions before ranking.
///
/// `Week` and `Month` bound completion dates from below; `All` is unbounded.
/// The reference time is always passed in by the caller so that window
/// computations are deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardWindow {
    #[default]
    Week,
    Month,
    All,
}

impl LeaderboardWindow {
    /// The inclusive lower bound on completion dates for this window,
    /// or `None` for the unbounded window.
    ///
    /// Bounds are day-granular: a completion on the boundary day counts.
    #[must_use]
    pub fn since(&self, now: DateTime<Utc>) -> Option<NaiveDate> {
        match self {
            Self::Week => Some((now - Duration::days(7)).date_naive()),
            Self::Month => Some((now - Duration::days(30)).date_naive()),
            Self::All => None,
        }
    }

    /// The lowercase token used on the wire (`period=` query parameter).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

impl fmt::Display for LeaderboardWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`LeaderboardWindow`] from a period token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid leaderboard window: {0:?} (expected \"week\", \"month\", or \"all\")")]
pub struct InvalidWindow(pub String);

impl FromStr for LeaderboardWindow {
    type Err = InvalidWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            other => Err(InvalidWindow(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 15, 30, 0).unwrap()
    }

    #[test]
    fn week_bound_is_seven_days_back() {
        let since = LeaderboardWindow::Week.since(now());
        assert_eq!(since, NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn month_bound_is_thirty_days_back() {
        let since = LeaderboardWindow::Month.since(now());
        assert_eq!(since, NaiveDate::from_ymd_opt(2023, 12, 11));
    }

    #[test]
    fn all_is_unbounded() {
        assert_eq!(LeaderboardWindow::All.since(now()), None);
    }

    #[test]
    fn parses_period_tokens() {
        assert_eq!("week".parse(), Ok(LeaderboardWindow::Week));
        assert_eq!("month".parse(), Ok(LeaderboardWindow::Month));
        assert_eq!("all".parse(), Ok(LeaderboardWindow::All));
    }

    #[test]
    fn rejects_unknown_period_tokens() {
        let err = "year".parse::<LeaderboardWindow>().unwrap_err();
        assert_eq!(err, InvalidWindow("year".to_owned()));
    }
}
