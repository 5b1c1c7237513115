//! Consecutive-day streak computation.

use chrono::{Duration, NaiveDate};

/// Current consecutive-day streak ending at `today`.
///
/// `dates` must be the habit's completion dates sorted descending (the order
/// `CompletionRepository::completion_dates` returns). Walking from the most
/// recent date, each position is expected to be exactly `today - offset`
/// days; the first mismatch ends the streak. No completion for `today`
/// itself means the streak is 0.
///
/// `today` is injected rather than read from the wall clock so the
/// computation is a pure function of its inputs.
#[must_use]
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0u32;

    for (offset, date) in dates.iter().enumerate() {
        let expected = today - Duration::days(offset as i64);
        if *date == expected {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    #[test]
    fn empty_history_is_zero() {
        assert_eq!(current_streak(&[], d(2024, 1, 10)), 0);
    }

    #[test]
    fn no_completion_today_is_zero() {
        // Yesterday and before, but nothing today.
        let dates = [d(2024, 1, 9), d(2024, 1, 8), d(2024, 1, 7)];
        assert_eq!(current_streak(&dates, d(2024, 1, 10)), 0);
    }

    #[test]
    fn single_completion_today_is_one() {
        assert_eq!(current_streak(&[d(2024, 1, 10)], d(2024, 1, 10)), 1);
    }

    #[test]
    fn gap_terminates_the_walk() {
        // Completions on 01-10, 01-09, 01-08, then a gap before 01-06.
        let dates = [d(2024, 1, 10), d(2024, 1, 9), d(2024, 1, 8), d(2024, 1, 6)];
        assert_eq!(current_streak(&dates, d(2024, 1, 10)), 3);
    }

    #[test]
    fn unbroken_run_counts_every_day() {
        let today = d(2024, 3, 15);
        let dates: Vec<NaiveDate> = (0..14).map(|i| today - Duration::days(i)).collect();
        assert_eq!(current_streak(&dates, today), 14);
    }

    #[test]
    fn streak_spans_month_boundary() {
        let dates = [d(2024, 3, 1), d(2024, 2, 29), d(2024, 2, 28)];
        assert_eq!(current_streak(&dates, d(2024, 3, 1)), 3);
    }

    #[test]
    fn stale_history_does_not_resurrect() {
        // A long run that ended two days ago contributes nothing.
        let dates = [d(2024, 1, 8), d(2024, 1, 7), d(2024, 1, 6), d(2024, 1, 5)];
        assert_eq!(current_streak(&dates, d(2024, 1, 10)), 0);
    }
}
