//! Leaderboard aggregation.
//!
//! Ranking is split in two: the repositories fetch per-candidate tallies,
//! and [`rank_candidates`] turns them into the board with a pure
//! filter -> sort -> rank -> truncate pass that needs no storage to test.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use habitloop_core::{LeaderboardWindow, UserId};

use crate::db::{
    CompletionRepository, FollowRepository, HabitRepository, RepositoryError, UserRepository,
};
use crate::models::social::{CandidateTally, LeaderboardEntry};

/// Build the leaderboard for a viewer's social circle.
///
/// The candidate set is the viewer plus everyone they follow, deduplicated
/// (a corrupt self-follow edge cannot double-count the viewer). Each
/// candidate is tallied through the habit registry and completion log
/// contracts, then ranked by the pure stage below. `now` is the injected
/// reference time for the window bound.
///
/// # Errors
///
/// Returns `RepositoryError` if any store read fails.
pub async fn build_leaderboard(
    pool: &PgPool,
    viewer: UserId,
    window: LeaderboardWindow,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<Vec<LeaderboardEntry>, RepositoryError> {
    let mut candidates = FollowRepository::new(pool).followees_of(viewer).await?;
    candidates.push(viewer);
    candidates.sort_unstable();
    candidates.dedup();

    let profiles = UserRepository::new(pool).profiles_for(&candidates).await?;

    let habits = HabitRepository::new(pool);
    let completions = CompletionRepository::new(pool);
    let since = window.since(now);

    let mut tallies = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let active_habits = habits.count_active_for_user(profile.id).await?;
        let total_completions = completions.count_for_user(profile.id, since).await?;
        tallies.push(CandidateTally {
            user_id: profile.id,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            avatar_url: profile.avatar_url,
            active_habits,
            total_completions,
        });
    }

    Ok(rank_candidates(tallies, viewer, limit))
}

/// Rank fetched tallies into the final board.
///
/// - Candidates with no active habits are excluded entirely.
/// - Sort: completions desc, then active habits desc, then user id asc so
///   output is deterministic.
/// - Ranks are dense and 1-based by sorted position; two equal scores get
///   distinct consecutive ranks.
/// - Truncation to `limit` happens after sorting and ranking, so rank 1 is
///   always the top scorer of the full candidate set.
#[must_use]
pub fn rank_candidates(
    tallies: Vec<CandidateTally>,
    viewer: UserId,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut board: Vec<CandidateTally> = tallies
        .into_iter()
        .filter(|t| t.active_habits > 0)
        .collect();

    board.sort_by(|a, b| {
        b.total_completions
            .cmp(&a.total_completions)
            .then_with(|| b.active_habits.cmp(&a.active_habits))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    board
        .into_iter()
        .enumerate()
        .take(limit)
        .map(|(index, t)| LeaderboardEntry {
            id: t.user_id,
            username: t.username,
            first_name: t.first_name,
            last_name: t.last_name,
            avatar_url: t.avatar_url,
            total_completions: t.total_completions,
            active_habits: t.active_habits,
            is_current_user: t.user_id == viewer,
            rank: index + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(id: i32, completions: i64, habits: i64) -> CandidateTally {
        CandidateTally {
            user_id: UserId::new(id),
            username: format!("user{id}"),
            first_name: "Test".to_string(),
            last_name: format!("User{id}"),
            avatar_url: None,
            active_habits: habits,
            total_completions: completions,
        }
    }

    fn viewer() -> UserId {
        UserId::new(1)
    }

    #[test]
    fn orders_by_completions_then_active_habits() {
        // A and B tie on completions; A has more active habits.
        let board = rank_candidates(
            vec![tally(1, 1, 1), tally(3, 3, 1), tally(2, 3, 2)],
            viewer(),
            10,
        );

        let ids: Vec<i32> = board.iter().map(|e| e.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn excludes_candidates_with_no_active_habits() {
        // 50 historical completions but nothing active: not on the board.
        let board = rank_candidates(vec![tally(2, 50, 0), tally(1, 1, 1)], viewer(), 10);

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, UserId::new(1));
    }

    #[test]
    fn full_ties_break_by_user_id_ascending() {
        let board = rank_candidates(
            vec![tally(9, 2, 1), tally(4, 2, 1), tally(7, 2, 1)],
            viewer(),
            10,
        );

        let ids: Vec<i32> = board.iter().map(|e| e.id.as_i32()).collect();
        assert_eq!(ids, vec![4, 7, 9]);
    }

    #[test]
    fn truncates_after_sorting() {
        // The top scorer keeps rank 1 even when the board is cut to one row.
        let board = rank_candidates(
            vec![tally(1, 1, 1), tally(2, 9, 1), tally(3, 5, 1)],
            viewer(),
            1,
        );

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, UserId::new(2));
        assert_eq!(board[0].rank, 1);
    }

    #[test]
    fn marks_exactly_one_current_user() {
        let board = rank_candidates(
            vec![tally(1, 2, 1), tally(2, 3, 1), tally(3, 1, 1)],
            viewer(),
            10,
        );

        let current: Vec<&LeaderboardEntry> =
            board.iter().filter(|e| e.is_current_user).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, viewer());
    }

    #[test]
    fn ranks_are_a_strict_total_order() {
        let board = rank_candidates(
            vec![
                tally(1, 5, 2),
                tally(2, 5, 3),
                tally(3, 8, 1),
                tally(4, 2, 4),
                tally(5, 5, 3),
            ],
            viewer(),
            10,
        );

        for pair in board.windows(2) {
            let (hi, lo) = (&pair[0], &pair[1]);
            assert!(hi.total_completions >= lo.total_completions);
            if hi.total_completions == lo.total_completions {
                assert!(hi.active_habits >= lo.active_habits);
            }
            assert_eq!(lo.rank, hi.rank + 1);
        }
    }

    #[test]
    fn week_tie_scenario_from_dashboard() {
        // Viewer follows A (3 completions, 2 active habits) and B (3, 1):
        // A ranks first on the habit tie-break.
        let a = tally(10, 3, 2);
        let b = tally(11, 3, 1);
        let board = rank_candidates(vec![b, a], viewer(), 10);

        assert_eq!(board[0].id, UserId::new(10));
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].id, UserId::new(11));
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn empty_candidate_set_yields_empty_board() {
        assert!(rank_candidates(vec![], viewer(), 10).is_empty());
    }
}
