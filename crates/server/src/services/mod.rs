//! Read-only aggregation services.
//!
//! Every aggregation takes an explicit reference time from the caller;
//! nothing in this module reads the wall clock or mutates state.

pub mod feed;
pub mod leaderboard;
pub mod streak;
