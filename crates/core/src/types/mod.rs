//! Core types for HabitLoop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod frequency;
pub mod id;
pub mod window;

pub use frequency::{Frequency, ParseFrequencyError};
pub use id::*;
pub use window::{InvalidWindow, LeaderboardWindow};
