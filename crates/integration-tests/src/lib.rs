//! Integration tests for HabitLoop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p habitloop-cli -- migrate
//! cargo run -p habitloop-cli -- seed categories
//!
//! # Start the server
//! cargo run -p habitloop-server
//!
//! # Run integration tests
//! cargo test -p habitloop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `habit_checkins` - Habit CRUD and completion-log conflict semantics
//! - `social_flows` - Follow graph, leaderboard, and feed behavior
//!
//! Tests are `#[ignore]`d by default because they require a running server
//! and database; identity is supplied via the `x-user-id` header the same
//! way the upstream gateway does in production.
