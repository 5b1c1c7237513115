//! HTTP route handlers for the habit service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (DB connectivity)
//!
//! # Habits
//! GET    /api/habits/categories      - List categories
//! GET    /api/habits                 - List habits (+stats)
//! POST   /api/habits                 - Create habit
//! GET    /api/habits/{id}            - Habit detail (+history, +streak)
//! PUT    /api/habits/{id}            - Update habit
//! DELETE /api/habits/{id}            - Soft-delete habit
//! GET    /api/habits/{id}/stats      - Habit stats and streak
//! POST   /api/habits/{id}/checkin    - Record completion
//! DELETE /api/habits/{id}/checkin    - Remove completion (?date=)
//!
//! # Social
//! GET    /api/social/users/search    - Search users (?q=&limit=)
//! GET    /api/social/following       - Following list
//! GET    /api/social/followers       - Followers list (+follows-back)
//! POST   /api/social/follow/{id}     - Follow user
//! DELETE /api/social/follow/{id}     - Unfollow user
//! GET    /api/social/feed            - Activity feed (?limit=&offset=)
//! GET    /api/social/leaderboard     - Leaderboard (?period=&limit=)
//! ```
//!
//! All `/api/*` routes require the upstream gateway's `x-user-id` header.

pub mod habits;
pub mod social;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the habit routes router.
pub fn habit_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(habits::categories))
        .route("/", get(habits::index).post(habits::create))
        .route(
            "/{id}",
            get(habits::show).put(habits::update).delete(habits::destroy),
        )
        .route("/{id}/stats", get(habits::stats))
        .route(
            "/{id}/checkin",
            post(habits::checkin).delete(habits::remove_checkin),
        )
}

/// Create the social routes router.
pub fn social_routes() -> Router<AppState> {
    Router::new()
        .route("/users/search", get(social::search_users))
        .route("/following", get(social::following))
        .route("/followers", get(social::followers))
        .route(
            "/follow/{user_id}",
            post(social::follow).delete(social::unfollow),
        )
        .route("/feed", get(social::activity_feed))
        .route("/leaderboard", get(social::leaderboard))
}

/// Create all routes for the habit service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/habits", habit_routes())
        .nest("/api/social", social_routes())
}
