//! Integration tests for the follow graph, leaderboard, and activity feed.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p habitloop-server)
//! - Seeded test users with IDs 1, 2, and 3; user 3 follows nobody
//!
//! Run with: cargo test -p habitloop-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Base URL for the habit service (configurable via environment).
fn base_url() -> String {
    std::env::var("HABITLOOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create a client acting as the given user.
fn client_for(user_id: i32) -> Client {
    use reqwest::header::{HeaderMap, HeaderValue};

    let mut headers = HeaderMap::new();
    headers.insert(
        "x-user-id",
        HeaderValue::from_str(&user_id.to_string()).expect("valid header"),
    );

    Client::builder()
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// Test helper: remove a follow edge, ignoring the outcome.
async fn cleanup_follow(client: &Client, target: i32) {
    let _ = client
        .delete(format!("{}/api/social/follow/{target}", base_url()))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_follow_unfollow_roundtrip() {
    let client = client_for(1);
    cleanup_follow(&client, 2).await;

    let followed = client
        .post(format!("{}/api/social/follow/2", base_url()))
        .send()
        .await
        .expect("follow");
    assert_eq!(followed.status(), StatusCode::CREATED);

    let unfollowed = client
        .delete(format!("{}/api/social/follow/2", base_url()))
        .send()
        .await
        .expect("unfollow");
    assert_eq!(unfollowed.status(), StatusCode::OK);

    // The edge is gone; unfollowing again is a definitive 404.
    let again = client
        .delete(format!("{}/api/social/follow/2", base_url()))
        .send()
        .await
        .expect("unfollow again");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_follow_conflicts() {
    let client = client_for(1);
    cleanup_follow(&client, 2).await;

    let first = client
        .post(format!("{}/api/social/follow/2", base_url()))
        .send()
        .await
        .expect("follow");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/api/social/follow/2", base_url()))
        .send()
        .await
        .expect("duplicate follow");
    assert_eq!(second.status(), StatusCode::CONFLICT);

    cleanup_follow(&client, 2).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_self_follow_rejected() {
    let client = client_for(1);

    let resp = client
        .post(format!("{}/api/social/follow/1", base_url()))
        .send()
        .await
        .expect("self follow");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_follow_unknown_user_not_found() {
    let client = client_for(1);

    let resp = client
        .post(format!("{}/api/social/follow/999999", base_url()))
        .send()
        .await
        .expect("follow unknown");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_feed_empty_when_following_nobody() {
    // User 3 follows nobody: the feed is an empty list, not an error.
    let client = client_for(3);

    let resp = client
        .get(format!("{}/api/social/feed", base_url()))
        .send()
        .await
        .expect("feed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_leaderboard_is_ranked_and_marks_viewer() {
    let client = client_for(1);

    let resp = client
        .get(format!(
            "{}/api/social/leaderboard?period=week&limit=10",
            base_url()
        ))
        .send()
        .await
        .expect("leaderboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let entries: Vec<Value> = resp.json().await.expect("Failed to parse response");

    // Ranks are dense and 1-based; scores never increase down the board.
    for (index, entry) in entries.iter().enumerate() {
        assert_eq!(entry["rank"].as_u64(), Some(index as u64 + 1));
    }
    for pair in entries.windows(2) {
        let hi = pair[0]["totalCompletions"].as_i64().expect("count");
        let lo = pair[1]["totalCompletions"].as_i64().expect("count");
        assert!(hi >= lo);
    }

    let current: Vec<&Value> = entries
        .iter()
        .filter(|e| e["isCurrentUser"].as_bool() == Some(true))
        .collect();
    assert!(current.len() <= 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_leaderboard_rejects_unknown_period() {
    let client = client_for(1);

    let resp = client
        .get(format!(
            "{}/api/social/leaderboard?period=fortnight",
            base_url()
        ))
        .send()
        .await
        .expect("leaderboard with bad period");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_user_search_requires_two_characters() {
    let client = client_for(1);

    let resp = client
        .get(format!("{}/api/social/users/search?q=a", base_url()))
        .send()
        .await
        .expect("short search");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
