//! Integration tests for habit CRUD and check-in conflict semantics.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p habitloop-server)
//! - Seeded test users with IDs 1 and 2
//!
//! Run with: cargo test -p habitloop-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the habit service (configurable via environment).
fn base_url() -> String {
    std::env::var("HABITLOOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create a client acting as the given user, the way the upstream gateway
/// does: identity arrives in the `x-user-id` header.
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

/// Test helper: create a habit and return its ID.
async fn create_test_habit(client: &Client, name: &str) -> i32 {
    let resp = client
        .post(format!("{}/api/habits", base_url()))
        .json(&json!({
            "name": name,
            "frequency": "daily",
            "targetCount": 1
        }))
        .send()
        .await
        .expect("Failed to create test habit");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    body["habit"]["id"].as_i64().expect("habit id") as i32
}

/// Test helper: soft-delete a habit.
async fn delete_test_habit(client: &Client, habit_id: i32) {
    let _ = client
        .delete(format!("{}/api/habits/{habit_id}", base_url()))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkin_twice_conflicts() {
    let client = client_for(1);
    let habit_id = create_test_habit(&client, "integration-checkin-conflict").await;

    let checkin = json!({ "date": "2024-06-01" });

    let first = client
        .post(format!("{}/api/habits/{habit_id}/checkin", base_url()))
        .json(&checkin)
        .send()
        .await
        .expect("first checkin");
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same (habit, date) again: the unique index decides, we observe 409.
    let second = client
        .post(format!("{}/api/habits/{habit_id}/checkin", base_url()))
        .json(&checkin)
        .send()
        .await
        .expect("second checkin");
    assert_eq!(second.status(), StatusCode::CONFLICT);

    delete_test_habit(&client, habit_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_remove_checkin_then_missing() {
    let client = client_for(1);
    let habit_id = create_test_habit(&client, "integration-uncheckin").await;

    let checkin = json!({ "date": "2024-06-02" });
    let created = client
        .post(format!("{}/api/habits/{habit_id}/checkin", base_url()))
        .json(&checkin)
        .send()
        .await
        .expect("checkin");
    assert_eq!(created.status(), StatusCode::CREATED);

    let removed = client
        .delete(format!(
            "{}/api/habits/{habit_id}/checkin?date=2024-06-02",
            base_url()
        ))
        .send()
        .await
        .expect("remove checkin");
    assert_eq!(removed.status(), StatusCode::OK);

    // Removing again is a definitive not-found, not a retryable error.
    let again = client
        .delete(format!(
            "{}/api/habits/{habit_id}/checkin?date=2024-06-02",
            base_url()
        ))
        .send()
        .await
        .expect("remove checkin again");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    delete_test_habit(&client, habit_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_active_habit_name_conflicts() {
    let client = client_for(1);
    let habit_id = create_test_habit(&client, "integration-dup-name").await;

    let resp = client
        .post(format!("{}/api/habits", base_url()))
        .json(&json!({
            "name": "integration-dup-name",
            "frequency": "daily"
        }))
        .send()
        .await
        .expect("duplicate create");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Soft-deleting frees the name for reuse.
    delete_test_habit(&client, habit_id).await;
    let reused = create_test_habit(&client, "integration-dup-name").await;
    delete_test_habit(&client, reused).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_habit_detail_includes_streak_and_history() {
    let client = client_for(1);
    let habit_id = create_test_habit(&client, "integration-detail").await;

    let resp = client
        .get(format!("{}/api/habits/{habit_id}", base_url()))
        .send()
        .await
        .expect("habit detail");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["currentStreak"].is_u64());
    assert!(body["completions"].is_array());
    assert!(body["stats"]["totalCompletions"].is_i64());

    delete_test_habit(&client, habit_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_requests_without_identity_are_unauthorized() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/habits", base_url()))
        .send()
        .await
        .expect("unauthenticated request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_other_users_habits_are_invisible() {
    let owner = client_for(1);
    let stranger = client_for(2);
    let habit_id = create_test_habit(&owner, "integration-ownership").await;

    let resp = stranger
        .get(format!("{}/api/habits/{habit_id}", base_url()))
        .send()
        .await
        .expect("cross-user fetch");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    delete_test_habit(&owner, habit_id).await;
}
