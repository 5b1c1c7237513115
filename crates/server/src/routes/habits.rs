//! Habit route handlers: registry CRUD, check-ins, and per-habit stats.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use habitloop_core::{CompletionId, Frequency, HabitId};

use crate::db::{
    CategoryRepository, CompletionRepository, HabitRepository, RepositoryError,
};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::category::{Category, CategoryRef};
use crate::models::completion::MAX_NOTES_LEN;
use crate::models::habit::{Habit, HabitInput, HabitStats, HabitWithCategory};
use crate::services::streak::current_streak;
use crate::state::AppState;

/// How much completion history the habit detail view returns.
const DETAIL_HISTORY_DAYS: i64 = 30;

fn habit_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Habit not found".to_string()),
        other => AppError::Database(other),
    }
}

// =============================================================================
// Response shapes
// =============================================================================

/// A habit in the list view, with category snapshot and stats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub id: HabitId,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub target_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: Option<CategoryRef>,
    pub stats: HabitStats,
}

impl HabitSummary {
    fn new(entry: HabitWithCategory, stats: HabitStats) -> Self {
        let habit = entry.habit;
        Self {
            id: habit.id,
            name: habit.name,
            description: habit.description,
            frequency: habit.frequency,
            target_count: habit.target_count,
            is_active: habit.is_active,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
            category: entry.category,
            stats,
        }
    }
}

/// One entry of the detail view's completion history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionHistoryEntry {
    pub completion_date: NaiveDate,
    pub notes: Option<String>,
}

/// The habit detail view: metadata, recent history, and current streak.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDetail {
    #[serde(flatten)]
    pub summary: HabitSummary,
    pub completions: Vec<CompletionHistoryEntry>,
    pub current_streak: u32,
}

/// Per-habit stats together with the current streak.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStatsResponse {
    #[serde(flatten)]
    pub stats: HabitStats,
    pub current_streak: u32,
}

/// Response to a successful check-in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponse {
    pub message: String,
    pub completion: CheckinCompletion,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinCompletion {
    pub id: CompletionId,
    pub completion_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Response carrying a mutated habit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitResponse {
    pub message: String,
    pub habit: Habit,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Request shapes
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter on the active flag; defaults to active habits.
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    /// Calendar day to check in for; defaults to today (UTC).
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveCheckinQuery {
    /// Calendar day to un-check-in; defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/habits/categories` - All categories, sorted by name.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// `GET /api/habits` - The user's habits with category and stats.
pub async fn index(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<HabitSummary>>> {
    let today = Utc::now().date_naive();
    let habits = HabitRepository::new(state.pool())
        .list(user, query.active.unwrap_or(true))
        .await?;

    let completions = CompletionRepository::new(state.pool());
    let mut summaries = Vec::with_capacity(habits.len());
    for entry in habits {
        let stats = completions.stats(entry.habit.id, today).await?;
        summaries.push(HabitSummary::new(entry, stats));
    }

    Ok(Json(summaries))
}

/// `GET /api/habits/{id}` - One habit with 30-day history and streak.
pub async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
) -> Result<Json<HabitDetail>> {
    let today = Utc::now().date_naive();
    let entry = HabitRepository::new(state.pool())
        .get(user, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))?;

    let completions = CompletionRepository::new(state.pool());
    let stats = completions.stats(id, today).await?;
    let history = completions
        .history(id, Some(today - Duration::days(DETAIL_HISTORY_DAYS)))
        .await?;
    let dates = completions.completion_dates(id).await?;
    let streak = current_streak(&dates, today);

    Ok(Json(HabitDetail {
        summary: HabitSummary::new(entry, stats),
        completions: history
            .into_iter()
            .map(|c| CompletionHistoryEntry {
                completion_date: c.completion_date,
                notes: c.notes,
            })
            .collect(),
        current_streak: streak,
    }))
}

/// `GET /api/habits/{id}/stats` - Aggregate stats and current streak.
pub async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
) -> Result<Json<HabitStatsResponse>> {
    let today = Utc::now().date_naive();
    HabitRepository::new(state.pool())
        .get(user, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))?;

    let completions = CompletionRepository::new(state.pool());
    let stats = completions.stats(id, today).await?;
    let dates = completions.completion_dates(id).await?;

    Ok(Json(HabitStatsResponse {
        stats,
        current_streak: current_streak(&dates, today),
    }))
}

/// `POST /api/habits` - Create a habit.
pub async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<HabitInput>,
) -> Result<(StatusCode, Json<HabitResponse>)> {
    input.validate().map_err(AppError::BadRequest)?;

    let habit = HabitRepository::new(state.pool()).create(user, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(HabitResponse {
            message: "Habit created successfully".to_string(),
            habit,
        }),
    ))
}

/// `PUT /api/habits/{id}` - Update a habit.
pub async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(input): Json<HabitInput>,
) -> Result<Json<HabitResponse>> {
    input.validate().map_err(AppError::BadRequest)?;

    let habit = HabitRepository::new(state.pool())
        .update(user, id, &input)
        .await
        .map_err(habit_not_found)?;

    Ok(Json(HabitResponse {
        message: "Habit updated successfully".to_string(),
        habit,
    }))
}

/// `DELETE /api/habits/{id}` - Soft-delete a habit.
pub async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
) -> Result<Json<MessageResponse>> {
    HabitRepository::new(state.pool())
        .soft_delete(user, id)
        .await
        .map_err(habit_not_found)?;

    Ok(Json(MessageResponse {
        message: "Habit deleted successfully".to_string(),
    }))
}

/// `POST /api/habits/{id}/checkin` - Record a completion.
pub async fn checkin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(body): Json<CheckinRequest>,
) -> Result<(StatusCode, Json<CheckinResponse>)> {
    if let Some(notes) = &body.notes
        && notes.len() > MAX_NOTES_LEN
    {
        return Err(AppError::BadRequest(format!(
            "Notes cannot exceed {MAX_NOTES_LEN} characters"
        )));
    }

    // Check-ins require an owned, active habit.
    HabitRepository::new(state.pool())
        .get_owned_active(user, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".to_string()))?;

    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());
    let completion = CompletionRepository::new(state.pool())
        .record(id, user, date, body.notes.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckinResponse {
            message: "Habit checked in successfully".to_string(),
            completion: CheckinCompletion {
                id: completion.id,
                completion_date: completion.completion_date,
                completed_at: completion.created_at,
                notes: completion.notes,
            },
        }),
    ))
}

/// `DELETE /api/habits/{id}/checkin?date=` - Remove a completion.
pub async fn remove_checkin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
    Query(query): Query<RemoveCheckinQuery>,
) -> Result<Json<MessageResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    CompletionRepository::new(state.pool())
        .remove(id, user, date)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("No completion found for this date".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(MessageResponse {
        message: "Check-in removed successfully".to_string(),
    }))
}
