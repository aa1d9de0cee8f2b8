use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::mood::{CheckInRequest, MoodEntry, MoodPatch, MoodQuery, MoodSummary, SummaryQuery};
use crate::services::{calendar, mood_ledger};
use crate::AppState;

/// POST /api/mood
pub async fn check_in(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CheckInRequest>,
) -> AppResult<(StatusCode, Json<MoodEntry>)> {
    let result =
        mood_ledger::check_in(state.store.as_ref(), state.clock.as_ref(), auth_user.id, body).await?;
    Ok((StatusCode::CREATED, Json(result.entry)))
}

/// GET /api/mood
pub async fn get_today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MoodEntry>> {
    let today = state.clock.today();
    mood_ledger::get_for_day(state.store.as_ref(), auth_user.id, today)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No mood logged today".into()))
}

/// PATCH /api/mood
///
/// Only today's entry is editable; earlier days are closed.
pub async fn update_today(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<MoodPatch>,
) -> AppResult<Json<MoodEntry>> {
    let today = state.clock.today();
    let entry = mood_ledger::update_for_day(state.store.as_ref(), auth_user.id, today, body).await?;
    Ok(Json(entry))
}

/// GET /api/moods
pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<MoodQuery>,
) -> AppResult<Json<Vec<MoodEntry>>> {
    let entries = mood_ledger::list_range(
        state.store.as_ref(),
        auth_user.id,
        query.mood_type.as_deref(),
        query.start,
        query.end,
    )
    .await?;
    Ok(Json(entries))
}

/// GET /api/moods/:day
pub async fn get_by_day(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(raw_day): AppPath<String>,
) -> AppResult<Json<MoodEntry>> {
    let day = calendar::parse_day(&raw_day)?;
    mood_ledger::get_for_day(state.store.as_ref(), auth_user.id, day)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No mood logged for {}", day)))
}

/// GET /api/stats/moods
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<SummaryQuery>,
) -> AppResult<Json<MoodSummary>> {
    let summary =
        mood_ledger::summarize(state.store.as_ref(), auth_user.id, query.start, query.end).await?;
    Ok(Json(summary))
}
