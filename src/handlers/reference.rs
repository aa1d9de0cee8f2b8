use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::models::reference::{CreateMoodTypeRequest, CreateTaskRequest, MoodType, Reason, Task};
use crate::store::ReferenceStore;
use crate::AppState;

pub async fn list_mood_types(State(state): State<AppState>) -> AppResult<Json<Vec<MoodType>>> {
    Ok(Json(state.store.mood_types().await?))
}

pub async fn create_mood_type(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateMoodTypeRequest>,
) -> AppResult<(StatusCode, Json<MoodType>)> {
    let body = CreateMoodTypeRequest {
        name: body.name.trim().to_string(),
    };
    body.validate()?;
    let mood_type = state.store.create_mood_type(&body.name).await?;
    tracing::info!(mood_type = %mood_type.name, "Mood type created");
    Ok((StatusCode::CREATED, Json(mood_type)))
}

pub async fn delete_mood_type(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> AppResult<Json<Value>> {
    if !state.store.delete_mood_type(&name).await? {
        return Err(AppError::NotFound(format!("Mood type '{}' not found", name)));
    }
    tracing::info!(mood_type = %name, "Mood type deleted");
    Ok(Json(json!({ "deleted": true })))
}

pub async fn list_reasons(State(state): State<AppState>) -> AppResult<Json<Vec<Reason>>> {
    Ok(Json(state.store.reasons().await?))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let body = CreateTaskRequest {
        text: body.text.trim().to_string(),
        mood_type: body.mood_type.trim().to_string(),
    };
    body.validate()?;
    let mood_type = state
        .store
        .mood_type_by_name(&body.mood_type)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown mood type '{}'", body.mood_type)))?;

    let task = state.store.create_task(&body.text, mood_type.id).await?;
    Ok((StatusCode::CREATED, Json(task)))
}
