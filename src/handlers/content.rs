use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::reference::{Avatar, Quote, Task};
use crate::services::content::{pick_for_mood, same_character, todays_mood_type, ContentKind};
use crate::store::{ReferenceStore, UserStore};
use crate::AppState;

/// GET /api/tasks
pub async fn random_task(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Task>> {
    let mood_type_id =
        todays_mood_type(state.store.as_ref(), state.clock.as_ref(), auth_user.id).await?;
    let tasks = state.store.tasks().await?;
    let task = pick_for_mood(ContentKind::Task, tasks, mood_type_id, |_| true, &mut rand::thread_rng())?;
    Ok(Json(task))
}

/// GET /api/quotes
pub async fn random_quote(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Quote>> {
    let mood_type_id =
        todays_mood_type(state.store.as_ref(), state.clock.as_ref(), auth_user.id).await?;
    let quotes = state.store.quotes().await?;
    let quote = pick_for_mood(ContentKind::Quote, quotes, mood_type_id, |_| true, &mut rand::thread_rng())?;
    Ok(Json(quote))
}

/// GET /api/avatars
pub async fn random_avatar(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Avatar>> {
    let mood_type_id =
        todays_mood_type(state.store.as_ref(), state.clock.as_ref(), auth_user.id).await?;

    let user = state
        .store
        .find_user(auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let selected = match user.avatar_id {
        Some(id) => state.store.find_avatar(id).await?,
        None => None,
    };

    let avatars = state.store.avatars().await?;
    let avatar = pick_for_mood(
        ContentKind::Avatar,
        avatars,
        mood_type_id,
        same_character(selected.as_ref()),
        &mut rand::thread_rng(),
    )?;
    Ok(Json(avatar))
}
