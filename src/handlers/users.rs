use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::create_access_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::user::{
    is_valid_reminder_time, normalize_email, AuthResponse, LoginRequest, NewUser, RegisterRequest,
    Reminder, ReminderRequest, UpdateAvatarRequest, User, UserProfile, DEFAULT_REMINDER_TIME,
};
use crate::services::streak::{read_streak, Streak};
use crate::store::{ReferenceStore, UserStore};
use crate::AppState;

fn issue_session(user: User, state: &AppState) -> AppResult<AuthResponse> {
    let token = create_access_token(user.id, &user.email, &state.config)?;
    Ok(AuthResponse {
        user: user.into(),
        token,
        expires_in: state.config.jwt_ttl_secs,
    })
}

async fn ensure_avatar_exists(state: &AppState, avatar_id: Uuid) -> AppResult<()> {
    state
        .store
        .find_avatar(avatar_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Avatar not found".into()))
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    // Uniqueness and format are both judged on the normalized address.
    let body = RegisterRequest {
        email: normalize_email(&body.email),
        ..body
    };
    body.validate()?;

    if let Some(avatar_id) = body.avatar_id {
        ensure_avatar_exists(&state, avatar_id).await?;
    }

    let password_hash = hash_password(&body.password)?;
    let user = state
        .store
        .create_user(NewUser {
            email: body.email,
            password_hash,
            avatar_id: body.avatar_id,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(issue_session(user, &state)?)))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .store
        .find_user_by_email(&normalize_email(&body.email))
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(issue_session(user, &state)?))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let streak = read_streak(state.store.as_ref(), state.clock.as_ref(), auth_user.id).await?;
    let user = state
        .store
        .find_user(auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let mut profile = UserProfile::from(user);
    profile.streak = streak;
    Ok(Json(profile))
}

/// GET /api/users/streak
pub async fn streak(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Streak>> {
    let streak = read_streak(state.store.as_ref(), state.clock.as_ref(), auth_user.id).await?;
    Ok(Json(streak))
}

/// PATCH /api/users/avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<UpdateAvatarRequest>,
) -> AppResult<Json<UserProfile>> {
    ensure_avatar_exists(&state, body.avatar_id).await?;

    let user = state
        .store
        .set_avatar(auth_user.id, body.avatar_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

/// POST /api/users/reminder
///
/// Missing fields fall back to the defaults rather than the stored values.
pub async fn set_reminder(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<ReminderRequest>,
) -> AppResult<Json<Reminder>> {
    let reminder = Reminder {
        time: body.time.unwrap_or_else(|| DEFAULT_REMINDER_TIME.into()),
        enabled: body.enabled.unwrap_or(false),
    };
    if !is_valid_reminder_time(&reminder.time) {
        return Err(AppError::Validation("Reminder time must be HH:MM".into()));
    }

    let user = state
        .store
        .set_reminder(auth_user.id, &reminder)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(Reminder {
        time: user.reminder_time,
        enabled: user.reminder_enabled,
    }))
}
