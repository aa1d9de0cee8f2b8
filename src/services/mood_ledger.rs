//! One mood entry per user per UTC day.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::mood::{
    CheckInRequest, MoodEntry, MoodFilter, MoodPatch, MoodSummary, NewMoodEntry,
    ResolvedMoodPatch,
};
use crate::services::calendar::Clock;
use crate::store::{CheckIn, Store};

async fn resolve_mood_type<S: Store + ?Sized>(store: &S, name: &str) -> AppResult<Uuid> {
    store
        .mood_type_by_name(name.trim())
        .await?
        .map(|t| t.id)
        .ok_or_else(|| AppError::Validation(format!("Unknown mood type '{}'", name)))
}

/// Blank notes are stored as no note at all.
fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.trim().is_empty())
}

async fn resolve_reason<S: Store + ?Sized>(store: &S, name: Option<&str>) -> AppResult<Option<Uuid>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    store
        .reason_by_name(name)
        .await?
        .map(|r| Some(r.id))
        .ok_or_else(|| AppError::Validation(format!("Unknown reason '{}'", name)))
}

/// Records today's mood and advances the streak in the same store operation.
pub async fn check_in<S: Store + ?Sized>(
    store: &S,
    clock: &dyn Clock,
    user_id: Uuid,
    request: CheckInRequest,
) -> AppResult<CheckIn> {
    request.validate()?;

    if store.find_user(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".into()));
    }

    let mood_type_id = resolve_mood_type(store, &request.mood_type).await?;
    let reason_id = resolve_reason(store, request.reason.as_deref()).await?;
    let day = clock.today();

    let result = store
        .insert_check_in(NewMoodEntry {
            user_id,
            day,
            mood_type_id,
            reason_id,
            note: normalize_note(request.note),
        })
        .await;

    match &result {
        Ok(committed) => tracing::info!(
            user_id = %user_id,
            day = %day,
            mood_type = %request.mood_type,
            streak_current = committed.streak.streak.current,
            streak_longest = committed.streak.streak.longest,
            "Mood checked in"
        ),
        Err(AppError::Conflict(_)) => {
            tracing::debug!(user_id = %user_id, day = %day, "Duplicate check-in rejected")
        }
        Err(_) => {}
    }

    result
}

pub async fn get_for_day<S: Store + ?Sized>(
    store: &S,
    user_id: Uuid,
    day: NaiveDate,
) -> AppResult<Option<MoodEntry>> {
    store.mood_for_day(user_id, day).await
}

/// Merges the provided fields into the day's entry. The streak is untouched.
pub async fn update_for_day<S: Store + ?Sized>(
    store: &S,
    user_id: Uuid,
    day: NaiveDate,
    patch: MoodPatch,
) -> AppResult<MoodEntry> {
    patch.validate()?;

    let mood_type_id = match patch.mood_type.as_deref() {
        Some(name) => Some(resolve_mood_type(store, name).await?),
        None => None,
    };
    let reason_id = resolve_reason(store, patch.reason.as_deref()).await?;

    store
        .update_mood_for_day(
            user_id,
            day,
            ResolvedMoodPatch {
                mood_type_id,
                reason_id,
                note: normalize_note(patch.note),
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No mood logged for {}", day)))
}

pub async fn list_range<S: Store + ?Sized>(
    store: &S,
    user_id: Uuid,
    mood_type: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> AppResult<Vec<MoodEntry>> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(AppError::Validation(format!(
                "start ({}) must not be after end ({})",
                start, end
            )));
        }
    }

    let mood_type_id = match mood_type.filter(|m| !m.trim().is_empty()) {
        Some(name) => Some(resolve_mood_type(store, name).await?),
        None => None,
    };

    store
        .list_moods(
            user_id,
            &MoodFilter {
                mood_type_id,
                start,
                end,
            },
        )
        .await
}

/// Per-day labels and a histogram of mood types over `[start, end]`.
pub async fn summarize<S: Store + ?Sized>(
    store: &S,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<MoodSummary> {
    let entries = list_range(store, user_id, None, Some(start), Some(end)).await?;
    let names: HashMap<Uuid, String> = store
        .mood_types()
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let mut summary = MoodSummary::default();
    for entry in entries {
        let name = names
            .get(&entry.mood_type_id)
            .cloned()
            .unwrap_or_else(|| entry.mood_type_id.to_string());
        *summary.counts.entry(name.clone()).or_insert(0) += 1;
        summary.days.insert(entry.day, name);
    }
    Ok(summary)
}
