//! Consecutive-day streak accounting.
//!
//! The counters live on the user row. They move only when a new day's
//! check-in commits ([`record_check_in`]) or when a read finds the streak
//! stale ([`reconcile`]); nothing runs in the background.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::calendar::{yesterday, Clock};
use crate::store::UserStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: i32,
    pub longest: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakState {
    pub streak: Streak,
    pub last_mood_date: Option<NaiveDate>,
}

/// Transition applied exactly once per successful new-day check-in.
pub fn record_check_in(state: StreakState, today: NaiveDate) -> StreakState {
    let current = match state.last_mood_date {
        Some(last) if last == today => return state,
        Some(last) if Some(last) == yesterday(today) => state.streak.current + 1,
        _ => 1,
    };

    StreakState {
        streak: Streak {
            current,
            longest: state.streak.longest.max(current),
        },
        last_mood_date: Some(today),
    }
}

/// Returns the reset state when the streak has lapsed, `None` when nothing changes.
pub fn reconcile(state: StreakState, today: NaiveDate) -> Option<StreakState> {
    let active = match state.last_mood_date {
        Some(last) => last == today || Some(last) == yesterday(today),
        None => false,
    };

    if active || state.streak.current == 0 {
        return None;
    }

    Some(StreakState {
        streak: Streak {
            current: 0,
            longest: state.streak.longest,
        },
        last_mood_date: state.last_mood_date,
    })
}

/// Reads a user's streak, persisting the lazy reset when it has lapsed.
pub async fn read_streak<S: UserStore + ?Sized>(
    users: &S,
    clock: &dyn Clock,
    user_id: Uuid,
) -> AppResult<Streak> {
    let user = users
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let state = user.streak_state();
    let Some(reset) = reconcile(state, clock.today()) else {
        return Ok(state.streak);
    };

    let applied = users.reset_stale_streak(user_id, state.last_mood_date).await?;
    if applied {
        tracing::info!(
            user_id = %user_id,
            last_mood_date = ?state.last_mood_date,
            previous = state.streak.current,
            "Streak lapsed, reset to zero"
        );
        return Ok(reset.streak);
    }

    // A check-in landed between the read and the reset; report what it wrote.
    let user = users
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(user.streak_state().streak)
}
