use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::services::streak::{Streak, StreakState};

pub const DEFAULT_REMINDER_TIME: &str = "21:00";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_id: Option<Uuid>,
    pub reminder_time: String,
    pub reminder_enabled: bool,
    pub last_mood_date: Option<NaiveDate>,
    pub streak_current: i32,
    pub streak_longest: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn streak_state(&self) -> StreakState {
        StreakState {
            streak: Streak {
                current: self.streak_current,
                longest: self.streak_longest,
            },
            last_mood_date: self.last_mood_date,
        }
    }

    pub fn apply_streak(&mut self, state: StreakState) {
        self.streak_current = state.streak.current;
        self.streak_longest = state.streak.longest;
        self.last_mood_date = state.last_mood_date;
    }
}

/// Insert payload for a freshly registered user. Streak counters start at zero.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub avatar_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub time: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub avatar_id: Option<Uuid>,
    pub reminder: Reminder,
    pub last_mood_date: Option<NaiveDate>,
    pub streak: Streak,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        let streak = u.streak_state().streak;
        Self {
            id: u.id,
            email: u.email,
            avatar_id: u.avatar_id,
            reminder: Reminder {
                time: u.reminder_time,
                enabled: u.reminder_enabled,
            },
            last_mood_date: u.last_mood_date,
            streak,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[serde(alias = "avatar_id")]
    pub avatar_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvatarRequest {
    #[serde(alias = "avatar_id")]
    pub avatar_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    pub time: Option<String>,
    pub enabled: Option<bool>,
}

/// Normalizes an email the way uniqueness is checked: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Accepts `HH:MM` on a 24-hour clock.
pub fn is_valid_reminder_time(time: &str) -> bool {
    chrono::NaiveTime::parse_from_str(time, "%H:%M").is_ok() && time.len() == 5
}
