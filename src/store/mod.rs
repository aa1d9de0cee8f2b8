//! Persistence seams consumed by the services.
//!
//! `PgStore` backs the running server; `memory::MemoryStore` backs the tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::mood::{MoodEntry, MoodFilter, NewMoodEntry, ResolvedMoodPatch};
use crate::models::reference::{Avatar, MoodType, Quote, Reason, Task};
use crate::models::user::{NewUser, Reminder, User};
use crate::services::streak::StreakState;

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgStore;

/// Result of a committed check-in: the new entry and the streak it produced.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub entry: MoodEntry,
    pub streak: StreakState,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, new: NewUser) -> AppResult<User>;

    async fn set_avatar(&self, user_id: Uuid, avatar_id: Uuid) -> AppResult<Option<User>>;

    async fn set_reminder(&self, user_id: Uuid, reminder: &Reminder) -> AppResult<Option<User>>;

    /// Zeroes `streak_current` only if `last_mood_date` still equals `seen`.
    /// Returns whether the reset was written.
    async fn reset_stale_streak(&self, user_id: Uuid, seen: Option<NaiveDate>) -> AppResult<bool>;
}

#[async_trait]
pub trait MoodStore: Send + Sync {
    /// Inserts the day's entry and applies the streak transition in one unit.
    /// Fails with `Conflict` if the user already has an entry for that day and
    /// with `NotFound` if the user does not exist; neither leaves a trace.
    async fn insert_check_in(&self, entry: NewMoodEntry) -> AppResult<CheckIn>;

    async fn mood_for_day(&self, user_id: Uuid, day: NaiveDate) -> AppResult<Option<MoodEntry>>;

    async fn update_mood_for_day(
        &self,
        user_id: Uuid,
        day: NaiveDate,
        patch: ResolvedMoodPatch,
    ) -> AppResult<Option<MoodEntry>>;

    /// Entries matching `filter`, newest day first.
    async fn list_moods(&self, user_id: Uuid, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>>;
}

#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn mood_types(&self) -> AppResult<Vec<MoodType>>;

    async fn mood_type_by_name(&self, name: &str) -> AppResult<Option<MoodType>>;

    async fn create_mood_type(&self, name: &str) -> AppResult<MoodType>;

    /// Returns false if no such type; `Conflict` while anything references it.
    async fn delete_mood_type(&self, name: &str) -> AppResult<bool>;

    async fn reasons(&self) -> AppResult<Vec<Reason>>;

    async fn reason_by_name(&self, name: &str) -> AppResult<Option<Reason>>;

    async fn tasks(&self) -> AppResult<Vec<Task>>;

    async fn create_task(&self, text: &str, mood_type_id: Uuid) -> AppResult<Task>;

    async fn quotes(&self) -> AppResult<Vec<Quote>>;

    async fn avatars(&self) -> AppResult<Vec<Avatar>>;

    async fn find_avatar(&self, id: Uuid) -> AppResult<Option<Avatar>>;
}

#[async_trait]
pub trait Store: UserStore + MoodStore + ReferenceStore {
    async fn ping(&self) -> AppResult<()>;
}
