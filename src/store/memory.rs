//! In-memory store for tests. One mutex guards all collections, which makes
//! every trait method atomic with respect to the others.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::mood::{MoodEntry, MoodFilter, NewMoodEntry, ResolvedMoodPatch};
use crate::models::reference::{Avatar, AvatarAge, AvatarGender, MoodType, Quote, Reason, Task};
use crate::models::user::{NewUser, Reminder, User, DEFAULT_REMINDER_TIME};
use crate::services::streak::{self, StreakState};
use crate::store::{CheckIn, MoodStore, ReferenceStore, Store, UserStore};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    moods: Vec<MoodEntry>,
    mood_types: Vec<MoodType>,
    reasons: Vec<Reason>,
    tasks: Vec<Task>,
    quotes: Vec<Quote>,
    avatars: Vec<Avatar>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_user(&self, email: &str) -> User {
        self.create_user(NewUser {
            email: email.into(),
            password_hash: "unused".into(),
            avatar_id: None,
        })
        .await
        .unwrap()
    }

    pub async fn set_streak(&self, user_id: Uuid, streak: StreakState) {
        let mut state = self.state.lock().await;
        state.users.get_mut(&user_id).unwrap().apply_streak(streak);
    }

    pub async fn seed_mood_type(&self, name: &str) -> MoodType {
        self.create_mood_type(name).await.unwrap()
    }

    pub async fn seed_reason(&self, name: &str) -> Reason {
        let reason = Reason {
            id: Uuid::new_v4(),
            name: name.into(),
        };
        self.state.lock().await.reasons.push(reason.clone());
        reason
    }

    pub async fn seed_quote(&self, text: &str, mood_type_id: Uuid) -> Quote {
        let quote = Quote {
            id: Uuid::new_v4(),
            text: text.into(),
            mood_type_id,
        };
        self.state.lock().await.quotes.push(quote.clone());
        quote
    }

    pub async fn seed_avatar(
        &self,
        gender: AvatarGender,
        age: AvatarAge,
        mood_type_id: Option<Uuid>,
    ) -> Avatar {
        let avatar = Avatar {
            id: Uuid::new_v4(),
            gender,
            age,
            image_url: format!("https://cdn.test/{:?}-{:?}.png", gender, age).to_lowercase(),
            mood_type_id,
        };
        self.state.lock().await.avatars.push(avatar.clone());
        avatar
    }

    pub async fn mood_count(&self) -> usize {
        self.state.lock().await.moods.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new: NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.email == new.email) {
            return Err(AppError::Conflict("Email already in use".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            avatar_id: new.avatar_id,
            reminder_time: DEFAULT_REMINDER_TIME.into(),
            reminder_enabled: false,
            last_mood_date: None,
            streak_current: 0,
            streak_longest: 0,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_avatar(&self, user_id: Uuid, avatar_id: Uuid) -> AppResult<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(state.users.get_mut(&user_id).map(|u| {
            u.avatar_id = Some(avatar_id);
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn set_reminder(&self, user_id: Uuid, reminder: &Reminder) -> AppResult<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(state.users.get_mut(&user_id).map(|u| {
            u.reminder_time = reminder.time.clone();
            u.reminder_enabled = reminder.enabled;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn reset_stale_streak(&self, user_id: Uuid, seen: Option<NaiveDate>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.users.get_mut(&user_id) {
            Some(u) if u.last_mood_date == seen => {
                u.streak_current = 0;
                u.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl MoodStore for MemoryStore {
    async fn insert_check_in(&self, new: NewMoodEntry) -> AppResult<CheckIn> {
        let mut state = self.state.lock().await;

        let current = state
            .users
            .get(&new.user_id)
            .map(User::streak_state)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if state
            .moods
            .iter()
            .any(|m| m.user_id == new.user_id && m.day == new.day)
        {
            return Err(AppError::Conflict("Mood already logged for today".into()));
        }

        let now = Utc::now();
        let entry = MoodEntry {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            day: new.day,
            mood_type_id: new.mood_type_id,
            reason_id: new.reason_id,
            note: new.note,
            created_on: new.day,
            created_at: now,
            updated_at: now,
        };
        let next = streak::record_check_in(current, new.day);

        state.moods.push(entry.clone());
        if let Some(user) = state.users.get_mut(&new.user_id) {
            user.apply_streak(next);
            user.updated_at = now;
        }

        Ok(CheckIn {
            entry,
            streak: next,
        })
    }

    async fn mood_for_day(&self, user_id: Uuid, day: NaiveDate) -> AppResult<Option<MoodEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .moods
            .iter()
            .find(|m| m.user_id == user_id && m.day == day)
            .cloned())
    }

    async fn update_mood_for_day(
        &self,
        user_id: Uuid,
        day: NaiveDate,
        patch: ResolvedMoodPatch,
    ) -> AppResult<Option<MoodEntry>> {
        let mut state = self.state.lock().await;
        let Some(entry) = state
            .moods
            .iter_mut()
            .find(|m| m.user_id == user_id && m.day == day)
        else {
            return Ok(None);
        };

        if let Some(mood_type_id) = patch.mood_type_id {
            entry.mood_type_id = mood_type_id;
        }
        if let Some(reason_id) = patch.reason_id {
            entry.reason_id = Some(reason_id);
        }
        if let Some(note) = patch.note {
            entry.note = Some(note);
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn list_moods(&self, user_id: Uuid, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<MoodEntry> = state
            .moods
            .iter()
            .filter(|m| m.user_id == user_id && filter.matches(m))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.day.cmp(&a.day));
        Ok(entries)
    }
}

#[async_trait]
impl ReferenceStore for MemoryStore {
    async fn mood_types(&self) -> AppResult<Vec<MoodType>> {
        let mut types = self.state.lock().await.mood_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn mood_type_by_name(&self, name: &str) -> AppResult<Option<MoodType>> {
        let state = self.state.lock().await;
        Ok(state.mood_types.iter().find(|t| t.name == name).cloned())
    }

    async fn create_mood_type(&self, name: &str) -> AppResult<MoodType> {
        let mut state = self.state.lock().await;
        if state.mood_types.iter().any(|t| t.name == name) {
            return Err(AppError::Conflict("Mood type already exists".into()));
        }
        let mood_type = MoodType {
            id: Uuid::new_v4(),
            name: name.into(),
        };
        state.mood_types.push(mood_type.clone());
        Ok(mood_type)
    }

    async fn delete_mood_type(&self, name: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(pos) = state.mood_types.iter().position(|t| t.name == name) else {
            return Ok(false);
        };
        let id = state.mood_types[pos].id;
        let in_use = state.moods.iter().any(|m| m.mood_type_id == id)
            || state.tasks.iter().any(|t| t.mood_type_id == id)
            || state.quotes.iter().any(|q| q.mood_type_id == id)
            || state.avatars.iter().any(|a| a.mood_type_id == Some(id));
        if in_use {
            return Err(AppError::Conflict("Mood type is still in use".into()));
        }
        state.mood_types.remove(pos);
        Ok(true)
    }

    async fn reasons(&self) -> AppResult<Vec<Reason>> {
        let mut reasons = self.state.lock().await.reasons.clone();
        reasons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(reasons)
    }

    async fn reason_by_name(&self, name: &str) -> AppResult<Option<Reason>> {
        let state = self.state.lock().await;
        Ok(state.reasons.iter().find(|r| r.name == name).cloned())
    }

    async fn tasks(&self) -> AppResult<Vec<Task>> {
        Ok(self.state.lock().await.tasks.clone())
    }

    async fn create_task(&self, text: &str, mood_type_id: Uuid) -> AppResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            text: text.into(),
            mood_type_id,
        };
        self.state.lock().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn quotes(&self) -> AppResult<Vec<Quote>> {
        Ok(self.state.lock().await.quotes.clone())
    }

    async fn avatars(&self) -> AppResult<Vec<Avatar>> {
        Ok(self.state.lock().await.avatars.clone())
    }

    async fn find_avatar(&self, id: Uuid) -> AppResult<Option<Avatar>> {
        let state = self.state.lock().await;
        Ok(state.avatars.iter().find(|a| a.id == id).cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
