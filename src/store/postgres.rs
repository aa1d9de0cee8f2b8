use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::mood::{MoodEntry, MoodFilter, NewMoodEntry, ResolvedMoodPatch};
use crate::models::reference::{Avatar, MoodType, Quote, Reason, Task};
use crate::models::user::{NewUser, Reminder, User};
use crate::services::streak;
use crate::store::{CheckIn, MoodStore, ReferenceStore, Store, UserStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unique_violation_as_conflict(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(message.into()),
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, avatar_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.avatar_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_as_conflict(e, "Email already in use"))
    }

    async fn set_avatar(&self, user_id: Uuid, avatar_id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET avatar_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(avatar_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_reminder(&self, user_id: Uuid, reminder: &Reminder) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                reminder_time = $2,
                reminder_enabled = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&reminder.time)
        .bind(reminder.enabled)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn reset_stale_streak(&self, user_id: Uuid, seen: Option<NaiveDate>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET streak_current = 0, updated_at = NOW()
            WHERE id = $1 AND last_mood_date IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(user_id)
        .bind(seen)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MoodStore for PgStore {
    async fn insert_check_in(&self, new: NewMoodEntry) -> AppResult<CheckIn> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent check-ins of the same user.
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(new.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let entry = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries (id, user_id, day, mood_type_id, reason_id, note, created_on)
            VALUES ($1, $2, $3, $4, $5, $6, $3)
            ON CONFLICT (user_id, day) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.day)
        .bind(new.mood_type_id)
        .bind(new.reason_id)
        .bind(&new.note)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict("Mood already logged for today".into()))?;

        let next = streak::record_check_in(user.streak_state(), new.day);

        sqlx::query(
            r#"
            UPDATE users SET
                streak_current = $2,
                streak_longest = $3,
                last_mood_date = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(new.user_id)
        .bind(next.streak.current)
        .bind(next.streak.longest)
        .bind(next.last_mood_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CheckIn {
            entry,
            streak: next,
        })
    }

    async fn mood_for_day(&self, user_id: Uuid, day: NaiveDate) -> AppResult<Option<MoodEntry>> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            "SELECT * FROM mood_entries WHERE user_id = $1 AND day = $2",
        )
        .bind(user_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn update_mood_for_day(
        &self,
        user_id: Uuid,
        day: NaiveDate,
        patch: ResolvedMoodPatch,
    ) -> AppResult<Option<MoodEntry>> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            r#"
            UPDATE mood_entries SET
                mood_type_id = COALESCE($3, mood_type_id),
                reason_id = COALESCE($4, reason_id),
                note = COALESCE($5, note),
                updated_at = NOW()
            WHERE user_id = $1 AND day = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(day)
        .bind(patch.mood_type_id)
        .bind(patch.reason_id)
        .bind(&patch.note)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn list_moods(&self, user_id: Uuid, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>> {
        let entries = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR mood_type_id = $2)
              AND ($3::date IS NULL OR day >= $3)
              AND ($4::date IS NULL OR day <= $4)
            ORDER BY day DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.mood_type_id)
        .bind(filter.start)
        .bind(filter.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

#[async_trait]
impl ReferenceStore for PgStore {
    async fn mood_types(&self) -> AppResult<Vec<MoodType>> {
        let types = sqlx::query_as::<_, MoodType>("SELECT * FROM mood_types ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(types)
    }

    async fn mood_type_by_name(&self, name: &str) -> AppResult<Option<MoodType>> {
        let mood_type = sqlx::query_as::<_, MoodType>("SELECT * FROM mood_types WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(mood_type)
    }

    async fn create_mood_type(&self, name: &str) -> AppResult<MoodType> {
        sqlx::query_as::<_, MoodType>(
            "INSERT INTO mood_types (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_as_conflict(e, "Mood type already exists"))
    }

    async fn delete_mood_type(&self, name: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM mood_types WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Conflict("Mood type is still in use".into())
                }
                _ => AppError::Database(e),
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn reasons(&self) -> AppResult<Vec<Reason>> {
        let reasons = sqlx::query_as::<_, Reason>("SELECT * FROM reasons ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(reasons)
    }

    async fn reason_by_name(&self, name: &str) -> AppResult<Option<Reason>> {
        let reason = sqlx::query_as::<_, Reason>("SELECT * FROM reasons WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reason)
    }

    async fn tasks(&self) -> AppResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn create_task(&self, text: &str, mood_type_id: Uuid) -> AppResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, text, mood_type_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(text)
        .bind(mood_type_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn quotes(&self) -> AppResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>("SELECT * FROM quotes")
            .fetch_all(&self.pool)
            .await?;
        Ok(quotes)
    }

    async fn avatars(&self) -> AppResult<Vec<Avatar>> {
        let avatars = sqlx::query_as::<_, Avatar>("SELECT * FROM avatars")
            .fetch_all(&self.pool)
            .await?;
        Ok(avatars)
    }

    async fn find_avatar(&self, id: Uuid) -> AppResult<Option<Avatar>> {
        let avatar = sqlx::query_as::<_, Avatar>("SELECT * FROM avatars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(avatar)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
