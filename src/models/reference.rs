use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MoodType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Reason {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub mood_type_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub text: String,
    pub mood_type_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub id: Uuid,
    pub gender: AvatarGender,
    pub age: AvatarAge,
    pub image_url: String,
    pub mood_type_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "avatar_gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvatarGender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "avatar_age", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvatarAge {
    Young,
    Old,
}

/// Content that can be matched against the mood of the day.
pub trait MoodTagged {
    fn mood_type_id(&self) -> Option<Uuid>;
}

impl MoodTagged for Task {
    fn mood_type_id(&self) -> Option<Uuid> {
        Some(self.mood_type_id)
    }
}

impl MoodTagged for Quote {
    fn mood_type_id(&self) -> Option<Uuid> {
        Some(self.mood_type_id)
    }
}

impl MoodTagged for Avatar {
    fn mood_type_id(&self) -> Option<Uuid> {
        self.mood_type_id
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodTypeRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 500, message = "Text must be 1-500 characters"))]
    pub text: String,
    #[serde(alias = "mood_type")]
    pub mood_type: String,
}
