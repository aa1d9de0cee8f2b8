use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A user's single mood record for one UTC calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day: NaiveDate,
    pub mood_type_id: Uuid,
    pub reason_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resolved insert payload; names have already been mapped to ids.
#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    pub user_id: Uuid,
    pub day: NaiveDate,
    pub mood_type_id: Uuid,
    pub reason_id: Option<Uuid>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[serde(alias = "mood_type")]
    pub mood_type: String,
    pub reason: Option<String>,
    #[validate(length(max = 2000, message = "Note must be at most 2000 characters"))]
    pub note: Option<String>,
}

/// Partial update of a day's entry. Only these fields can ever change;
/// ownership, day and creation day are not addressable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoodPatch {
    #[serde(alias = "mood_type")]
    pub mood_type: Option<String>,
    pub reason: Option<String>,
    #[validate(length(max = 2000, message = "Note must be at most 2000 characters"))]
    pub note: Option<String>,
}

/// `MoodPatch` after name resolution, as handed to the store.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMoodPatch {
    pub mood_type_id: Option<Uuid>,
    pub reason_id: Option<Uuid>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MoodFilter {
    pub mood_type_id: Option<Uuid>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl MoodFilter {
    pub fn matches(&self, entry: &MoodEntry) -> bool {
        self.mood_type_id.map_or(true, |id| entry.mood_type_id == id)
            && self.start.map_or(true, |start| entry.day >= start)
            && self.end.map_or(true, |end| entry.day <= end)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodQuery {
    #[serde(alias = "mood_type")]
    pub mood_type: Option<String>,
    #[serde(alias = "start_date")]
    pub start: Option<NaiveDate>,
    #[serde(alias = "end_date")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(alias = "start_date")]
    pub start: NaiveDate,
    #[serde(alias = "end_date")]
    pub end: NaiveDate,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct MoodSummary {
    pub days: BTreeMap<NaiveDate, String>,
    pub counts: BTreeMap<String, i64>,
}
