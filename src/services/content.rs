//! Mood-linked content selection for tasks, quotes and avatars.

use rand::Rng;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::reference::{Avatar, MoodTagged};
use crate::services::calendar::Clock;
use crate::store::Store;

/// Picks one item uniformly at random among those matching `predicate`.
pub fn pick_random<T, R>(items: Vec<T>, predicate: impl Fn(&T) -> bool, rng: &mut R) -> AppResult<T>
where
    R: Rng + ?Sized,
{
    let mut matching: Vec<T> = items.into_iter().filter(|item| predicate(item)).collect();
    if matching.is_empty() {
        return Err(AppError::NotFound("No matching content".into()));
    }
    let index = rng.gen_range(0..matching.len());
    Ok(matching.swap_remove(index))
}

/// Which collection to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Task,
    Quote,
    Avatar,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Quote => "quote",
            Self::Avatar => "avatar",
        }
    }
}

/// Loads the mood type of the user's entry for today, failing with
/// `Forbidden` when nothing has been logged yet.
pub async fn todays_mood_type<S: Store + ?Sized>(
    store: &S,
    clock: &dyn Clock,
    user_id: Uuid,
) -> AppResult<Uuid> {
    store
        .mood_for_day(user_id, clock.today())
        .await?
        .map(|entry| entry.mood_type_id)
        .ok_or_else(|| AppError::Forbidden("Log today's mood first".into()))
}

/// Draws an item of `items` tagged with today's mood type.
pub fn pick_for_mood<T, R>(
    kind: ContentKind,
    items: Vec<T>,
    mood_type_id: Uuid,
    extra: impl Fn(&T) -> bool,
    rng: &mut R,
) -> AppResult<T>
where
    T: MoodTagged,
    R: Rng + ?Sized,
{
    pick_random(
        items,
        |item| item.mood_type_id() == Some(mood_type_id) && extra(item),
        rng,
    )
    .map_err(|_| AppError::NotFound(format!("No {} matches today's mood", kind.as_str())))
}

/// Avatars are narrowed to the character (gender and age) the user picked.
pub fn same_character(selected: Option<&Avatar>) -> impl Fn(&Avatar) -> bool + '_ {
    move |candidate: &Avatar| match selected {
        Some(chosen) => candidate.gender == chosen.gender && candidate.age == chosen.age,
        None => true,
    }
}
