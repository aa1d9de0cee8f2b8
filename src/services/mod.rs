pub mod calendar;
pub mod content;
pub mod mood_ledger;
pub mod streak;
