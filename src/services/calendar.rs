//! Calendar-day normalization.
//!
//! Every "today" and "entry day" comparison in the service goes through
//! [`day_key`] and [`Clock::today`]. Days are UTC calendar dates.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, AppResult};

/// Maps an instant to its UTC calendar date.
pub fn day_key(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// The calendar day before `day`.
pub fn yesterday(day: NaiveDate) -> Option<NaiveDate> {
    day.pred_opt()
}

/// Parses a `YYYY-MM-DD` path or query segment.
pub fn parse_day(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Source of the current instant, injected into the handlers through `AppState`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        day_key(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use fixed::FixedClock;
