//! Calendar month ranges.
//!
//! A [`MonthPeriod`] covers `[first day 00:00:00.000, last day 23:59:59.999]`
//! in UTC. Both the listing filter and the split report use it.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPeriod {
    pub month: u32,
    pub year: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthPeriod {
    /// Builds the inclusive range of `month` (1-12) in `year`.
    pub fn new(month: u32, year: i32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::Validation(format!(
                "\"mes\" must be between 1 and 12, got {month}"
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(EngineError::Validation(format!(
                "\"ano\" must be between 1 and 9999, got {year}"
            )));
        }

        let invalid = || EngineError::Validation(format!("invalid period {month}/{year}"));
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = days_in_month(month, year)
            .and_then(|days| NaiveDate::from_ymd_opt(year, month, days))
            .ok_or_else(invalid)?;

        let start = first.and_hms_milli_opt(0, 0, 0, 0).ok_or_else(invalid)?.and_utc();
        let end = last
            .and_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(invalid)?
            .and_utc();

        Ok(Self {
            month,
            year,
            start,
            end,
        })
    }

    /// The month containing the current instant.
    pub fn current() -> ResultEngine<Self> {
        let now = Utc::now();
        Self::new(now.month(), now.year())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Number of days in `month` of `year`, leap years included.
///
/// `None` when `month` is not 1-12 or the date falls outside the calendar.
pub fn days_in_month(month: u32, year: i32) -> Option<u32> {
    let (next_year, next_month) = match month {
        1..=11 => (year, month + 1),
        12 => (year.checked_add(1)?, 1),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
}
