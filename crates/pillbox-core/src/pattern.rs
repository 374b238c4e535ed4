//! Recurrence patterns and the active-day evaluator.
//!
//! Each advanced pattern decides, for a candidate calendar date, whether
//! that date is an active dosing day. The evaluator is a pure function:
//! no clock reads, no ordering assumptions between calls. Adding a new
//! pattern means adding a variant here and letting the compiler point at
//! every match that needs a new arm.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// How dosing days recur on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrencePattern {
    /// Dose every other day from `start_date` (itself always a dose day).
    ///
    /// `dose_count` caps the treatment at that many doses; the window
    /// resolver turns it into a concrete end date.
    Alternating {
        start_date: NaiveDate,
        #[serde(default)]
        dose_count: Option<u32>,
    },
    /// Dose on the given weekdays. 0=Sun ... 6=Sat
    SpecificWeekdays { weekdays: Vec<u8> },
    /// `on_days` consecutive active days followed by `off_days` rest days,
    /// repeating from `start_date`.
    Cycles {
        start_date: NaiveDate,
        on_days: u32,
        off_days: u32,
    },
    /// Dose every `n` days from `start_date`.
    EveryNDays { start_date: NaiveDate, n: u32 },
    /// Dose every `n` weeks, always on `start_date`'s weekday.
    EveryNWeeks { start_date: NaiveDate, n: u32 },
    /// Dose every `n` months, on `start_date`'s day-of-month.
    ///
    /// Months without that day (the 31st in February, say) are skipped;
    /// the day simply never occurs, so no dose is emitted that month.
    EveryNMonths { start_date: NaiveDate, n: u32 },
}

impl RecurrencePattern {
    /// Check the pattern's structural invariants.
    ///
    /// Called by the window resolver and the input boundary; the
    /// evaluator itself assumes a pattern that passed this check.
    pub fn validate(&self) -> Result<(), PatternError> {
        match self {
            Self::Alternating { dose_count, .. } => {
                if *dose_count == Some(0) {
                    return Err(PatternError::NonPositive { field: "dose_count" });
                }
            }
            Self::SpecificWeekdays { weekdays } => {
                if weekdays.is_empty() {
                    return Err(PatternError::EmptyWeekdays);
                }
                if let Some(&day) = weekdays.iter().find(|&&day| day > 6) {
                    return Err(PatternError::WeekdayOutOfRange(day));
                }
            }
            Self::Cycles { on_days, .. } => {
                if *on_days == 0 {
                    return Err(PatternError::NonPositive { field: "on_days" });
                }
            }
            Self::EveryNDays { n, .. }
            | Self::EveryNWeeks { n, .. }
            | Self::EveryNMonths { n, .. } => {
                if *n == 0 {
                    return Err(PatternError::NonPositive { field: "n" });
                }
            }
        }
        Ok(())
    }

    /// The pattern's intrinsic start date, if it has one.
    ///
    /// Weekday patterns have none; they are anchored by the treatment
    /// window instead.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            Self::SpecificWeekdays { .. } => None,
            Self::Alternating { start_date, .. }
            | Self::Cycles { start_date, .. }
            | Self::EveryNDays { start_date, .. }
            | Self::EveryNWeeks { start_date, .. }
            | Self::EveryNMonths { start_date, .. } => Some(start_date),
        }
    }

    /// Whether `day` is an active dosing day under this pattern.
    ///
    /// Days before the pattern's start date are never active (weekday
    /// patterns have no start date and match any qualifying weekday; the
    /// materializer clips them to the treatment window).
    pub fn is_active_day(&self, day: NaiveDate) -> bool {
        match *self {
            Self::Alternating { start_date, .. } => {
                let offset = (day - start_date).num_days();
                offset >= 0 && offset % 2 == 0
            }
            Self::SpecificWeekdays { ref weekdays } => {
                weekdays.contains(&(day.weekday().num_days_from_sunday() as u8))
            }
            Self::Cycles {
                start_date,
                on_days,
                off_days,
            } => {
                let offset = (day - start_date).num_days();
                if offset < 0 {
                    return false;
                }
                let period = i64::from(on_days) + i64::from(off_days);
                if period == 0 {
                    // Degenerate empty cycle: every day is an on-day.
                    return true;
                }
                // off_days == 0 keeps every offset inside the on-run.
                offset % period < i64::from(on_days)
            }
            Self::EveryNDays { start_date, n } => {
                let offset = (day - start_date).num_days();
                offset >= 0 && offset % i64::from(n) == 0
            }
            Self::EveryNWeeks { start_date, n } => {
                let offset = (day - start_date).num_days();
                offset >= 0
                    && day.weekday() == start_date.weekday()
                    && (offset / 7) % i64::from(n) == 0
            }
            Self::EveryNMonths { start_date, n } => {
                if day.day() != start_date.day() {
                    return false;
                }
                let months = whole_months_between(start_date, day);
                months >= 0 && months % i64::from(n) == 0
            }
        }
    }
}

/// Whole calendar months from `from` to `to`.
///
/// Only meaningful when both dates share a day-of-month, which the
/// monthly evaluator guarantees before calling.
fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    years * 12 + i64::from(to.month()) - i64::from(from.month())
}
