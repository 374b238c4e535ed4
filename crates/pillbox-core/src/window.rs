//! Treatment duration policies and window resolution.
//!
//! A duration policy says how long a treatment runs; the resolver turns
//! it into a concrete `[start, end?]` date range. The reference date is
//! always passed in explicitly so resolution is deterministic under test.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WindowError};
use crate::pattern::RecurrencePattern;

/// How long a treatment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DurationPolicy {
    /// No end date; materialization is bounded by the horizon instead.
    Continuous,
    /// Treatment ends `days` after the window start.
    FixedDays { days: u32 },
    /// End date derived from an alternating pattern's dose count.
    ///
    /// Lets a caregiver say "take it 5 times, every other day" without
    /// computing a calendar end date by hand.
    AfterDoseCount,
}

/// The inclusive date range during which a schedule's active-day test
/// applies. `end == None` means the treatment is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentWindow {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl TreatmentWindow {
    /// Whole days from start to end, if the window is bounded.
    pub fn len_days(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_days())
    }
}

/// Resolve a duration policy against a pattern into a concrete window.
///
/// `today` anchors schedules whose pattern has no intrinsic start date
/// (weekday patterns, and simple fixed-interval schedules which carry no
/// pattern at all). The pattern, when present, is validated here so the
/// evaluator downstream never sees a malformed one.
pub fn resolve_window(
    pattern: Option<&RecurrencePattern>,
    policy: DurationPolicy,
    today: NaiveDate,
) -> Result<TreatmentWindow> {
    if let Some(pattern) = pattern {
        pattern.validate()?;
    }
    let start = pattern.and_then(|p| p.start_date()).unwrap_or(today);

    let end = match policy {
        DurationPolicy::Continuous => None,
        DurationPolicy::FixedDays { days } => {
            if days == 0 {
                return Err(WindowError::NonPositiveDays.into());
            }
            // A u32 day count can name more days than the calendar holds;
            // checked arithmetic keeps that a typed failure, not a panic.
            Some(
                start
                    .checked_add_signed(Duration::days(i64::from(days)))
                    .ok_or(WindowError::DateOutOfRange)?,
            )
        }
        DurationPolicy::AfterDoseCount => match pattern {
            Some(RecurrencePattern::Alternating {
                dose_count: Some(count),
                ..
            }) => {
                // Dose #1 lands on day 0, dose #k on day (k - 1) * 2, so
                // the last dose fixes the end date. Off-by-one here
                // silently shortens or lengthens treatment. A zero count
                // was already rejected by `validate` above.
                Some(
                    start
                        .checked_add_signed(Duration::days(i64::from(count - 1) * 2))
                        .ok_or(WindowError::DateOutOfRange)?,
                )
            }
            Some(RecurrencePattern::Alternating { dose_count: None, .. }) => {
                return Err(WindowError::MissingDoseCount.into());
            }
            _ => return Err(WindowError::DoseCountUnsupported.into()),
        },
    };

    tracing::debug!("Resolved treatment window: start={}, end={:?}", start, end);
    Ok(TreatmentWindow { start, end })
}
