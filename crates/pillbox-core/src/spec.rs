//! The user-entered schedule specification.
//!
//! A `ScheduleSpec` is everything the caregiver enters about when a
//! medication is taken. It is immutable: edits produce a new spec and a
//! fresh materialization. The spec, not the materialized dose list, is
//! what the persistence collaborator stores, so the schedule can be
//! re-materialized later (after a device time change, say).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};
use crate::pattern::RecurrencePattern;
use crate::times::{DoseTime, SUPPORTED_INTERVALS};
use crate::window::DurationPolicy;

/// Fixed-interval dosing: the same clock times repeat every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleSchedule {
    pub interval_hours: u8,
    pub first_dose: DoseTime,
}

impl SimpleSchedule {
    /// Create a simple schedule, rejecting intervals that do not divide 24.
    pub fn new(interval_hours: u8, first_dose: DoseTime) -> Result<Self, FieldError> {
        if !SUPPORTED_INTERVALS.contains(&interval_hours) {
            return Err(FieldError::Invalid {
                field: "interval_hours",
                message: format!("{interval_hours} is not one of 2, 4, 6, 8, 12 or 24"),
            });
        }
        Ok(Self {
            interval_hours,
            first_dose,
        })
    }
}

/// How doses are placed within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Dosing {
    /// Doses repeat at a fixed hour interval every day.
    Simple(SimpleSchedule),
    /// One dose per active day, at `dose_time`, on days picked by `pattern`.
    Recurring {
        pattern: RecurrencePattern,
        dose_time: DoseTime,
    },
}

impl Dosing {
    /// The recurrence pattern, if this is advanced-pattern dosing.
    pub fn pattern(&self) -> Option<&RecurrencePattern> {
        match self {
            Self::Simple(_) => None,
            Self::Recurring { pattern, .. } => Some(pattern),
        }
    }
}

/// The aggregate schedule specification for one medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    pub dosing: Dosing,
    pub duration: DurationPolicy,
}

impl ScheduleSpec {
    /// Check every structural invariant the engine relies on.
    ///
    /// The host UI blocks saving until this passes; the materializer also
    /// calls it so a spec deserialized from storage gets the same checks.
    pub fn validate(&self) -> Result<()> {
        match &self.dosing {
            Dosing::Simple(simple) => {
                SimpleSchedule::new(simple.interval_hours, simple.first_dose)?;
            }
            Dosing::Recurring { pattern, .. } => pattern.validate()?,
        }
        Ok(())
    }
}

fn weekday_name(index: u8) -> &'static str {
    match index {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        _ => "Sat",
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alternating {
                start_date,
                dose_count,
            } => {
                write!(f, "Every other day from {start_date}")?;
                if let Some(count) = dose_count {
                    write!(f, ", {count} doses")?;
                }
                Ok(())
            }
            Self::SpecificWeekdays { weekdays } => {
                let names: Vec<&str> = weekdays.iter().map(|&d| weekday_name(d)).collect();
                write!(f, "On {}", names.join(", "))
            }
            Self::Cycles {
                start_date,
                on_days,
                off_days,
            } => write!(f, "{on_days} days on, {off_days} days off from {start_date}"),
            Self::EveryNDays { start_date, n: 1 } => write!(f, "Every day from {start_date}"),
            Self::EveryNDays { start_date, n } => write!(f, "Every {n} days from {start_date}"),
            Self::EveryNWeeks { start_date, n: 1 } => write!(f, "Every week from {start_date}"),
            Self::EveryNWeeks { start_date, n } => write!(f, "Every {n} weeks from {start_date}"),
            Self::EveryNMonths { start_date, n: 1 } => write!(f, "Every month from {start_date}"),
            Self::EveryNMonths { start_date, n } => write!(f, "Every {n} months from {start_date}"),
        }
    }
}

/// The one-line summary the entry form shows back to the caregiver.
impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dosing {
            Dosing::Simple(simple) => write!(
                f,
                "Every {} hours starting at {}",
                simple.interval_hours, simple.first_dose
            )?,
            Dosing::Recurring { pattern, dose_time } => {
                write!(f, "{pattern} at {dose_time}")?;
            }
        }
        match self.duration {
            DurationPolicy::Continuous | DurationPolicy::AfterDoseCount => Ok(()),
            DurationPolicy::FixedDays { days } => write!(f, ", for {days} days"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_non_divisor_intervals() {
        let first = DoseTime::new(8, 0).unwrap();
        assert!(SimpleSchedule::new(5, first).is_err());
        assert!(SimpleSchedule::new(0, first).is_err());
        assert!(SimpleSchedule::new(12, first).is_ok());
    }

    #[test]
    fn validate_covers_nested_pattern() {
        let spec = ScheduleSpec {
            dosing: Dosing::Recurring {
                pattern: RecurrencePattern::SpecificWeekdays { weekdays: vec![] },
                dose_time: DoseTime::new(9, 0).unwrap(),
            },
            duration: DurationPolicy::Continuous,
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn spec_serialization_round_trip() {
        let spec = ScheduleSpec {
            dosing: Dosing::Recurring {
                pattern: RecurrencePattern::Alternating {
                    start_date: date(2024, 1, 1),
                    dose_count: Some(5),
                },
                dose_time: DoseTime::new(8, 30).unwrap(),
            },
            duration: DurationPolicy::AfterDoseCount,
        };

        let json = serde_json::to_string(&spec).unwrap();
        let decoded: ScheduleSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, spec);

        let simple = ScheduleSpec {
            dosing: Dosing::Simple(SimpleSchedule::new(8, DoseTime::new(6, 0).unwrap()).unwrap()),
            duration: DurationPolicy::FixedDays { days: 7 },
        };
        let json = serde_json::to_string(&simple).unwrap();
        let decoded: ScheduleSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, simple);
    }

    #[test]
    fn summary_for_simple_schedule() {
        let spec = ScheduleSpec {
            dosing: Dosing::Simple(SimpleSchedule::new(8, DoseTime::new(6, 30).unwrap()).unwrap()),
            duration: DurationPolicy::FixedDays { days: 7 },
        };
        assert_eq!(spec.to_string(), "Every 8 hours starting at 06:30, for 7 days");
    }

    #[test]
    fn summary_for_advanced_patterns() {
        let spec = ScheduleSpec {
            dosing: Dosing::Recurring {
                pattern: RecurrencePattern::Alternating {
                    start_date: date(2024, 1, 1),
                    dose_count: Some(5),
                },
                dose_time: DoseTime::new(8, 0).unwrap(),
            },
            duration: DurationPolicy::AfterDoseCount,
        };
        assert_eq!(
            spec.to_string(),
            "Every other day from 2024-01-01, 5 doses at 08:00"
        );

        let weekdays = ScheduleSpec {
            dosing: Dosing::Recurring {
                pattern: RecurrencePattern::SpecificWeekdays { weekdays: vec![1, 3] },
                dose_time: DoseTime::new(20, 0).unwrap(),
            },
            duration: DurationPolicy::Continuous,
        };
        assert_eq!(weekdays.to_string(), "On Mon, Wed at 20:00");
    }
}
