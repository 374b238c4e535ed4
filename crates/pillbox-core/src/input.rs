//! The free-text input boundary.
//!
//! Numeric sub-fields arrive from the medication-entry form as raw
//! strings. Everything is parsed and range-checked here, with the
//! offending field named on failure, so the engine proper only ever sees
//! a validated `ScheduleSpec`.

use chrono::NaiveDate;

use crate::error::{FieldError, Result};
use crate::pattern::RecurrencePattern;
use crate::spec::{Dosing, ScheduleSpec, SimpleSchedule};
use crate::times::DoseTime;
use crate::window::DurationPolicy;

/// Raw form fields as entered in the medication form.
///
/// Empty strings mean "not filled in". Weekdays come from checkboxes,
/// so they are already discrete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    /// One of `simple`, `alternating`, `weekdays`, `cycles`,
    /// `every_n_days`, `every_n_weeks`, `every_n_months`.
    pub pattern: String,
    pub interval_hours: String,
    /// First dose for simple schedules, the single daily dose otherwise. HH:MM
    pub dose_time: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// 0=Sun ... 6=Sat
    pub weekdays: Vec<u8>,
    pub on_days: String,
    pub off_days: String,
    pub every_n: String,
    pub dose_count: String,
    /// One of `continuous` (or empty), `days`, `dose_count`.
    pub duration: String,
    pub duration_days: String,
}

impl ScheduleForm {
    /// Parse and validate the form into a typed spec.
    ///
    /// The host UI calls this on save and blocks until it succeeds.
    pub fn parse(&self) -> Result<ScheduleSpec> {
        let dose_time = parse_time("dose_time", &self.dose_time)?;

        let dosing = match self.pattern.trim() {
            "simple" => {
                let interval = parse_count("interval_hours", &self.interval_hours)?;
                let interval = u8::try_from(interval).map_err(|_| FieldError::Invalid {
                    field: "interval_hours",
                    message: format!("{interval} is not one of 2, 4, 6, 8, 12 or 24"),
                })?;
                Dosing::Simple(SimpleSchedule::new(interval, dose_time)?)
            }
            "alternating" => Dosing::Recurring {
                pattern: RecurrencePattern::Alternating {
                    start_date: parse_date("start_date", &self.start_date)?,
                    dose_count: parse_optional_count("dose_count", &self.dose_count)?,
                },
                dose_time,
            },
            "weekdays" => {
                // Checkbox state can repeat an index across UI re-renders;
                // the pattern holds a set, so normalize here.
                let mut weekdays = self.weekdays.clone();
                weekdays.sort_unstable();
                weekdays.dedup();
                Dosing::Recurring {
                    pattern: RecurrencePattern::SpecificWeekdays { weekdays },
                    dose_time,
                }
            }
            "cycles" => Dosing::Recurring {
                pattern: RecurrencePattern::Cycles {
                    start_date: parse_date("start_date", &self.start_date)?,
                    on_days: parse_count("on_days", &self.on_days)?,
                    off_days: parse_optional_count("off_days", &self.off_days)?.unwrap_or(0),
                },
                dose_time,
            },
            "every_n_days" => Dosing::Recurring {
                pattern: RecurrencePattern::EveryNDays {
                    start_date: parse_date("start_date", &self.start_date)?,
                    n: parse_count("every_n", &self.every_n)?,
                },
                dose_time,
            },
            "every_n_weeks" => Dosing::Recurring {
                pattern: RecurrencePattern::EveryNWeeks {
                    start_date: parse_date("start_date", &self.start_date)?,
                    n: parse_count("every_n", &self.every_n)?,
                },
                dose_time,
            },
            "every_n_months" => Dosing::Recurring {
                pattern: RecurrencePattern::EveryNMonths {
                    start_date: parse_date("start_date", &self.start_date)?,
                    n: parse_count("every_n", &self.every_n)?,
                },
                dose_time,
            },
            "" => return Err(FieldError::Missing { field: "pattern" }.into()),
            other => {
                return Err(FieldError::Invalid {
                    field: "pattern",
                    message: format!("unknown pattern '{other}'"),
                }
                .into())
            }
        };

        let duration = match self.duration.trim() {
            "" | "continuous" => DurationPolicy::Continuous,
            "days" => {
                let days = parse_count("duration_days", &self.duration_days)?;
                if days == 0 {
                    return Err(FieldError::Invalid {
                        field: "duration_days",
                        message: "must be positive".into(),
                    }
                    .into());
                }
                DurationPolicy::FixedDays { days }
            }
            "dose_count" => DurationPolicy::AfterDoseCount,
            other => {
                return Err(FieldError::Invalid {
                    field: "duration",
                    message: format!("unknown duration '{other}'"),
                }
                .into())
            }
        };

        let spec = ScheduleSpec { dosing, duration };
        spec.validate()?;
        Ok(spec)
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<DoseTime, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Missing { field });
    }
    value.parse()
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing { field });
    }
    trimmed.parse().map_err(|_| FieldError::NotANumber {
        field,
        value: trimmed.to_string(),
    })
}

fn parse_optional_count(field: &'static str, value: &str) -> Result<Option<u32>, FieldError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_count(field, value).map(Some)
}

/// Parse a `YYYY-MM-DD` date. Dates that exist in no calendar (February
/// 31st, say) surface as [`FieldError::UnresolvableDay`].
fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing { field });
    }

    let mut parts = trimmed.splitn(3, '-');
    let (y, m, d) = match (parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d)) => (y, m, d),
        _ => {
            return Err(FieldError::Invalid {
                field,
                message: format!("'{trimmed}' is not a YYYY-MM-DD date"),
            })
        }
    };
    let year: i32 = y.parse().map_err(|_| FieldError::NotANumber {
        field,
        value: y.to_string(),
    })?;
    let month: u32 = m.parse().map_err(|_| FieldError::NotANumber {
        field,
        value: m.to_string(),
    })?;
    let day: u32 = d.parse().map_err(|_| FieldError::NotANumber {
        field,
        value: d.to_string(),
    })?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(FieldError::UnresolvableDay { year, month, day })
}
