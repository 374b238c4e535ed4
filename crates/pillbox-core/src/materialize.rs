//! Schedule materialization: turning a spec into concrete dose instants.
//!
//! The materializer walks the resolved treatment window day by day and
//! emits one `ScheduledDose` per due time. It is deterministic: the same
//! spec, reference date, and horizon always produce the same sequence,
//! and no range is ever enumerated without a bound. The host's reminder
//! collaborator consumes the output; editing a schedule means
//! re-materializing from scratch, never patching a previous run.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Result, WindowError};
use crate::spec::{Dosing, ScheduleSpec};
use crate::times::{daily_times, DoseTime};
use crate::window::resolve_window;

/// A concrete dose instant: one dose due on one date at one time.
///
/// Ordered by `(date, time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduledDose {
    pub date: NaiveDate,
    pub time: DoseTime,
}

/// Materializes schedule specs into ordered dose sequences.
pub struct ScheduleEngine {
    config: EngineConfig,
}

impl ScheduleEngine {
    /// Create an engine with default limits.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with custom limits.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Materialize with the configured default horizon.
    pub fn materialize(&self, spec: &ScheduleSpec, today: NaiveDate) -> Result<Vec<ScheduledDose>> {
        self.materialize_with_horizon(spec, today, self.config.default_horizon_days)
    }

    /// Materialize, enumerating at most `horizon_days` past the window start.
    ///
    /// The horizon bounds continuous schedules, which have no natural
    /// end; callers needing a longer look-ahead re-invoke with a later
    /// `today`. Requests beyond the configured maximum are clamped.
    pub fn materialize_with_horizon(
        &self,
        spec: &ScheduleSpec,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<Vec<ScheduledDose>> {
        spec.validate()?;

        let horizon = i64::from(horizon_days.min(self.config.max_horizon_days));
        let window = resolve_window(spec.dosing.pattern(), spec.duration, today)?;
        // A host config can carry a horizon larger than the calendar;
        // keep the cap a typed failure rather than a panic.
        let cap = window
            .start
            .checked_add_signed(Duration::days(horizon))
            .ok_or(WindowError::DateOutOfRange)?;
        let last = window.end.map_or(cap, |end| end.min(cap));

        let mut doses = Vec::new();
        match &spec.dosing {
            Dosing::Simple(simple) => {
                // Every day in the window is active; sort the generated
                // times so each day's doses come out midnight-ascending.
                let mut times = daily_times(simple.first_dose, simple.interval_hours);
                times.sort_unstable();

                let mut day = window.start;
                while day <= last {
                    for &time in &times {
                        doses.push(ScheduledDose { date: day, time });
                    }
                    day += Duration::days(1);
                }
            }
            Dosing::Recurring { pattern, dose_time } => {
                let mut day = window.start;
                while day <= last {
                    if pattern.is_active_day(day) {
                        doses.push(ScheduledDose {
                            date: day,
                            time: *dose_time,
                        });
                    }
                    day += Duration::days(1);
                }
            }
        }

        tracing::debug!(
            "Materialized {} doses between {} and {}",
            doses.len(),
            window.start,
            last
        );
        Ok(doses)
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::RecurrencePattern;
    use crate::spec::SimpleSchedule;
    use crate::window::DurationPolicy;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(hour: u8, minute: u8) -> DoseTime {
        DoseTime::new(hour, minute).unwrap()
    }

    fn recurring(pattern: RecurrencePattern, duration: DurationPolicy) -> ScheduleSpec {
        ScheduleSpec {
            dosing: Dosing::Recurring {
                pattern,
                dose_time: time(8, 0),
            },
            duration,
        }
    }

    #[test]
    fn simple_schedule_emits_every_time_every_day() {
        let spec = ScheduleSpec {
            dosing: Dosing::Simple(SimpleSchedule::new(8, time(6, 30)).unwrap()),
            duration: DurationPolicy::FixedDays { days: 2 },
        };
        let doses = ScheduleEngine::new().materialize(&spec, date(2024, 5, 1)).unwrap();

        // Window is [May 1, May 3] inclusive, three times a day.
        assert_eq!(doses.len(), 9);
        assert_eq!(
            doses[0],
            ScheduledDose { date: date(2024, 5, 1), time: time(6, 30) }
        );
        assert_eq!(
            doses[8],
            ScheduledDose { date: date(2024, 5, 3), time: time(22, 30) }
        );
        assert!(doses.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn late_first_dose_stays_sorted_within_each_day() {
        // 22:00 with a 6h interval generates wrapped times (04:00, 10:00,
        // 16:00) that must precede 22:00 on each materialized day.
        let spec = ScheduleSpec {
            dosing: Dosing::Simple(SimpleSchedule::new(6, time(22, 0)).unwrap()),
            duration: DurationPolicy::FixedDays { days: 1 },
        };
        let doses = ScheduleEngine::new().materialize(&spec, date(2024, 5, 1)).unwrap();

        let first_day_hours: Vec<u8> = doses
            .iter()
            .filter(|d| d.date == date(2024, 5, 1))
            .map(|d| d.time.hour)
            .collect();
        assert_eq!(first_day_hours, vec![4, 10, 16, 22]);
    }

    #[test]
    fn alternating_with_dose_count_yields_exactly_that_many() {
        let spec = recurring(
            RecurrencePattern::Alternating {
                start_date: date(2024, 1, 1),
                dose_count: Some(5),
            },
            DurationPolicy::AfterDoseCount,
        );
        let doses = ScheduleEngine::new().materialize(&spec, date(2024, 1, 1)).unwrap();

        let dates: Vec<NaiveDate> = doses.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 3),
                date(2024, 1, 5),
                date(2024, 1, 7),
                date(2024, 1, 9),
            ]
        );
    }

    #[test]
    fn weekday_pattern_over_two_weeks() {
        // Mon + Wed over a 14-day window anchored on a Sunday.
        let spec = recurring(
            RecurrencePattern::SpecificWeekdays { weekdays: vec![1, 3] },
            DurationPolicy::Continuous,
        );
        let doses = ScheduleEngine::new()
            .materialize_with_horizon(&spec, date(2024, 1, 7), 13)
            .unwrap();

        assert_eq!(doses.len(), 4);
        assert_eq!(
            doses.iter().map(|d| d.date).collect::<Vec<_>>(),
            vec![date(2024, 1, 8), date(2024, 1, 10), date(2024, 1, 15), date(2024, 1, 17)]
        );
    }

    #[test]
    fn continuous_schedule_is_bounded_by_the_horizon() {
        let spec = recurring(
            RecurrencePattern::EveryNDays {
                start_date: date(2024, 1, 1),
                n: 1,
            },
            DurationPolicy::Continuous,
        );
        let doses = ScheduleEngine::new()
            .materialize_with_horizon(&spec, date(2024, 1, 1), 9)
            .unwrap();
        assert_eq!(doses.len(), 10); // inclusive day range
        assert_eq!(doses.last().unwrap().date, date(2024, 1, 10));
    }

    #[test]
    fn horizon_requests_are_clamped_to_the_configured_maximum() {
        let engine = ScheduleEngine::with_config(EngineConfig {
            default_horizon_days: 30,
            max_horizon_days: 10,
        });
        let spec = recurring(
            RecurrencePattern::EveryNDays {
                start_date: date(2024, 1, 1),
                n: 1,
            },
            DurationPolicy::Continuous,
        );
        let doses = engine
            .materialize_with_horizon(&spec, date(2024, 1, 1), 1000)
            .unwrap();
        assert_eq!(doses.len(), 11);
    }

    #[test]
    fn fixed_end_wins_over_a_longer_horizon() {
        let spec = recurring(
            RecurrencePattern::EveryNDays {
                start_date: date(2024, 1, 1),
                n: 2,
            },
            DurationPolicy::FixedDays { days: 6 },
        );
        let doses = ScheduleEngine::new()
            .materialize_with_horizon(&spec, date(2024, 1, 1), 100)
            .unwrap();
        assert_eq!(
            doses.iter().map(|d| d.date).collect::<Vec<_>>(),
            vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5), date(2024, 1, 7)]
        );
    }

    #[test]
    fn oversized_horizon_config_is_a_typed_error() {
        // A host config may carry a horizon no calendar can hold; the
        // cap must fail typed instead of panicking in date arithmetic.
        let engine = ScheduleEngine::with_config(EngineConfig {
            default_horizon_days: u32::MAX,
            max_horizon_days: u32::MAX,
        });
        let spec = recurring(
            RecurrencePattern::EveryNDays {
                start_date: date(2024, 1, 1),
                n: 1,
            },
            DurationPolicy::Continuous,
        );
        let err = engine.materialize(&spec, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EngineError::Window(WindowError::DateOutOfRange)
        ));
    }

    #[test]
    fn materialization_is_idempotent() {
        let spec = recurring(
            RecurrencePattern::Cycles {
                start_date: date(2024, 3, 1),
                on_days: 5,
                off_days: 2,
            },
            DurationPolicy::Continuous,
        );
        let engine = ScheduleEngine::new();
        let first = engine.materialize_with_horizon(&spec, date(2024, 3, 1), 28).unwrap();
        let second = engine.materialize_with_horizon(&spec, date(2024, 3, 1), 28).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_is_sorted_and_duplicate_free() {
        let spec = ScheduleSpec {
            dosing: Dosing::Simple(SimpleSchedule::new(4, time(9, 15)).unwrap()),
            duration: DurationPolicy::FixedDays { days: 5 },
        };
        let doses = ScheduleEngine::new().materialize(&spec, date(2024, 6, 1)).unwrap();
        assert!(doses.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn invalid_spec_never_partially_materializes() {
        let spec = recurring(
            RecurrencePattern::SpecificWeekdays { weekdays: vec![] },
            DurationPolicy::Continuous,
        );
        assert!(ScheduleEngine::new().materialize(&spec, date(2024, 1, 1)).is_err());
    }
}
