//! Wall-clock dose times and the daily clock-time generator.
//!
//! All times are local, single-device, wall-clock values. Time zones,
//! travel, and leap seconds are out of scope for the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Hour intervals accepted for simple fixed-interval schedules.
///
/// The generator computes the per-day dose count as `24 / interval`, so
/// only divisors of 24 are admitted at the spec boundary. Non-divisor
/// intervals would silently truncate the count.
pub const SUPPORTED_INTERVALS: [u8; 6] = [2, 4, 6, 8, 12, 24];

/// A wall-clock time of day at which a dose is due.
///
/// Ordering is midnight-ascending (hour, then minute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DoseTime {
    pub hour: u8,   // 0-23
    pub minute: u8, // 0-59
}

impl DoseTime {
    /// Create a dose time, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, FieldError> {
        if hour > 23 {
            return Err(FieldError::Invalid {
                field: "hour",
                message: format!("{hour} is out of range (0-23)"),
            });
        }
        if minute > 59 {
            return Err(FieldError::Invalid {
                field: "minute",
                message: format!("{minute} is out of range (0-59)"),
            });
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for DoseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for DoseTime {
    type Err = FieldError;

    /// Parse an `HH:MM` string as entered in the medication form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed.split_once(':').ok_or_else(|| FieldError::Invalid {
            field: "time",
            message: format!("'{trimmed}' is not an HH:MM time"),
        })?;
        let hour: u8 = h.trim().parse().map_err(|_| FieldError::NotANumber {
            field: "hour",
            value: h.trim().to_string(),
        })?;
        let minute: u8 = m.trim().parse().map_err(|_| FieldError::NotANumber {
            field: "minute",
            value: m.trim().to_string(),
        })?;
        Self::new(hour, minute)
    }
}

/// Generate the repeating daily clock times for a fixed-interval schedule.
///
/// Starting from `first`, adds `interval_hours` modulo 24 until the start
/// time would come around again, yielding `24 / interval_hours` entries in
/// generation order (starting at `first`, not sorted from midnight).
///
/// `interval_hours == 0` is a precondition violation the caller must
/// reject before invoking; the spec boundary only admits
/// [`SUPPORTED_INTERVALS`].
pub fn daily_times(first: DoseTime, interval_hours: u8) -> Vec<DoseTime> {
    debug_assert!(interval_hours > 0);
    let count = 24 / interval_hours as usize;
    let mut times = Vec::with_capacity(count);
    let mut hour = first.hour;
    for _ in 0..count {
        times.push(DoseTime {
            hour,
            minute: first.minute,
        });
        hour = (hour + interval_hours) % 24;
    }
    times
}
