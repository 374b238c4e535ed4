//! Core error types for pillbox-core.
//!
//! All failures surface at spec-construction or window-resolution time;
//! once a spec has passed validation, the evaluator and generator are
//! total and cannot fail. The engine never partially materializes a
//! schedule and never fixes up an invalid spec silently.

use thiserror::Error;

/// Top-level error type for pillbox-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Structurally invalid recurrence pattern
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    /// Duration policy could not be resolved into a treatment window
    #[error("Window resolution failed: {0}")]
    Window(#[from] WindowError),

    /// A raw form field failed to parse or was out of range
    #[error("Invalid field: {0}")]
    Field(#[from] FieldError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Structural violations of a pattern's invariants.
///
/// Rejected at construction time by the window resolver and the input
/// boundary; the active-day evaluator assumes a well-formed pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Weekday pattern with nothing selected
    #[error("Weekday pattern has an empty weekday set")]
    EmptyWeekdays,

    /// Weekday index outside 0..=6
    #[error("Weekday index {0} is out of range (expected 0-6, Sunday first)")]
    WeekdayOutOfRange(u8),

    /// A count parameter that must be strictly positive was zero
    #[error("'{field}' must be positive")]
    NonPositive { field: &'static str },
}

/// Failures resolving a duration policy into a concrete window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// `FixedDays` with a zero day count
    #[error("Treatment duration in days must be positive")]
    NonPositiveDays,

    /// Dose-count duration on an alternating pattern without a dose count
    #[error("Dose-count duration requires the pattern to carry a dose count")]
    MissingDoseCount,

    /// Dose-count duration combined with anything but an alternating pattern
    #[error("Dose-count duration is only supported for alternating-day patterns")]
    DoseCountUnsupported,

    /// Day arithmetic walked past the end of the supported calendar
    #[error("Date range exceeds the supported calendar")]
    DateOutOfRange,
}

/// Parse and range failures at the free-text input boundary.
///
/// Each variant names the offending form field so the host UI can point
/// at it and block saving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Required field left empty
    #[error("'{field}' is required")]
    Missing { field: &'static str },

    /// Numeric field that did not parse
    #[error("'{field}' must be a number (got '{value}')")]
    NotANumber { field: &'static str, value: String },

    /// Parsed but rejected value
    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },

    /// A date that exists in no calendar (e.g. February 31st)
    #[error("No such calendar date: {year:04}-{month:02}-{day:02}")]
    UnresolvableDay { year: i32, month: u32, day: u32 },
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(String),
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
