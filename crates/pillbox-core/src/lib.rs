//! # Pillbox Core Library
//!
//! Core dosing-schedule engine for Pillbox, a medication manager for
//! caregivers and patients. The engine turns a declarative description of
//! "how often and since when" a medication is taken into a bounded,
//! ordered sequence of concrete dose instants.
//!
//! ## Architecture
//!
//! - **Clock-Time Generator** ([`daily_times`]): the repeating daily
//!   clock times of a simple fixed-interval schedule
//! - **Recurrence Pattern Evaluator** ([`RecurrencePattern`]): six
//!   advanced patterns deciding whether a calendar day is an active
//!   dosing day
//! - **Treatment Window Resolver** ([`resolve_window`]): duration
//!   policies resolved into a concrete `[start, end?]` date range,
//!   including end dates derived from a dose count
//! - **Schedule Materializer** ([`ScheduleEngine`]): walks the window and
//!   emits the ordered dose sequence
//!
//! The engine is pure, synchronous, single-threaded computation. Every
//! reference date is passed in explicitly (no hidden clock reads), so
//! materialization is deterministic and testable. Reminder registration
//! and persistence are the host application's collaborators; this crate
//! only produces times.

pub mod config;
pub mod error;
pub mod input;
pub mod materialize;
pub mod pattern;
pub mod spec;
pub mod times;
pub mod window;

pub use config::EngineConfig;
pub use error::{ConfigError, EngineError, FieldError, PatternError, WindowError};
pub use input::ScheduleForm;
pub use materialize::{ScheduleEngine, ScheduledDose};
pub use pattern::RecurrencePattern;
pub use spec::{Dosing, ScheduleSpec, SimpleSchedule};
pub use times::{daily_times, DoseTime, SUPPORTED_INTERVALS};
pub use window::{resolve_window, DurationPolicy, TreatmentWindow};
