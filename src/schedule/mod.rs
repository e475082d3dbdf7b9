//! Date-recurrence engine: rules, validation, and pure occurrence
//! projection.
//!
//! The rest of the crate treats this module as a calculator: records hand it
//! a [`RecurrenceRule`] and an explicit `today`, and get back the next
//! occurrence date or window. Nothing here touches the clock, storage, or
//! logging.

pub mod frequency;
pub mod projection;
pub mod rule;
pub mod span;

pub use frequency::Frequency;
pub use projection::{
    next_occurrence, next_occurrence_window, next_occurrence_window_with, next_occurrence_with,
    DayOfMonthPolicy,
};
pub use rule::{ordinal, RecurrenceRule, RuleViolation, WEEKDAY_LABELS};
pub use span::DateSpan;

use thiserror::Error;

/// Failures the engine signals instead of guessing at a date. Both are
/// fatal to the single call; the engine performs no logging, retries, or
/// partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A frequency token is not one of the five recognized values. Raised
    /// where tokens enter the system (string parsing, deserialization).
    #[error("unrecognized frequency `{0}`")]
    InvalidFrequency(String),
    /// A rule is structurally inconsistent with its frequency.
    #[error("invalid recurrence rule: {0}")]
    InvalidRule(RuleViolation),
}

impl From<RuleViolation> for ScheduleError {
    fn from(violation: RuleViolation) -> Self {
        ScheduleError::InvalidRule(violation)
    }
}
