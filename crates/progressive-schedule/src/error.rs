//! Error types for schedule construction and calculation.

use progressive_core::{CoreError, Currency};
use thiserror::Error;

/// A specialized Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors that can occur while building or updating a schedule.
///
/// Business events that simply fall outside the schedule are not errors;
/// they are reported as absent results by the operations themselves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// An installment window was rejected at construction time.
    #[error("Invalid repayment period {period}: {reason}")]
    ScheduleConstruction {
        /// Zero-based index of the offending window.
        period: usize,
        /// Description of what's invalid.
        reason: String,
    },

    /// An amount was given in a currency other than the schedule's.
    #[error("Currency mismatch: schedule is in {expected}, amount is in {found}")]
    CurrencyMismatch {
        /// Currency of the schedule.
        expected: Currency,
        /// Currency of the rejected amount.
        found: Currency,
    },

    /// Missing required field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl ScheduleError {
    /// Creates a construction error for the window at `period`.
    #[must_use]
    pub fn construction(period: usize, reason: impl Into<String>) -> Self {
        Self::ScheduleConstruction {
            period,
            reason: reason.into(),
        }
    }

    /// Creates a currency mismatch error.
    #[must_use]
    pub fn currency_mismatch(expected: Currency, found: Currency) -> Self {
        Self::CurrencyMismatch { expected, found }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
