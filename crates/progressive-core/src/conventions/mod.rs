//! Period and day-basis conventions.
//!
//! A repayment period's rate factor is the annual nominal rate scaled by the
//! period length over the year length. These conventions decide how both are
//! counted:
//!
//! - [`PeriodFrequency`]: the unit a repayment period is measured in
//! - [`DaysInYear`]: the year basis (actual, 360, 364 or 365 days)
//! - [`DaysInMonth`]: the month basis (actual or 30 days)

mod day_basis;
mod frequency;

pub use day_basis::{DaysInMonth, DaysInYear};
pub use frequency::PeriodFrequency;
