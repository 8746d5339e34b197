//! # Progressive Schedule
//!
//! In-memory interest schedule model for progressive (equal-installment)
//! loans, plus the EMI calculator that drives it.
//!
//! This crate provides:
//!
//! - **Model**: [`ScheduleModel`] owning the ordered [`RepaymentPeriod`]s, each
//!   split into [`InterestPeriod`]s wherever a balance event falls mid-period
//! - **Rates**: [`RateHistory`] resolving the nominal rate in force on a date
//! - **Calculator**: [`ProgressiveEmiCalculator`] for disbursements, balance
//!   corrections, rate changes, payments and payoff quotes
//!
//! ## Example
//!
//! ```rust
//! use progressive_core::prelude::*;
//! use progressive_schedule::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let d = |m| Date::from_ymd(2024, m, 1).unwrap();
//! let product = ProductDetail::new(Currency::USD, dec!(9.4822))
//!     .with_days_in_year(DaysInYear::Days360)
//!     .with_days_in_month(DaysInMonth::Days30);
//! let windows: Vec<_> = (1..=6).map(|m| (d(m), d(m + 1))).collect();
//!
//! let calculator = ProgressiveEmiCalculator::new();
//! let mut model = calculator.generate_model(&windows, product, None).unwrap();
//! calculator
//!     .add_disbursement(&mut model, d(1), Money::of(Currency::USD, dec!(100)))
//!     .unwrap();
//!
//! let first = &model.repayment_periods()[0];
//! assert_eq!(first.emi().amount(), dec!(17.13));
//! assert_eq!(first.due_interest().amount(), dec!(0.79));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::unused_self)]

pub mod calculator;
pub mod error;
pub mod interest_period;
pub mod model;
pub mod product;
pub mod rate_history;
pub mod repayment_period;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calculator::{EmiCalculator, PayableDetails, ProgressiveEmiCalculator};
    pub use crate::error::{ScheduleError, ScheduleResult};
    pub use crate::interest_period::InterestPeriod;
    pub use crate::model::{RepaymentWindow, ScheduleModel, ScheduleModelBuilder};
    pub use crate::product::ProductDetail;
    pub use crate::rate_history::{RateEntry, RateHistory};
    pub use crate::repayment_period::RepaymentPeriod;
}

pub use calculator::{EmiCalculator, PayableDetails, ProgressiveEmiCalculator};
pub use error::{ScheduleError, ScheduleResult};
pub use interest_period::InterestPeriod;
pub use model::{RepaymentWindow, ScheduleModel, ScheduleModelBuilder};
pub use product::ProductDetail;
pub use rate_history::{RateEntry, RateHistory};
pub use repayment_period::RepaymentPeriod;
