//! # Progressive Core
//!
//! Core value types for the Progressive loan interest scheduling engine.
//!
//! This crate provides the building blocks the schedule engine computes with:
//!
//! - **Types**: `Date`, `Currency`, `Money` and the `RoundingPolicy` that
//!   every monetary calculation is rounded by
//! - **Conventions**: repayment frequency and the day-basis conventions
//!   (`DaysInYear`, `DaysInMonth`) used to derive periodic rate factors
//!
//! ## Example
//!
//! ```rust
//! use progressive_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let policy = RoundingPolicy::default();
//! let interest = Money::of(Currency::USD, dec!(1000)).multiplied_by(dec!(0.00666666), &policy);
//! assert_eq!(interest.amount(), dec!(6.67));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::similar_names)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::cast_possible_truncation)]

pub mod conventions;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::conventions::{DaysInMonth, DaysInYear, PeriodFrequency};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Currency, Date, Money, RoundingMode, RoundingPolicy};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Currency, Date, Money, RoundingMode, RoundingPolicy};
