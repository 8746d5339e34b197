//! Progressive Configuration Layer
//!
//! Loan product configuration for the Progressive scheduling engine.
//!
//! # Features
//!
//! - **Product Configuration**: currency, nominal rate, repayment frequency,
//!   day bases, rounding and installment multiples
//! - **Validation**: every product is validated before it is registered
//! - **Registry**: a thread-safe manager pre-loaded with standard products
//! - **File Loading**: JSON and TOML product catalogs
//!
//! # Example
//!
//! ```rust
//! use progressive_config::{ProductConfig, ProductConfigManager};
//! use progressive_core::types::Date;
//! use rust_decimal::Decimal;
//!
//! let manager = ProductConfigManager::new();
//! let product = manager
//!     .get("MONTHLY.360.30")
//!     .unwrap()
//!     .with_name("STAFF.LOAN")
//!     .with_annual_interest_rate(Decimal::new(85, 1));
//! manager.register(product.clone()).unwrap();
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let model = product.schedule_model(start, 12).unwrap();
//! assert_eq!(model.repayment_periods().len(), 12);
//! ```
//!
//! # Standard Products
//!
//! - `MONTHLY.360.30` - monthly installments, 360/30 day basis
//! - `MONTHLY.ACTUAL` - monthly installments, actual/actual day basis
//! - `WEEKLY.365` - weekly installments, 365-day year
//! - `DAILY.365` - daily installments, 365-day year

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod manager;
mod product;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use manager::{ProductCatalog, ProductConfigManager};
pub use product::ProductConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::manager::ProductConfigManager;
    pub use crate::product::ProductConfig;
}
