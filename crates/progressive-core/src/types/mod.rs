//! Value types for loan schedule calculations.
//!
//! - [`Date`]: Calendar date for period boundaries and balance events
//! - [`Currency`]: ISO currency codes
//! - [`Money`]: Currency-aware amount with exact decimal arithmetic
//! - [`RoundingPolicy`]: Precision applied to rates and amounts

mod currency;
mod date;
mod money;
mod rounding;

pub use currency::Currency;
pub use date::Date;
pub use money::Money;
pub use rounding::{RoundingMode, RoundingPolicy, DEFAULT_RATE_SCALE};
