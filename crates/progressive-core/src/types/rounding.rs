//! Rounding policy threaded through every monetary and rate calculation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Currency;

/// Default number of decimal places kept on rate factors.
pub const DEFAULT_RATE_SCALE: u32 = 12;

/// Rounding mode applied to rates and amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half to even (banker's rounding).
    #[default]
    HalfEven,
    /// Round half away from zero.
    HalfUp,
    /// Round half toward zero.
    HalfDown,
    /// Truncate toward zero.
    Down,
    /// Round away from zero.
    Up,
    /// Round toward positive infinity.
    Ceiling,
    /// Round toward negative infinity.
    Floor,
}

impl RoundingMode {
    /// Returns the equivalent `rust_decimal` strategy.
    #[must_use]
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::Down => "DOWN",
            RoundingMode::Up => "UP",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
        };
        write!(f, "{name}")
    }
}

/// Precision and rounding applied by the schedule engine.
///
/// Rate factors are kept at `rate_scale` decimal places; monetary amounts are
/// kept at their currency's minor-unit scale. Both use `mode`.
///
/// The policy is a plain value handed to the model at construction, so two
/// schedules with different policies never interfere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Decimal places kept on rate factors.
    pub rate_scale: u32,
    /// Rounding mode.
    pub mode: RoundingMode,
}

impl RoundingPolicy {
    /// Creates a rounding policy.
    #[must_use]
    pub fn new(rate_scale: u32, mode: RoundingMode) -> Self {
        Self { rate_scale, mode }
    }

    /// Rounds a rate factor to `rate_scale`.
    #[must_use]
    pub fn round_rate(&self, rate: Decimal) -> Decimal {
        rate.round_dp_with_strategy(self.rate_scale, self.mode.strategy())
    }

    /// Rounds an amount to the currency's minor-unit scale.
    #[must_use]
    pub fn round_amount(&self, amount: Decimal, currency: Currency) -> Decimal {
        amount.round_dp_with_strategy(currency.decimal_places(), self.mode.strategy())
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_SCALE, RoundingMode::HalfEven)
    }
}
