//! Currency-aware monetary amount.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use super::{Currency, RoundingPolicy};
use crate::error::{CoreError, CoreResult};

/// A monetary amount with exact decimal arithmetic.
///
/// Arithmetic operators assume both operands share a currency; use
/// [`Money::checked_add`] and [`Money::checked_sub`] where the currencies
/// are not already known to agree.
///
/// # Example
///
/// ```rust
/// use progressive_core::types::{Currency, Money, RoundingPolicy};
/// use rust_decimal_macros::dec;
///
/// let policy = RoundingPolicy::default();
/// let emi = Money::of(Currency::USD, dec!(17.126));
/// assert_eq!(emi.round(&policy).amount(), dec!(17.13));
/// assert_eq!(emi.round_to_multiples_of(5).amount(), dec!(15));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates an amount in the given currency.
    #[must_use]
    pub fn of(currency: Currency, amount: Decimal) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the given currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns the decimal amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if both amounts have the same currency.
    #[must_use]
    pub fn same_currency(&self, other: &Self) -> bool {
        self.currency == other.currency
    }

    /// Adds two amounts, failing on a currency mismatch.
    pub fn checked_add(&self, other: &Self) -> CoreResult<Self> {
        self.ensure_same_currency(other)?;
        Ok(Self::of(self.currency, self.amount + other.amount))
    }

    /// Subtracts two amounts, failing on a currency mismatch.
    pub fn checked_sub(&self, other: &Self) -> CoreResult<Self> {
        self.ensure_same_currency(other)?;
        Ok(Self::of(self.currency, self.amount - other.amount))
    }

    /// Returns `Err` unless `other` is in this amount's currency.
    pub fn ensure_same_currency(&self, other: &Self) -> CoreResult<()> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(CoreError::currency_mismatch(self.currency, other.currency))
        }
    }

    /// Multiplies by a decimal factor, rounding the product to the currency scale.
    #[must_use]
    pub fn multiplied_by(&self, factor: Decimal, policy: &RoundingPolicy) -> Self {
        Self::of(self.currency, self.amount * factor).round(policy)
    }

    /// Rounds to the currency's minor-unit scale.
    #[must_use]
    pub fn round(&self, policy: &RoundingPolicy) -> Self {
        Self::of(
            self.currency,
            policy.round_amount(self.amount, self.currency),
        )
    }

    /// Rounds to the nearest multiple of `unit` whole currency units.
    ///
    /// Halves round away from zero. A unit of zero leaves the amount unchanged.
    #[must_use]
    pub fn round_to_multiples_of(&self, unit: u32) -> Self {
        if unit == 0 {
            return *self;
        }
        let unit = Decimal::from(unit);
        let multiples =
            (self.amount / unit).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self::of(self.currency, multiples * unit)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Returns the absolute amount.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::of(self.currency, self.amount.abs())
    }

    /// Returns the smaller of two same-currency amounts.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.amount <= other.amount {
            self
        } else {
            other
        }
    }

    /// Returns the larger of two same-currency amounts.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.amount >= other.amount {
            self
        } else {
            other
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch in add");
        Self::of(self.currency, self.amount + rhs.amount)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch in sub");
        Self::of(self.currency, self.amount - rhs.amount)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::of(self.currency, -self.amount)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            None
        } else {
            self.amount.partial_cmp(&other.amount)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
