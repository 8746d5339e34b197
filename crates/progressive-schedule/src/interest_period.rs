//! The smallest proration unit inside a repayment period.

use progressive_core::types::{Date, Money, RoundingPolicy};
use rust_decimal::Decimal;

/// A contiguous span of a repayment period over which the balance is flat.
///
/// Disbursements and corrections recorded on an interest period take effect
/// at its `due_date`; the interest period that follows carries the changed
/// balance. `outstanding_balance` and `period_rate_factor` are derived state
/// kept current by the owning [`ScheduleModel`](crate::ScheduleModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestPeriod {
    from_date: Date,
    due_date: Date,
    disbursement_amount: Money,
    balance_correction: Money,
    outstanding_balance: Money,
    period_rate_factor: Decimal,
    year_split_factor: Option<Decimal>,
    repayment_period_days: i64,
    rounding: RoundingPolicy,
}

impl InterestPeriod {
    /// Creates an interest period with no balance and no events.
    ///
    /// `zero` fixes the currency. Day span and rounding are stamped by the
    /// repayment period the interest period is added to.
    #[must_use]
    pub fn new(from_date: Date, due_date: Date, zero: Money) -> Self {
        Self {
            from_date,
            due_date,
            disbursement_amount: zero,
            balance_correction: zero,
            outstanding_balance: zero,
            period_rate_factor: Decimal::ZERO,
            year_split_factor: None,
            repayment_period_days: 0,
            rounding: RoundingPolicy::default(),
        }
    }

    /// Returns the start date.
    #[must_use]
    pub fn from_date(&self) -> Date {
        self.from_date
    }

    /// Returns the end date.
    #[must_use]
    pub fn due_date(&self) -> Date {
        self.due_date
    }

    /// Returns the amount disbursed at `due_date`.
    #[must_use]
    pub fn disbursement_amount(&self) -> Money {
        self.disbursement_amount
    }

    /// Returns the balance correction applied at `due_date`.
    #[must_use]
    pub fn balance_correction(&self) -> Money {
        self.balance_correction
    }

    /// Returns the balance interest accrues on over this span.
    #[must_use]
    pub fn outstanding_balance(&self) -> Money {
        self.outstanding_balance
    }

    /// Returns the whole-repayment-period rate factor at the rate in force on
    /// `from_date`.
    #[must_use]
    pub fn period_rate_factor(&self) -> Decimal {
        self.period_rate_factor
    }

    /// Returns the net balance change recorded at `due_date`.
    #[must_use]
    pub fn balance_change(&self) -> Money {
        self.disbursement_amount + self.balance_correction
    }

    /// Returns the span length in days.
    #[must_use]
    pub fn length_in_days(&self) -> i64 {
        self.due_date - self.from_date
    }

    /// Accumulates a disbursement. `None` and zero are no-ops.
    pub fn add_disbursement(&mut self, amount: Option<Money>) {
        if let Some(amount) = amount.filter(|a| !a.is_zero()) {
            self.disbursement_amount += amount;
        }
    }

    /// Accumulates a balance correction. `None` and zero are no-ops.
    pub fn add_correction(&mut self, amount: Option<Money>) {
        if let Some(amount) = amount.filter(|a| !a.is_zero()) {
            self.balance_correction += amount;
        }
    }

    /// This span's share of the repayment period rate factor, prorated by
    /// days and rounded to the rate scale.
    ///
    /// A span crossing a year end on an actual year basis uses its own
    /// per-year factor instead. Zero when the owning repayment period has no
    /// length.
    #[must_use]
    pub fn rate_factor(&self) -> Decimal {
        if let Some(factor) = self.year_split_factor {
            return self.rounding.round_rate(factor);
        }
        if self.repayment_period_days <= 0 {
            return Decimal::ZERO;
        }
        let share = self.period_rate_factor * Decimal::from(self.length_in_days())
            / Decimal::from(self.repayment_period_days);
        self.rounding.round_rate(share)
    }

    /// Interest accrued over this span: `outstanding_balance * rate_factor`.
    #[must_use]
    pub fn calculated_due_interest(&self) -> Money {
        self.outstanding_balance
            .multiplied_by(self.rate_factor(), &self.rounding)
    }

    pub(crate) fn attach(&mut self, repayment_period_days: i64, rounding: RoundingPolicy) {
        self.repayment_period_days = repayment_period_days;
        self.rounding = rounding;
    }

    pub(crate) fn set_due_date(&mut self, due_date: Date) {
        self.due_date = due_date;
    }

    pub(crate) fn set_outstanding_balance(&mut self, balance: Money) {
        self.outstanding_balance = balance;
    }

    pub(crate) fn set_period_rate_factor(&mut self, factor: Decimal) {
        self.period_rate_factor = factor;
    }

    pub(crate) fn set_year_split_factor(&mut self, factor: Option<Decimal>) {
        self.year_split_factor = factor;
    }

    /// Moves the recorded events off this period, leaving zeros.
    pub(crate) fn take_events(&mut self) -> (Money, Money) {
        let zero = Money::zero(self.disbursement_amount.currency());
        let disbursement = std::mem::replace(&mut self.disbursement_amount, zero);
        let correction = std::mem::replace(&mut self.balance_correction, zero);
        (disbursement, correction)
    }
}
