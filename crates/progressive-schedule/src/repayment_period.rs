//! One installment window of the schedule.

use progressive_core::types::{Date, Money, RoundingPolicy};
use rust_decimal::Decimal;

use crate::interest_period::InterestPeriod;

/// One EMI installment window and the interest periods it is split into.
///
/// Adjacency is positional: the owning [`ScheduleModel`](crate::ScheduleModel)
/// keeps periods in a vector, so the previous period is `index - 1` and the
/// last period is flagged at construction.
///
/// All due-amount figures are computed on read from the interest periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepaymentPeriod {
    index: usize,
    last: bool,
    from_date: Date,
    due_date: Date,
    emi: Money,
    paid_principal: Money,
    paid_interest: Money,
    interest_periods: Vec<InterestPeriod>,
    rounding: RoundingPolicy,
}

impl RepaymentPeriod {
    pub(crate) fn new(
        index: usize,
        last: bool,
        from_date: Date,
        due_date: Date,
        emi: Money,
        rounding: RoundingPolicy,
    ) -> Self {
        let zero = Money::zero(emi.currency());
        let mut period = Self {
            index,
            last,
            from_date,
            due_date,
            emi,
            paid_principal: zero,
            paid_interest: zero,
            interest_periods: Vec::with_capacity(1),
            rounding,
        };
        period.add_interest_period(InterestPeriod::new(from_date, due_date, zero));
        period
    }

    /// Returns the position of this period in the schedule.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the index of the preceding period, if any.
    #[must_use]
    pub fn previous_index(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    /// Returns true for the first period of the schedule.
    #[must_use]
    pub fn is_first_period(&self) -> bool {
        self.index == 0
    }

    /// Returns true for the terminal period of the schedule.
    #[must_use]
    pub fn is_last_period(&self) -> bool {
        self.last
    }

    /// Returns the start date.
    #[must_use]
    pub fn from_date(&self) -> Date {
        self.from_date
    }

    /// Returns the installment due date.
    #[must_use]
    pub fn due_date(&self) -> Date {
        self.due_date
    }

    /// Returns the installment amount.
    #[must_use]
    pub fn emi(&self) -> Money {
        self.emi
    }

    /// Returns the principal paid against this installment.
    #[must_use]
    pub fn paid_principal(&self) -> Money {
        self.paid_principal
    }

    /// Returns the interest paid against this installment.
    #[must_use]
    pub fn paid_interest(&self) -> Money {
        self.paid_interest
    }

    /// Returns the interest periods ordered by due date.
    #[must_use]
    pub fn interest_periods(&self) -> &[InterestPeriod] {
        &self.interest_periods
    }

    /// Returns the span length in days.
    #[must_use]
    pub fn length_in_days(&self) -> i64 {
        self.due_date - self.from_date
    }

    fn zero(&self) -> Money {
        Money::zero(self.emi.currency())
    }

    /// Sum of the interest accrued over every interest period.
    #[must_use]
    pub fn calculated_due_interest(&self) -> Money {
        self.interest_periods
            .iter()
            .fold(self.zero(), |acc, ip| acc + ip.calculated_due_interest())
    }

    /// `emi - calculated_due_interest()`.
    #[must_use]
    pub fn calculated_due_principal(&self) -> Money {
        self.emi - self.calculated_due_interest()
    }

    /// Interest actually due on this installment.
    ///
    /// When more principal has been paid than the theoretical split allows,
    /// interest is whatever is left of the installment after that principal.
    #[must_use]
    pub fn due_interest(&self) -> Money {
        if self.paid_principal > self.calculated_due_principal() {
            self.emi - self.paid_principal
        } else {
            self.calculated_due_interest()
        }
    }

    /// `emi - due_interest()`.
    #[must_use]
    pub fn due_principal(&self) -> Money {
        self.emi - self.due_interest()
    }

    /// Theoretical interest not charged because of principal overpayment.
    #[must_use]
    pub fn unrecognized_interest(&self) -> Money {
        self.calculated_due_interest() - self.due_interest()
    }

    /// Returns true once principal and interest payments cover the installment.
    #[must_use]
    pub fn is_fully_paid(&self) -> bool {
        self.emi == self.paid_principal + self.paid_interest
    }

    /// `1 + Σ rate_factor` over the interest periods.
    #[must_use]
    pub fn rate_factor_plus_one(&self) -> Decimal {
        self.interest_periods
            .iter()
            .fold(Decimal::ONE, |acc, ip| acc + ip.rate_factor())
    }

    /// Balance in force when the period opens.
    #[must_use]
    pub fn initial_balance(&self) -> Money {
        self.interest_periods
            .first()
            .map_or_else(|| self.zero(), InterestPeriod::outstanding_balance)
    }

    /// Total disbursed within the period.
    #[must_use]
    pub fn disbursed_amount_in_period(&self) -> Money {
        self.interest_periods
            .iter()
            .fold(self.zero(), |acc, ip| acc + ip.disbursement_amount())
    }

    /// Balance on the due date, after every event recorded in the period.
    #[must_use]
    pub fn balance_at_due_date(&self) -> Money {
        self.interest_periods.last().map_or_else(
            || self.zero(),
            |ip| ip.outstanding_balance() + ip.balance_change(),
        )
    }

    /// Balance carried into the next period once this installment's
    /// principal is due.
    ///
    /// Principal payments are already in [`balance_at_due_date`] as negative
    /// corrections, so they are added back before the due principal is taken.
    ///
    /// [`balance_at_due_date`]: Self::balance_at_due_date
    #[must_use]
    pub fn outstanding_balance(&self) -> Money {
        self.balance_at_due_date() + self.paid_principal - self.due_principal()
    }

    /// Inserts an interest period keeping due-date order.
    ///
    /// A period sharing a due date with existing ones goes after them.
    pub fn add_interest_period(&mut self, mut interest_period: InterestPeriod) {
        interest_period.attach(self.length_in_days(), self.rounding);
        let position = self
            .interest_periods
            .partition_point(|ip| ip.due_date() <= interest_period.due_date());
        self.interest_periods.insert(position, interest_period);
    }

    /// Records a principal payment.
    pub fn add_paid_principal(&mut self, amount: Money) {
        self.paid_principal += amount;
    }

    /// Records an interest payment.
    pub fn add_paid_interest(&mut self, amount: Money) {
        self.paid_interest += amount;
    }

    /// Sets the installment amount.
    pub fn set_emi(&mut self, emi: Money) {
        self.emi = emi;
    }

    pub(crate) fn interest_periods_mut(&mut self) -> &mut [InterestPeriod] {
        &mut self.interest_periods
    }

    /// Makes an interest period start on `date` by splitting the one that
    /// strictly spans it.
    ///
    /// Events recorded on the split period keep their original date, so they
    /// move to the new second half. Returns false when an interest period
    /// already starts on `date` or none spans it.
    pub(crate) fn split_interest_period_at(&mut self, date: Date) -> bool {
        if self.interest_periods.iter().any(|ip| ip.from_date() == date) {
            return false;
        }
        let Some(ip) = self
            .interest_periods
            .iter_mut()
            .find(|ip| ip.from_date() < date && date < ip.due_date())
        else {
            return false;
        };

        let original_due = ip.due_date();
        let (disbursement, correction) = ip.take_events();
        ip.set_due_date(date);

        let mut second =
            InterestPeriod::new(date, original_due, Money::zero(disbursement.currency()));
        second.add_disbursement(Some(disbursement));
        second.add_correction(Some(correction));
        self.add_interest_period(second);
        true
    }
}
