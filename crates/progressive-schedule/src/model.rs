//! The schedule aggregate: repayment periods, rate history and product terms.

use std::sync::Arc;

use progressive_core::types::{Currency, Date, Money};
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::{ScheduleError, ScheduleResult};
use crate::interest_period::InterestPeriod;
use crate::product::ProductDetail;
use crate::rate_history::{RateEntry, RateHistory};
use crate::repayment_period::RepaymentPeriod;

/// One installment window handed to schedule construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepaymentWindow {
    /// Start date (exclusive boundary shared with the previous window).
    pub from_date: Date,
    /// Installment due date.
    pub due_date: Date,
    /// Installment amount.
    pub emi: Money,
}

impl RepaymentWindow {
    /// Creates a window.
    #[must_use]
    pub fn new(from_date: Date, due_date: Date, emi: Money) -> Self {
        Self {
            from_date,
            due_date,
            emi,
        }
    }
}

/// Interest schedule of a single loan.
///
/// Owns the repayment periods in due-date order. Product terms and rate
/// history are behind `Arc`s, so [`deep_copy`](Self::deep_copy) only clones
/// the periods; a copy that later records a rate change detaches its own
/// history first.
///
/// Every mutation re-derives interest-period balances and rate factors, so
/// the read accessors always reflect the recorded events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleModel {
    repayment_periods: Vec<RepaymentPeriod>,
    rate_history: Arc<RateHistory>,
    product: Arc<ProductDetail>,
    installment_rounding_unit: Option<u32>,
}

impl ScheduleModel {
    /// Builds a schedule from contiguous installment windows.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::ScheduleConstruction` naming the first window
    /// that is zero-length or inverted, has a negative EMI, or does not
    /// start where the previous window ended; `ScheduleError::CurrencyMismatch`
    /// if an EMI is not in the product currency.
    pub fn new(
        windows: &[RepaymentWindow],
        product: ProductDetail,
        rate_history: RateHistory,
        installment_rounding_unit: Option<u32>,
    ) -> ScheduleResult<Self> {
        validate_windows(windows, product.currency)?;

        let count = windows.len();
        let repayment_periods = windows
            .iter()
            .enumerate()
            .map(|(index, window)| {
                RepaymentPeriod::new(
                    index,
                    index + 1 == count,
                    window.from_date,
                    window.due_date,
                    window.emi,
                    product.rounding,
                )
            })
            .collect();

        let mut model = Self {
            repayment_periods,
            rate_history: Arc::new(rate_history),
            product: Arc::new(product),
            installment_rounding_unit,
        };
        model.refresh();
        Ok(model)
    }

    /// Builds a schedule with zero installments over `(from, due)` pairs.
    pub fn from_dates(
        periods: &[(Date, Date)],
        product: ProductDetail,
        installment_rounding_unit: Option<u32>,
    ) -> ScheduleResult<Self> {
        let zero = product.zero();
        let windows: Vec<RepaymentWindow> = periods
            .iter()
            .map(|&(from, due)| RepaymentWindow::new(from, due, zero))
            .collect();
        Self::new(&windows, product, RateHistory::new(), installment_rounding_unit)
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ScheduleModelBuilder {
        ScheduleModelBuilder::default()
    }

    /// Records a disbursement and/or balance correction on `date`.
    ///
    /// The period covering `date` is the first with `from <= date <= due`,
    /// or any later one with `from < date <= due`; a boundary date belongs
    /// to the period ending on it. Inside that period the amounts land on
    /// the interest period ending on `date`, splitting one at `date` if none
    /// does. The changed balance applies from `date` onwards.
    ///
    /// Returns `Ok(None)` without touching the schedule when `date` falls
    /// outside every period.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::CurrencyMismatch` if an amount is not in the
    /// schedule currency.
    pub fn apply_balance_change(
        &mut self,
        date: Date,
        disbursed: Option<Money>,
        corrected: Option<Money>,
    ) -> ScheduleResult<Option<&RepaymentPeriod>> {
        self.ensure_currency(disbursed)?;
        self.ensure_currency(corrected)?;

        let Some(index) = self.period_index_for_balance_change(date) else {
            debug!(%date, "balance change outside the schedule ignored");
            return Ok(None);
        };

        record_balance_change(&mut self.repayment_periods[index], date, disbursed, corrected);
        self.refresh();
        Ok(self.repayment_periods.get(index))
    }

    /// Returns an independent copy for speculative recalculation.
    ///
    /// Periods are cloned; product terms and rate history stay shared.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Days from the first period's start to the last period's due date.
    #[must_use]
    pub fn loan_term_in_days(&self) -> i64 {
        match (self.repayment_periods.first(), self.repayment_periods.last()) {
            (Some(first), Some(last)) => last.due_date() - first.from_date(),
            _ => 0,
        }
    }

    /// Due date of the last period.
    #[must_use]
    pub fn maturity_date(&self) -> Option<Date> {
        self.repayment_periods.last().map(RepaymentPeriod::due_date)
    }

    /// Finds the period due on exactly `due_date`.
    #[must_use]
    pub fn find_repayment_period(&self, due_date: Date) -> Option<&RepaymentPeriod> {
        self.find_period_index(due_date)
            .map(|index| &self.repayment_periods[index])
    }

    /// Periods due on or after `from_due_date`, or all of them.
    #[must_use]
    pub fn related_repayment_periods(&self, from_due_date: Option<Date>) -> &[RepaymentPeriod] {
        let start = from_due_date.map_or(0, |from| {
            self.repayment_periods
                .partition_point(|period| period.due_date() < from)
        });
        &self.repayment_periods[start..]
    }

    /// Returns all repayment periods in order.
    #[must_use]
    pub fn repayment_periods(&self) -> &[RepaymentPeriod] {
        &self.repayment_periods
    }

    /// Nominal annual rate in force on `date`.
    #[must_use]
    pub fn interest_rate(&self, date: Date) -> Decimal {
        self.rate_history
            .interest_rate(date, self.product.default_annual_rate)
    }

    /// Returns the rate history.
    #[must_use]
    pub fn rate_history(&self) -> &RateHistory {
        &self.rate_history
    }

    /// Returns true if both schedules still share one rate history.
    #[must_use]
    pub fn shares_rate_history_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rate_history, &other.rate_history)
    }

    /// Returns the product terms.
    #[must_use]
    pub fn product(&self) -> &ProductDetail {
        &self.product
    }

    /// Returns the schedule currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.product.currency
    }

    /// Returns a zero amount in the schedule currency.
    #[must_use]
    pub fn zero(&self) -> Money {
        self.product.zero()
    }

    /// Returns the unit installments are rounded to multiples of.
    #[must_use]
    pub fn installment_rounding_unit(&self) -> Option<u32> {
        self.installment_rounding_unit
    }

    pub(crate) fn ensure_currency(&self, amount: Option<Money>) -> ScheduleResult<()> {
        match amount {
            Some(amount) if amount.currency() != self.currency() => Err(
                ScheduleError::currency_mismatch(self.currency(), amount.currency()),
            ),
            _ => Ok(()),
        }
    }

    pub(crate) fn period_index_for_balance_change(&self, date: Date) -> Option<usize> {
        self.repayment_periods.iter().position(|period| {
            let after_start = if period.is_first_period() {
                date >= period.from_date()
            } else {
                date > period.from_date()
            };
            after_start && date <= period.due_date()
        })
    }

    pub(crate) fn find_period_index(&self, due_date: Date) -> Option<usize> {
        self.repayment_periods
            .iter()
            .position(|period| period.due_date() == due_date)
    }

    pub(crate) fn repayment_periods_mut(&mut self) -> &mut [RepaymentPeriod] {
        &mut self.repayment_periods
    }

    /// Records a rate entry, detaching the history from other copies first.
    pub(crate) fn add_rate_entry(&mut self, entry: RateEntry) {
        Arc::make_mut(&mut self.rate_history).add(entry);
    }

    /// Re-derives interest-period rate factors and balances.
    ///
    /// Walks every interest period in date order: each accrues on the running
    /// balance, then its recorded events adjust that balance. At each due
    /// date the installment's due principal leaves the balance and paid
    /// principal, already booked as a correction, is added back.
    pub(crate) fn refresh(&mut self) {
        let mut running = self.zero();
        for period in &mut self.repayment_periods {
            for ip in period.interest_periods_mut() {
                let rate = self
                    .rate_history
                    .interest_rate(ip.from_date(), self.product.default_annual_rate);
                ip.set_period_rate_factor(self.product.period_rate_factor(rate, ip.from_date()));
                ip.set_year_split_factor(self.product.year_split_rate_factor(
                    rate,
                    ip.from_date(),
                    ip.due_date(),
                ));
                ip.set_outstanding_balance(running);
                running += ip.balance_change();
            }
            running = running + period.paid_principal() - period.due_principal();
        }
        trace!(closing_balance = %running, "schedule balances refreshed");
    }
}

/// Lands a balance event on the interest period ending on `date`, splitting
/// the covering interest period when no boundary falls on it.
fn record_balance_change(
    period: &mut RepaymentPeriod,
    date: Date,
    disbursed: Option<Money>,
    corrected: Option<Money>,
) {
    let zero = Money::zero(period.emi().currency());
    let from_date = period.from_date();
    let interest_periods = period.interest_periods_mut();

    if let Some(ip) = interest_periods.iter_mut().find(|ip| ip.due_date() == date) {
        ip.add_disbursement(disbursed);
        ip.add_correction(corrected);
        return;
    }

    let selected = if date > from_date {
        interest_periods.len().saturating_sub(1)
    } else {
        interest_periods
            .iter()
            .position(|ip| ip.from_date() < date && date <= ip.due_date())
            .unwrap_or(0)
    };
    let Some(ip) = interest_periods.get_mut(selected) else {
        return;
    };

    let original_due = ip.due_date();
    let new_due = date.clamp(ip.from_date(), original_due);
    ip.set_due_date(new_due);
    ip.add_disbursement(disbursed);
    ip.add_correction(corrected);

    debug!(
        installment = period.index(),
        %date,
        split_at = %new_due,
        "interest period split"
    );
    period.add_interest_period(InterestPeriod::new(new_due, original_due, zero));
}

fn validate_windows(windows: &[RepaymentWindow], currency: Currency) -> ScheduleResult<()> {
    for (index, window) in windows.iter().enumerate() {
        if window.due_date <= window.from_date {
            return Err(ScheduleError::construction(
                index,
                format!(
                    "due date {} must be after from date {}",
                    window.due_date, window.from_date
                ),
            ));
        }
        if window.emi.currency() != currency {
            return Err(ScheduleError::currency_mismatch(currency, window.emi.currency()));
        }
        if window.emi.is_negative() {
            return Err(ScheduleError::construction(
                index,
                format!("installment amount {} is negative", window.emi),
            ));
        }
        if let Some(previous) = index.checked_sub(1).map(|i| &windows[i]) {
            if previous.due_date != window.from_date {
                return Err(ScheduleError::construction(
                    index,
                    format!(
                        "from date {} does not follow previous due date {}",
                        window.from_date, previous.due_date
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Builder for `ScheduleModel`.
#[derive(Debug, Clone, Default)]
pub struct ScheduleModelBuilder {
    product: Option<ProductDetail>,
    windows: Vec<RepaymentWindow>,
    rate_history: RateHistory,
    installment_rounding_unit: Option<u32>,
}

impl ScheduleModelBuilder {
    /// Sets the product terms.
    #[must_use]
    pub fn product(mut self, product: ProductDetail) -> Self {
        self.product = Some(product);
        self
    }

    /// Appends an installment window.
    #[must_use]
    pub fn window(mut self, from_date: Date, due_date: Date, emi: Money) -> Self {
        self.windows
            .push(RepaymentWindow::new(from_date, due_date, emi));
        self
    }

    /// Appends several installment windows.
    #[must_use]
    pub fn windows(mut self, windows: impl IntoIterator<Item = RepaymentWindow>) -> Self {
        self.windows.extend(windows);
        self
    }

    /// Adds a rate entry.
    #[must_use]
    pub fn rate_entry(mut self, entry: RateEntry) -> Self {
        self.rate_history.add(entry);
        self
    }

    /// Rounds installments to multiples of `unit`.
    #[must_use]
    pub fn installment_rounding_unit(mut self, unit: u32) -> Self {
        self.installment_rounding_unit = Some(unit);
        self
    }

    /// Builds the `ScheduleModel`.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or a window is invalid.
    pub fn build(self) -> ScheduleResult<ScheduleModel> {
        let product = self
            .product
            .ok_or_else(|| ScheduleError::missing_field("product"))?;
        ScheduleModel::new(
            &self.windows,
            product,
            self.rate_history,
            self.installment_rounding_unit,
        )
    }
}
