//! EMI calculation over a [`ScheduleModel`].
//!
//! The calculator is stateless: every operation takes the model it works on.
//! Balance events go through [`ScheduleModel::apply_balance_change`]; the
//! calculator then re-amortizes (disbursements, rate changes) or only
//! refreshes the principal/interest split (corrections, payments).

use progressive_core::types::{Date, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ScheduleResult;
use crate::model::ScheduleModel;
use crate::product::ProductDetail;
use crate::rate_history::RateEntry;
use crate::repayment_period::RepaymentPeriod;

/// Amounts needed to settle one installment on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableDetails {
    /// Due date of the installment quoted.
    pub due_date: Date,
    /// Date the quote is for.
    pub pay_date: Date,
    /// Principal balance on `pay_date`.
    pub outstanding_balance: Money,
    /// Principal payable on `pay_date`.
    pub payable_principal: Money,
    /// Interest accrued up to `pay_date`.
    pub payable_interest: Money,
}

impl PayableDetails {
    /// Principal plus interest.
    #[must_use]
    pub fn total(&self) -> Money {
        self.payable_principal + self.payable_interest
    }
}

/// Operations that keep a schedule's installments consistent with the loan's
/// balance events.
///
/// Mutating operations return `Ok(false)` when the event date or installment
/// falls outside the schedule; nothing is changed in that case.
pub trait EmiCalculator {
    /// Builds a schedule with zero installments over `(from, due)` windows.
    fn generate_model(
        &self,
        periods: &[(Date, Date)],
        product: ProductDetail,
        installment_rounding_unit: Option<u32>,
    ) -> ScheduleResult<ScheduleModel>;

    /// Disburses `amount` on `date` and re-amortizes the remaining installments.
    fn add_disbursement(
        &self,
        model: &mut ScheduleModel,
        date: Date,
        amount: Money,
    ) -> ScheduleResult<bool>;

    /// Corrects the balance on `date` without changing the installment amount.
    fn add_balance_correction(
        &self,
        model: &mut ScheduleModel,
        date: Date,
        amount: Money,
    ) -> ScheduleResult<bool>;

    /// Changes the nominal annual rate from `effective_date` and re-amortizes.
    fn change_interest_rate(
        &self,
        model: &mut ScheduleModel,
        effective_date: Date,
        annual_rate: Decimal,
    ) -> ScheduleResult<bool>;

    /// Records principal paid on `transaction_date` against the installment
    /// due on `due_date`.
    fn pay_principal(
        &self,
        model: &mut ScheduleModel,
        due_date: Date,
        transaction_date: Date,
        amount: Money,
    ) -> ScheduleResult<bool>;

    /// Records interest paid against the installment due on `due_date`.
    fn pay_interest(
        &self,
        model: &mut ScheduleModel,
        due_date: Date,
        amount: Money,
    ) -> ScheduleResult<bool>;

    /// Quotes what settling the installment due on `due_date` costs on
    /// `pay_date`. The model is not modified.
    fn payable_details(
        &self,
        model: &ScheduleModel,
        due_date: Date,
        pay_date: Date,
    ) -> Option<PayableDetails>;
}

/// Equal-installment calculator with day-prorated interest.
///
/// The installment over periods `1..=n` with rate factors `R_i` (one plus
/// the period's prorated rate) is
///
/// ```text
/// EMI = balance * R_1 * ... * R_n / f_n,   f_1 = 1,   f_i = 1 + f_(i-1) * R_i
/// ```
///
/// rounded to the currency and then to the installment rounding unit. The
/// last installment absorbs whatever rounding leaves over.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressiveEmiCalculator;

impl ProgressiveEmiCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Recomputes the installment of every period due on or after
    /// `from_due_date` (all periods when `None`).
    pub fn calculate_emi_from(&self, model: &mut ScheduleModel, from_due_date: Option<Date>) {
        model.refresh();
        let related = model.related_repayment_periods(from_due_date);
        if related.is_empty() {
            return;
        }
        let start = model.repayment_periods().len() - related.len();
        let emi = equal_installment(model, related);

        for period in &mut model.repayment_periods_mut()[start..] {
            period.set_emi(emi);
        }
        recalculate_components(model);
        debug!(
            from_installment = start,
            emi = %emi,
            "installment amount recalculated"
        );

        adjust_emi(model, start);
    }
}

impl EmiCalculator for ProgressiveEmiCalculator {
    fn generate_model(
        &self,
        periods: &[(Date, Date)],
        product: ProductDetail,
        installment_rounding_unit: Option<u32>,
    ) -> ScheduleResult<ScheduleModel> {
        ScheduleModel::from_dates(periods, product, installment_rounding_unit)
    }

    fn add_disbursement(
        &self,
        model: &mut ScheduleModel,
        date: Date,
        amount: Money,
    ) -> ScheduleResult<bool> {
        let placed = model
            .apply_balance_change(date, Some(amount), None)?
            .map(|period| (period.due_date(), period.is_last_period()));
        let Some((due_date, is_last)) = placed else {
            return Ok(false);
        };
        // money disbursed on a due date is first repaid by the next installment
        let from_due_date = if date == due_date && !is_last {
            model
                .find_period_index(due_date)
                .and_then(|index| model.repayment_periods().get(index + 1))
                .map_or(due_date, RepaymentPeriod::due_date)
        } else {
            due_date
        };
        self.calculate_emi_from(model, Some(from_due_date));
        Ok(true)
    }

    fn add_balance_correction(
        &self,
        model: &mut ScheduleModel,
        date: Date,
        amount: Money,
    ) -> ScheduleResult<bool> {
        if model
            .apply_balance_change(date, None, Some(amount))?
            .is_none()
        {
            return Ok(false);
        }
        recalculate_components(model);
        Ok(true)
    }

    fn change_interest_rate(
        &self,
        model: &mut ScheduleModel,
        effective_date: Date,
        annual_rate: Decimal,
    ) -> ScheduleResult<bool> {
        let Some(index) = model
            .repayment_periods()
            .iter()
            .position(|p| p.from_date() <= effective_date && effective_date < p.due_date())
        else {
            debug!(%effective_date, "rate change outside the schedule ignored");
            return Ok(false);
        };

        model.add_rate_entry(RateEntry::new(effective_date, effective_date, annual_rate));
        let period = &mut model.repayment_periods_mut()[index];
        period.split_interest_period_at(effective_date);
        let due_date = period.due_date();

        self.calculate_emi_from(model, Some(due_date));
        Ok(true)
    }

    fn pay_principal(
        &self,
        model: &mut ScheduleModel,
        due_date: Date,
        transaction_date: Date,
        amount: Money,
    ) -> ScheduleResult<bool> {
        model.ensure_currency(Some(amount))?;
        let Some(index) = model.find_period_index(due_date) else {
            return Ok(false);
        };
        let first = model.repayment_periods().first();
        let (Some(first), Some(maturity)) = (first, model.maturity_date()) else {
            return Ok(false);
        };
        // a payment outside the schedule still reduces the balance, from its nearest end
        let correction_date = transaction_date.clamp(first.from_date(), maturity);

        model.repayment_periods_mut()[index].add_paid_principal(amount);
        model.apply_balance_change(correction_date, None, Some(-amount))?;
        recalculate_components(model);
        Ok(true)
    }

    fn pay_interest(
        &self,
        model: &mut ScheduleModel,
        due_date: Date,
        amount: Money,
    ) -> ScheduleResult<bool> {
        model.ensure_currency(Some(amount))?;
        let Some(index) = model.find_period_index(due_date) else {
            return Ok(false);
        };
        model.repayment_periods_mut()[index].add_paid_interest(amount);
        Ok(true)
    }

    fn payable_details(
        &self,
        model: &ScheduleModel,
        due_date: Date,
        pay_date: Date,
    ) -> Option<PayableDetails> {
        let index = model.find_period_index(due_date)?;
        let mut quote = model.deep_copy();
        quote.repayment_periods_mut()[index].split_interest_period_at(pay_date);
        quote.refresh();

        let period = &quote.repayment_periods()[index];
        let accrued = period
            .interest_periods()
            .iter()
            .filter(|ip| ip.due_date() <= pay_date);
        let (changes, interest) = accrued.fold(
            (quote.zero(), quote.zero()),
            |(changes, interest), ip| {
                (
                    changes + ip.balance_change(),
                    interest + ip.calculated_due_interest(),
                )
            },
        );
        let outstanding = period.initial_balance() + changes;
        let principal = if period.is_last_period() {
            outstanding
        } else {
            (period.emi() - interest).min(outstanding)
        };

        Some(PayableDetails {
            due_date,
            pay_date,
            outstanding_balance: outstanding,
            payable_principal: principal,
            payable_interest: interest,
        })
    }
}

fn equal_installment(model: &ScheduleModel, related: &[RepaymentPeriod]) -> Money {
    let Some(first) = related.first() else {
        return model.zero();
    };
    let rate_factor_n = related
        .iter()
        .fold(Decimal::ONE, |acc, p| acc * p.rate_factor_plus_one());
    let fn_result = related
        .iter()
        .skip(1)
        .fold(Decimal::ONE, |acc, p| Decimal::ONE + acc * p.rate_factor_plus_one());
    if fn_result.is_zero() {
        return model.zero();
    }

    let balance = first.initial_balance() + first.disbursed_amount_in_period();
    let emi = Money::of(model.currency(), rate_factor_n * balance.amount() / fn_result)
        .round(&model.product().rounding);
    in_installment_multiples(model, emi)
}

fn in_installment_multiples(model: &ScheduleModel, emi: Money) -> Money {
    model
        .installment_rounding_unit()
        .map_or(emi, |unit| emi.round_to_multiples_of(unit))
}

/// Refreshes balances and sets the last installment to clear the loan.
fn recalculate_components(model: &mut ScheduleModel) {
    model.refresh();
    if let Some(last) = model.repayment_periods_mut().last_mut() {
        let principal = last.balance_at_due_date() + last.paid_principal();
        let emi = principal + last.calculated_due_interest();
        last.set_emi(emi);
    }
}

fn last_two_difference(model: &ScheduleModel, periods: &[RepaymentPeriod]) -> Money {
    match periods {
        [.., penultimate, last] => last.emi() - penultimate.emi(),
        _ => model.zero(),
    }
}

/// Spreads a large last-installment residue over the related installments.
///
/// Tries `EMI + residue / n` on a copy and keeps it only if the last two
/// installments end up closer together.
fn adjust_emi(model: &mut ScheduleModel, start: usize) {
    let related = &model.repayment_periods()[start..];
    let count = related.len();
    let difference = last_two_difference(model, related);
    let lower_half = count / 2;
    if difference.is_zero() || lower_half == 0 {
        return;
    }
    if difference.abs().amount() * Decimal::ONE_HUNDRED <= Decimal::from(lower_half) {
        return;
    }

    let original = related[count - 2].emi();
    let policy = model.product().rounding;
    let adjustment = Money::of(
        model.currency(),
        difference.amount() / Decimal::from(count),
    )
    .round(&policy);
    let adjusted = in_installment_multiples(model, original + adjustment);
    if adjusted == original {
        return;
    }

    let mut candidate = model.deep_copy();
    for period in &mut candidate.repayment_periods_mut()[start..] {
        period.set_emi(adjusted);
    }
    recalculate_components(&mut candidate);
    let new_difference = last_two_difference(&candidate, &candidate.repayment_periods()[start..]);

    if new_difference.abs() < difference.abs() {
        info!(
            from_installment = start,
            emi = %adjusted,
            residue = %new_difference,
            "installment amount adjusted"
        );
        *model = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progressive_core::conventions::{DaysInMonth, DaysInYear};
    use progressive_core::types::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn usd(amount: Decimal) -> Money {
        Money::of(Currency::USD, amount)
    }

    fn monthly(count: u32) -> Vec<(Date, Date)> {
        (0..count)
            .map(|i| {
                let from = date(2024, 1, 1).add_months(i as i32).unwrap();
                (from, from.add_months(1).unwrap())
            })
            .collect()
    }

    fn product(rate: Decimal) -> ProductDetail {
        ProductDetail::new(Currency::USD, rate)
            .with_days_in_year(DaysInYear::Days360)
            .with_days_in_month(DaysInMonth::Days30)
    }

    fn disbursed_model(rate: Decimal, unit: Option<u32>) -> ScheduleModel {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = calc.generate_model(&monthly(6), product(rate), unit).unwrap();
        assert!(calc
            .add_disbursement(&mut model, date(2024, 1, 1), usd(dec!(100)))
            .unwrap());
        model
    }

    #[test]
    fn test_single_period_emi_is_balance_plus_interest() {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = calc.generate_model(&monthly(1), product(dec!(12)), None).unwrap();
        calc.add_disbursement(&mut model, date(2024, 1, 1), usd(dec!(1000)))
            .unwrap();
        assert_eq!(model.repayment_periods()[0].emi(), usd(dec!(1010)));
    }

    #[test]
    fn test_emi_in_multiples_of_unit() {
        let model = disbursed_model(dec!(9.4822), Some(1));
        let periods = model.repayment_periods();
        assert_eq!(periods[0].emi(), usd(dec!(17)));
        // the last installment clears what is left
        let last = periods.last().unwrap();
        assert!(last.outstanding_balance().is_zero());
    }

    #[test]
    fn test_adjustment_keeps_last_installment_close() {
        let model = disbursed_model(dec!(9.4822), Some(1));
        let periods = model.repayment_periods();
        let difference = periods[5].emi() - periods[4].emi();
        assert!(difference.abs() < usd(dec!(1)));
    }

    #[test]
    fn test_add_disbursement_outside_schedule() {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = calc.generate_model(&monthly(2), product(dec!(12)), None).unwrap();
        let before = model.deep_copy();
        assert!(!calc
            .add_disbursement(&mut model, date(2023, 12, 1), usd(dec!(100)))
            .unwrap());
        assert_eq!(model, before);
    }

    #[test]
    fn test_balance_correction_keeps_emi() {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = disbursed_model(dec!(7), None);
        assert!(calc
            .add_balance_correction(&mut model, date(2024, 2, 15), usd(dec!(-10)))
            .unwrap());

        let periods = model.repayment_periods();
        assert_eq!(periods[1].emi(), usd(dec!(17.01)));
        assert_eq!(periods[1].interest_periods().len(), 2);
        assert_eq!(periods[1].interest_periods()[1].outstanding_balance(), usd(dec!(73.57)));
    }

    #[test]
    fn test_change_interest_rate_outside_schedule() {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = disbursed_model(dec!(7), None);
        assert!(!calc
            .change_interest_rate(&mut model, date(2024, 7, 1), dec!(4))
            .unwrap());
        assert!(model.rate_history().is_empty());
    }

    #[test]
    fn test_change_interest_rate_on_period_start() {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = disbursed_model(dec!(7), None);
        let emi_before = model.repayment_periods()[3].emi();
        assert!(calc
            .change_interest_rate(&mut model, date(2024, 4, 1), dec!(4))
            .unwrap());

        let periods = model.repayment_periods();
        assert_eq!(periods[3].interest_periods().len(), 1);
        assert_eq!(model.interest_rate(date(2024, 4, 1)), dec!(4));
        assert_eq!(model.interest_rate(date(2024, 3, 31)), dec!(7));
        assert!(periods[3].emi() < emi_before);
        // earlier installments are untouched
        assert_eq!(periods[0].emi(), usd(dec!(17.01)));
    }

    #[test]
    fn test_pay_interest() {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = disbursed_model(dec!(7), None);
        assert!(calc
            .pay_interest(&mut model, date(2024, 2, 1), usd(dec!(0.58)))
            .unwrap());
        assert!(!calc
            .pay_interest(&mut model, date(2024, 2, 2), usd(dec!(0.58)))
            .unwrap());
        assert_eq!(model.repayment_periods()[0].paid_interest(), usd(dec!(0.58)));
    }

    #[test]
    fn test_payment_currency_checked() {
        let calc = ProgressiveEmiCalculator::new();
        let mut model = disbursed_model(dec!(7), None);
        let result = calc.pay_principal(
            &mut model,
            date(2024, 2, 1),
            date(2024, 2, 1),
            Money::of(Currency::EUR, dec!(1)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_payable_details_total() {
        let details = PayableDetails {
            due_date: date(2024, 3, 1),
            pay_date: date(2024, 3, 1),
            outstanding_balance: usd(dec!(83.57)),
            payable_principal: usd(dec!(16.52)),
            payable_interest: usd(dec!(0.49)),
        };
        assert_eq!(details.total(), usd(dec!(17.01)));
    }
}
