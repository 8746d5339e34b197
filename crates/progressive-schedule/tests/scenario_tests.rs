//! End-to-end schedule scenarios.
//!
//! Six monthly installments from 2024-01-01 on a 360/30 basis with 100 USD
//! disbursed on the first day, at 9.4822% and at 7%.

use progressive_core::conventions::{DaysInMonth, DaysInYear};
use progressive_core::types::{Currency, Date, Money};
use progressive_schedule::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// TEST FIXTURES
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn usd(amount: Decimal) -> Money {
    Money::of(Currency::USD, amount)
}

fn product_360_30(rate: Decimal) -> ProductDetail {
    ProductDetail::new(Currency::USD, rate)
        .with_days_in_year(DaysInYear::Days360)
        .with_days_in_month(DaysInMonth::Days30)
}

fn six_monthly_periods() -> Vec<(Date, Date)> {
    (1..=6)
        .map(|m| (date(2024, m, 1), date(2024, m + 1, 1)))
        .collect()
}

fn disbursed_schedule(rate: Decimal) -> ScheduleModel {
    let calculator = ProgressiveEmiCalculator::new();
    let mut model = calculator
        .generate_model(&six_monthly_periods(), product_360_30(rate), None)
        .unwrap();
    let applied = calculator
        .add_disbursement(&mut model, date(2024, 1, 1), usd(dec!(100)))
        .unwrap();
    assert!(applied);
    model
}

// =============================================================================
// AMORTIZATION
// =============================================================================

#[test]
fn test_six_month_schedule() {
    let model = disbursed_schedule(dec!(9.4822));
    let periods = model.repayment_periods();

    let interest = [
        dec!(0.79),
        dec!(0.66),
        dec!(0.53),
        dec!(0.40),
        dec!(0.27),
        dec!(0.13),
    ];
    let principal = [
        dec!(16.34),
        dec!(16.47),
        dec!(16.60),
        dec!(16.73),
        dec!(16.86),
        dec!(17.00),
    ];
    let balance = [
        dec!(83.66),
        dec!(67.19),
        dec!(50.59),
        dec!(33.86),
        dec!(17.00),
        dec!(0),
    ];

    for (i, period) in periods.iter().enumerate() {
        assert_eq!(period.emi(), usd(dec!(17.13)), "installment {}", i + 1);
        assert_eq!(period.due_interest(), usd(interest[i]), "installment {}", i + 1);
        assert_eq!(period.due_principal(), usd(principal[i]), "installment {}", i + 1);
        assert_eq!(
            period.outstanding_balance(),
            usd(balance[i]),
            "installment {}",
            i + 1
        );
    }
}

#[test]
fn test_first_day_disbursement_leaves_empty_leading_interest_period() {
    let model = disbursed_schedule(dec!(9.4822));
    let first = &model.repayment_periods()[0];

    assert_eq!(first.interest_periods().len(), 2);
    let leading = &first.interest_periods()[0];
    assert_eq!(leading.from_date(), date(2024, 1, 1));
    assert_eq!(leading.due_date(), date(2024, 1, 1));
    assert_eq!(leading.rate_factor(), Decimal::ZERO);
    assert_eq!(leading.disbursement_amount(), usd(dec!(100)));
    assert_eq!(first.initial_balance(), usd(dec!(0)));
}

#[test]
fn test_seven_percent_schedule() {
    let model = disbursed_schedule(dec!(7));
    let first = &model.repayment_periods()[0];

    assert_eq!(first.emi(), usd(dec!(17.01)));
    assert_eq!(first.due_interest(), usd(dec!(0.58)));
    assert_eq!(first.due_principal(), usd(dec!(16.43)));
    assert_eq!(first.outstanding_balance(), usd(dec!(83.57)));
    assert_eq!(model.loan_term_in_days(), 182);
    assert_eq!(model.maturity_date(), Some(date(2024, 7, 1)));
}

#[test]
fn test_second_tranche_on_due_date_reamortizes_from_next_installment() {
    let calculator = ProgressiveEmiCalculator::new();
    let mut model = disbursed_schedule(dec!(9.4822));
    let applied = calculator
        .add_disbursement(&mut model, date(2024, 2, 1), usd(dec!(100)))
        .unwrap();
    assert!(applied);

    let periods = model.repayment_periods();
    let first = &periods[0];
    assert_eq!(first.emi(), usd(dec!(17.13)));
    assert_eq!(first.due_interest(), usd(dec!(0.79)));
    assert_eq!(first.due_principal(), usd(dec!(16.34)));
    let tranche = first.interest_periods().last().map(InterestPeriod::disbursement_amount);
    assert_eq!(tranche, Some(usd(dec!(100))));
    assert_eq!(first.outstanding_balance(), usd(dec!(183.66)));

    let interest = [dec!(1.45), dec!(1.17), dec!(0.88), dec!(0.59), dec!(0.29)];
    for (i, period) in periods[1..].iter().enumerate() {
        assert_eq!(period.due_interest(), usd(interest[i]), "installment {}", i + 2);
    }
    for period in &periods[1..5] {
        assert_eq!(period.emi(), usd(dec!(37.61)));
    }
    assert_eq!(periods[5].emi(), usd(dec!(37.60)));
    assert!(periods[5].outstanding_balance().is_zero());
}

#[test]
fn test_actual_year_basis_splits_interest_at_year_end() {
    let calculator = ProgressiveEmiCalculator::new();
    let product = ProductDetail::new(Currency::USD, dec!(12));
    let mut model = calculator
        .generate_model(&[(date(2023, 12, 15), date(2024, 1, 15))], product, None)
        .unwrap();
    calculator
        .add_disbursement(&mut model, date(2023, 12, 15), usd(dec!(1000)))
        .unwrap();

    let period = &model.repayment_periods()[0];
    let accruing = &period.interest_periods()[1];
    // 0.12 * (16 / 365 + 15 / 366)
    assert_eq!(accruing.rate_factor(), dec!(0.010178306759));
    assert_eq!(period.calculated_due_interest(), usd(dec!(10.18)));
    assert_eq!(period.emi(), usd(dec!(1010.18)));
}

#[test]
fn test_two_installment_disbursement_on_day_ten() {
    let product = product_360_30(dec!(12));
    let day0 = date(2024, 1, 1);
    let day30 = day0 + 30;
    let day60 = day0 + 60;
    let mut model = ScheduleModel::builder()
        .product(product)
        .window(day0, day30, usd(dec!(500)))
        .window(day30, day60, usd(dec!(500)))
        .build()
        .unwrap();

    let due = model
        .apply_balance_change(day0 + 10, Some(usd(dec!(1000))), None)
        .unwrap()
        .map(RepaymentPeriod::due_date);
    assert_eq!(due, Some(day30));

    let period = &model.repayment_periods()[0];
    let spans: Vec<_> = period
        .interest_periods()
        .iter()
        .map(|ip| (ip.from_date(), ip.due_date()))
        .collect();
    assert_eq!(spans, vec![(day0, day0 + 10), (day0 + 10, day30)]);
    assert_eq!(period.calculated_due_interest(), usd(dec!(6.67)));
    assert_eq!(model.loan_term_in_days(), 60);
}

// =============================================================================
// PAYMENTS
// =============================================================================

#[test]
fn test_early_principal_payment_splits_period() {
    let calculator = ProgressiveEmiCalculator::new();
    let mut model = disbursed_schedule(dec!(7));

    let applied = calculator
        .pay_principal(
            &mut model,
            date(2024, 3, 1),
            date(2024, 2, 15),
            usd(dec!(16.77)),
        )
        .unwrap();
    assert!(applied);

    let period = &model.repayment_periods()[1];
    let ips = period.interest_periods();
    assert_eq!(ips.len(), 2);

    assert_eq!(ips[0].from_date(), date(2024, 2, 1));
    assert_eq!(ips[0].due_date(), date(2024, 2, 15));
    assert_eq!(ips[0].rate_factor(), dec!(0.002816091954));
    assert_eq!(ips[0].calculated_due_interest(), usd(dec!(0.24)));

    assert_eq!(ips[1].from_date(), date(2024, 2, 15));
    assert_eq!(ips[1].due_date(), date(2024, 3, 1));
    assert_eq!(ips[1].rate_factor(), dec!(0.003017241379));
    assert_eq!(ips[1].outstanding_balance(), usd(dec!(66.80)));
    assert_eq!(ips[1].calculated_due_interest(), usd(dec!(0.20)));

    assert_eq!(period.emi(), usd(dec!(17.01)));
    assert_eq!(period.due_interest(), usd(dec!(0.24)));
    assert_eq!(period.due_principal(), usd(dec!(16.77)));
    assert_eq!(period.unrecognized_interest(), usd(dec!(0.20)));
    assert_eq!(period.outstanding_balance(), usd(dec!(66.80)));
}

#[test]
fn test_payments_settle_installment() {
    let calculator = ProgressiveEmiCalculator::new();
    let mut model = disbursed_schedule(dec!(7));
    let due = date(2024, 2, 1);

    calculator
        .pay_interest(&mut model, due, usd(dec!(0.58)))
        .unwrap();
    assert!(!model.repayment_periods()[0].is_fully_paid());
    calculator
        .pay_principal(&mut model, due, due, usd(dec!(16.43)))
        .unwrap();

    let first = &model.repayment_periods()[0];
    assert!(first.is_fully_paid());
    assert_eq!(first.outstanding_balance(), usd(dec!(83.57)));
    assert_eq!(first.due_interest(), usd(dec!(0.58)));
    // the next installment sees the same opening balance
    assert_eq!(
        model.repayment_periods()[1].initial_balance(),
        usd(dec!(83.57))
    );
}

#[test]
fn test_unknown_due_date_is_ignored() {
    let calculator = ProgressiveEmiCalculator::new();
    let mut model = disbursed_schedule(dec!(7));
    let before = model.deep_copy();

    let applied = calculator
        .pay_principal(&mut model, date(2024, 2, 2), date(2024, 2, 2), usd(dec!(5)))
        .unwrap();
    assert!(!applied);
    assert_eq!(model, before);
}

// =============================================================================
// PAYABLE DETAILS
// =============================================================================

#[test]
fn test_payable_details_on_disbursement_day() {
    let calculator = ProgressiveEmiCalculator::new();
    let model = disbursed_schedule(dec!(7));

    let details = calculator
        .payable_details(&model, date(2024, 2, 1), date(2024, 1, 1))
        .unwrap();
    assert_eq!(details.outstanding_balance, usd(dec!(100)));
    assert_eq!(details.payable_principal, usd(dec!(17.01)));
    assert_eq!(details.payable_interest, usd(dec!(0)));
}

#[test]
fn test_payable_details_on_due_date() {
    let calculator = ProgressiveEmiCalculator::new();
    let model = disbursed_schedule(dec!(7));

    let details = calculator
        .payable_details(&model, date(2024, 3, 1), date(2024, 3, 1))
        .unwrap();
    assert_eq!(details.outstanding_balance, usd(dec!(83.57)));
    assert_eq!(details.payable_principal, usd(dec!(16.52)));
    assert_eq!(details.payable_interest, usd(dec!(0.49)));
    assert_eq!(details.total(), usd(dec!(17.01)));
}

#[test]
fn test_payable_details_mid_period_leaves_model_untouched() {
    let calculator = ProgressiveEmiCalculator::new();
    let model = disbursed_schedule(dec!(7));
    let before = model.deep_copy();

    let details = calculator
        .payable_details(&model, date(2024, 3, 1), date(2024, 2, 15))
        .unwrap();
    assert_eq!(details.outstanding_balance, usd(dec!(83.57)));
    assert_eq!(details.payable_principal, usd(dec!(16.77)));
    assert_eq!(details.payable_interest, usd(dec!(0.24)));

    assert_eq!(model, before);
    assert_eq!(model.repayment_periods()[1].interest_periods().len(), 1);
}

#[test]
fn test_payable_details_unknown_installment() {
    let calculator = ProgressiveEmiCalculator::new();
    let model = disbursed_schedule(dec!(7));
    assert!(calculator
        .payable_details(&model, date(2024, 2, 10), date(2024, 2, 10))
        .is_none());
}

// =============================================================================
// CORRECTIONS AND RATE CHANGES
// =============================================================================

#[test]
fn test_zero_correction_splits_last_period() {
    let calculator = ProgressiveEmiCalculator::new();
    let mut model = disbursed_schedule(dec!(7));
    let emi_before: Vec<_> = model.repayment_periods().iter().map(|p| p.emi()).collect();

    let applied = calculator
        .add_balance_correction(&mut model, date(2024, 6, 10), usd(dec!(0)))
        .unwrap();
    assert!(applied);

    let last = model.repayment_periods().last().unwrap();
    assert_eq!(last.interest_periods().len(), 2);
    assert_eq!(last.interest_periods()[0].due_date(), date(2024, 6, 10));
    let emi_after: Vec<_> = model.repayment_periods().iter().map(|p| p.emi()).collect();
    assert_eq!(emi_before, emi_after);
}

#[test]
fn test_mid_period_rate_change() {
    let calculator = ProgressiveEmiCalculator::new();
    let mut model = disbursed_schedule(dec!(7));

    let applied = calculator
        .change_interest_rate(&mut model, date(2024, 2, 15), dec!(4))
        .unwrap();
    assert!(applied);

    let periods = model.repayment_periods();
    assert_eq!(periods[0].emi(), usd(dec!(17.01)));

    let ips = periods[1].interest_periods();
    assert_eq!(ips.len(), 2);
    assert_eq!(ips[0].rate_factor(), dec!(0.002816091954));
    assert_eq!(ips[1].rate_factor(), dec!(0.001724137931));
    assert!(periods[1].emi() < usd(dec!(17.01)));
    assert!(periods.last().unwrap().outstanding_balance().is_zero());

    assert_eq!(model.interest_rate(date(2024, 2, 14)), dec!(7));
    assert_eq!(model.interest_rate(date(2024, 2, 15)), dec!(4));
}

#[test]
fn test_what_if_on_deep_copy() {
    let calculator = ProgressiveEmiCalculator::new();
    let model = disbursed_schedule(dec!(7));

    let mut what_if = model.deep_copy();
    calculator
        .add_disbursement(&mut what_if, date(2024, 3, 10), usd(dec!(50)))
        .unwrap();

    assert_eq!(model.repayment_periods()[3].emi(), usd(dec!(17.01)));
    assert!(what_if.repayment_periods()[3].emi() > usd(dec!(17.01)));
    assert_eq!(model.repayment_periods()[2].interest_periods().len(), 1);
    assert_eq!(what_if.repayment_periods()[2].interest_periods().len(), 2);
}
