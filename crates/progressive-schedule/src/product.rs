//! Loan product terms the schedule engine computes against.

use progressive_core::conventions::{DaysInMonth, DaysInYear, PeriodFrequency};
use progressive_core::types::{Currency, Date, Money, RoundingPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product-level terms shared by every copy of a schedule.
///
/// `default_annual_rate` is a nominal percentage (`12` means 12% a year) and
/// applies whenever the rate history has no entry in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    /// Currency every amount in the schedule is denominated in.
    pub currency: Currency,
    /// Nominal annual interest rate in percent.
    pub default_annual_rate: Decimal,
    /// Unit the repayment period is measured in.
    pub frequency: PeriodFrequency,
    /// Number of frequency units per repayment period.
    pub repay_every: u32,
    /// Year basis.
    pub days_in_year: DaysInYear,
    /// Month basis.
    pub days_in_month: DaysInMonth,
    /// Rounding applied to rate factors and amounts.
    pub rounding: RoundingPolicy,
}

impl ProductDetail {
    /// Creates monthly product terms on an actual/actual basis.
    #[must_use]
    pub fn new(currency: Currency, default_annual_rate: Decimal) -> Self {
        Self {
            currency,
            default_annual_rate,
            frequency: PeriodFrequency::Months,
            repay_every: 1,
            days_in_year: DaysInYear::Actual,
            days_in_month: DaysInMonth::Actual,
            rounding: RoundingPolicy::default(),
        }
    }

    /// Sets the repayment frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: PeriodFrequency, repay_every: u32) -> Self {
        self.frequency = frequency;
        self.repay_every = repay_every;
        self
    }

    /// Sets the year basis.
    #[must_use]
    pub fn with_days_in_year(mut self, days_in_year: DaysInYear) -> Self {
        self.days_in_year = days_in_year;
        self
    }

    /// Sets the month basis.
    #[must_use]
    pub fn with_days_in_month(mut self, days_in_month: DaysInMonth) -> Self {
        self.days_in_month = days_in_month;
        self
    }

    /// Sets the rounding policy.
    #[must_use]
    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    /// Returns a zero amount in the product currency.
    #[must_use]
    pub fn zero(&self) -> Money {
        Money::zero(self.currency)
    }

    /// Rate factor of one whole repayment period at `annual_rate`.
    ///
    /// `annual_rate / 100 * days_per_unit * repay_every / days_in_year`, with
    /// both day bases evaluated on `date`. Left unrounded; callers prorate
    /// first and round the share.
    #[must_use]
    pub fn period_rate_factor(&self, annual_rate: Decimal, date: Date) -> Decimal {
        let days_in_year = self.days_in_year.days_in_year(date);
        if days_in_year == 0 {
            return Decimal::ZERO;
        }
        let days_per_period = Decimal::from(self.frequency.days_per_unit(date, self.days_in_month))
            * Decimal::from(self.repay_every);
        annual_rate / Decimal::ONE_HUNDRED * days_per_period / Decimal::from(days_in_year)
    }

    /// Rate factor of a `from..due` span that crosses a calendar year end on
    /// an actual year basis, or `None` when the day-prorated factor applies.
    ///
    /// Each calendar year the span touches contributes its days over that
    /// year's length; the days up to Dec 31 count toward the earlier year.
    /// Left unrounded.
    #[must_use]
    pub fn year_split_rate_factor(
        &self,
        annual_rate: Decimal,
        from: Date,
        due: Date,
    ) -> Option<Decimal> {
        if self.days_in_year != DaysInYear::Actual || due.year() <= from.year() {
            return None;
        }
        let mut fraction = Decimal::ZERO;
        let mut cursor = from;
        for year in from.year()..=due.year() {
            let year_end = if year == due.year() {
                due
            } else {
                Date::from_ymd(year, 12, 31).ok()?
            };
            let year_length = Date::from_ymd(year, 1, 1).ok()?.days_in_year();
            fraction += Decimal::from(year_end - cursor) / Decimal::from(year_length);
            cursor = year_end;
        }
        Some(annual_rate / Decimal::ONE_HUNDRED * fraction)
    }

    /// Lays out `count` contiguous `(from, due)` windows starting on `start`.
    ///
    /// Each due date is offset from `start` rather than from the previous due
    /// date, so month-end starts do not drift (Jan 31, Feb 29, Mar 31).
    /// Stops early if a date falls outside the calendar range.
    #[must_use]
    pub fn repayment_windows(&self, start: Date, count: usize) -> Vec<(Date, Date)> {
        let mut windows = Vec::with_capacity(count);
        let mut from = start;
        for n in 1..=count {
            let Some(due) = u32::try_from(n)
                .ok()
                .and_then(|n| n.checked_mul(self.repay_every))
                .and_then(|units| self.frequency.advance(start, units))
            else {
                break;
            };
            windows.push((from, due));
            from = due;
        }
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let product = ProductDetail::new(Currency::EUR, dec!(7));
        assert_eq!(product.frequency, PeriodFrequency::Months);
        assert_eq!(product.repay_every, 1);
        assert_eq!(product.zero(), Money::zero(Currency::EUR));
    }

    #[test]
    fn test_monthly_360_30_factor() {
        let product = ProductDetail::new(Currency::USD, dec!(12))
            .with_days_in_year(DaysInYear::Days360)
            .with_days_in_month(DaysInMonth::Days30);
        assert_eq!(product.period_rate_factor(dec!(12), date(2024, 2, 1)), dec!(0.01));
    }

    #[test]
    fn test_monthly_actual_factor_uses_month_of_date() {
        let product = ProductDetail::new(Currency::USD, dec!(12));
        let feb = product.period_rate_factor(dec!(12), date(2024, 2, 1));
        let mar = product.period_rate_factor(dec!(12), date(2024, 3, 1));
        // 0.12 * 29 / 366 vs 0.12 * 31 / 366
        assert_eq!(product.rounding.round_rate(feb), dec!(0.009508196721));
        assert_eq!(product.rounding.round_rate(mar), dec!(0.010163934426));
    }

    #[test]
    fn test_weekly_and_daily_factors() {
        let weekly = ProductDetail::new(Currency::USD, dec!(36.5))
            .with_frequency(PeriodFrequency::Weeks, 2)
            .with_days_in_year(DaysInYear::Days365);
        assert_eq!(weekly.period_rate_factor(dec!(36.5), date(2024, 1, 1)), dec!(0.014));

        let daily = ProductDetail::new(Currency::USD, dec!(36.5))
            .with_frequency(PeriodFrequency::Days, 10)
            .with_days_in_year(DaysInYear::Days365);
        assert_eq!(daily.period_rate_factor(dec!(36.5), date(2024, 1, 1)), dec!(0.01));
    }

    #[test]
    fn test_year_split_factor_across_year_end() {
        let product = ProductDetail::new(Currency::USD, dec!(12));
        let factor = product
            .year_split_rate_factor(dec!(12), date(2023, 12, 15), date(2024, 1, 15))
            .unwrap();
        // 0.12 * (16 / 365 + 15 / 366)
        assert_eq!(product.rounding.round_rate(factor), dec!(0.010178306759));
    }

    #[test]
    fn test_year_split_factor_not_needed() {
        let actual = ProductDetail::new(Currency::USD, dec!(12));
        assert!(actual
            .year_split_rate_factor(dec!(12), date(2024, 1, 15), date(2024, 2, 15))
            .is_none());

        let fixed = actual.with_days_in_year(DaysInYear::Days365);
        assert!(fixed
            .year_split_rate_factor(dec!(12), date(2023, 12, 15), date(2024, 1, 15))
            .is_none());
    }

    #[test]
    fn test_repayment_windows_from_month_end() {
        let product = ProductDetail::new(Currency::USD, dec!(12));
        let windows = product.repayment_windows(date(2024, 1, 31), 3);
        assert_eq!(
            windows,
            vec![
                (date(2024, 1, 31), date(2024, 2, 29)),
                (date(2024, 2, 29), date(2024, 3, 31)),
                (date(2024, 3, 31), date(2024, 4, 30)),
            ]
        );
    }

    #[test]
    fn test_repayment_windows_fortnightly() {
        let product =
            ProductDetail::new(Currency::USD, dec!(12)).with_frequency(PeriodFrequency::Weeks, 2);
        let windows = product.repayment_windows(date(2024, 1, 1), 2);
        assert_eq!(windows[1], (date(2024, 1, 15), date(2024, 1, 29)));
        assert!(product.repayment_windows(date(2024, 1, 1), 0).is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let product = ProductDetail::new(Currency::USD, dec!(9.5));
        let json = serde_json::to_string(&product).unwrap();
        let parsed: ProductDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, product);
    }
}
