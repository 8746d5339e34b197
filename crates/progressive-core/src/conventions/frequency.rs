//! Repayment frequency type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DaysInMonth;
use crate::types::Date;

/// Unit in which a loan's repayment period is expressed.
///
/// Combined with a `repay_every` count, e.g. `Months` with `repay_every = 3`
/// for quarterly installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodFrequency {
    /// Periods counted in days.
    Days,
    /// Periods counted in weeks.
    Weeks,
    /// Periods counted in months.
    #[default]
    Months,
}

impl PeriodFrequency {
    /// Returns the number of days one frequency unit contributes to the
    /// rate-factor numerator, evaluated at `date`.
    #[must_use]
    pub fn days_per_unit(&self, date: Date, days_in_month: DaysInMonth) -> u32 {
        match self {
            PeriodFrequency::Days => 1,
            PeriodFrequency::Weeks => 7,
            PeriodFrequency::Months => days_in_month.days_in_month(date),
        }
    }

    /// Returns the due date `repay_every` units after `from`.
    ///
    /// Month arithmetic clamps to the end of the target month.
    #[must_use]
    pub fn advance(&self, from: Date, repay_every: u32) -> Option<Date> {
        match self {
            PeriodFrequency::Days => Some(from.add_days(i64::from(repay_every))),
            PeriodFrequency::Weeks => Some(from.add_days(7 * i64::from(repay_every))),
            PeriodFrequency::Months => {
                let months = i32::try_from(repay_every).ok()?;
                from.add_months(months).ok()
            }
        }
    }
}

impl fmt::Display for PeriodFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodFrequency::Days => "Days",
            PeriodFrequency::Weeks => "Weeks",
            PeriodFrequency::Months => "Months",
        };
        write!(f, "{name}")
    }
}
