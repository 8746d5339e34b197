//! Year and month day-count bases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Date;

/// Number of days assumed in a year when annualizing a nominal rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DaysInYear {
    /// Actual length of the calendar year (365 or 366).
    #[default]
    Actual,
    /// 360-day year.
    Days360,
    /// 364-day year (52 weeks).
    Days364,
    /// 365-day year regardless of leap years.
    Days365,
}

impl DaysInYear {
    /// Returns the year length applicable on `date`.
    #[must_use]
    pub fn days_in_year(&self, date: Date) -> u32 {
        match self {
            DaysInYear::Actual => date.days_in_year(),
            DaysInYear::Days360 => 360,
            DaysInYear::Days364 => 364,
            DaysInYear::Days365 => 365,
        }
    }
}

impl fmt::Display for DaysInYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DaysInYear::Actual => "ACT",
            DaysInYear::Days360 => "360",
            DaysInYear::Days364 => "364",
            DaysInYear::Days365 => "365",
        };
        write!(f, "{name}")
    }
}

/// Number of days assumed in a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DaysInMonth {
    /// Actual length of the calendar month.
    #[default]
    Actual,
    /// 30-day month.
    Days30,
}

impl DaysInMonth {
    /// Returns the month length applicable on `date`.
    #[must_use]
    pub fn days_in_month(&self, date: Date) -> u32 {
        match self {
            DaysInMonth::Actual => date.days_in_month(),
            DaysInMonth::Days30 => 30,
        }
    }
}

impl fmt::Display for DaysInMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DaysInMonth::Actual => "ACT",
            DaysInMonth::Days30 => "30",
        };
        write!(f, "{name}")
    }
}
