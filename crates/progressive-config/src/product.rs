//! Loan product configuration.
//!
//! A [`ProductConfig`] is the serializable form of the terms a schedule is
//! computed against. It converts into the engine's
//! [`ProductDetail`](progressive_schedule::ProductDetail).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use progressive_core::conventions::{DaysInMonth, DaysInYear, PeriodFrequency};
use progressive_core::types::{Currency, Date, RoundingMode, RoundingPolicy, DEFAULT_RATE_SCALE};
use progressive_schedule::{ProductDetail, ScheduleModel, ScheduleResult};

use crate::error::{Validate, ValidationError};

/// Largest scale a `rust_decimal::Decimal` can carry.
const MAX_RATE_SCALE: u32 = 28;

// =============================================================================
// PRODUCT CONFIGURATION
// =============================================================================

/// Configuration of a progressive loan product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Product name/identifier.
    pub name: String,

    /// Description of this product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Loan currency.
    #[serde(default)]
    pub currency: Currency,

    /// Nominal annual interest rate in percent.
    #[serde(default)]
    pub annual_interest_rate: Decimal,

    /// Unit the repayment period is measured in.
    #[serde(default)]
    pub frequency: PeriodFrequency,

    /// Frequency units per repayment period.
    #[serde(default = "default_repay_every")]
    pub repay_every: u32,

    /// Year basis for rate factors.
    #[serde(default)]
    pub days_in_year: DaysInYear,

    /// Month basis for rate factors.
    #[serde(default)]
    pub days_in_month: DaysInMonth,

    /// Decimal places kept on rate factors.
    #[serde(default = "default_rate_scale")]
    pub rate_scale: u32,

    /// Rounding mode for rate factors and amounts.
    #[serde(default)]
    pub rounding_mode: RoundingMode,

    /// Installments are rounded to multiples of this many currency units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_multiples_of: Option<u32>,

    /// Whether this configuration is read-only.
    #[serde(default)]
    pub read_only: bool,

    /// Timestamp when configuration was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Timestamp when configuration was last updated.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    /// Free-form metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

fn default_repay_every() -> u32 {
    1
}

fn default_rate_scale() -> u32 {
    DEFAULT_RATE_SCALE
}

impl ProductConfig {
    /// Creates a monthly actual/actual product at a zero rate.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: None,
            currency: Currency::default(),
            annual_interest_rate: Decimal::ZERO,
            frequency: PeriodFrequency::Months,
            repay_every: default_repay_every(),
            days_in_year: DaysInYear::Actual,
            days_in_month: DaysInMonth::Actual,
            rate_scale: default_rate_scale(),
            rounding_mode: RoundingMode::default(),
            installment_multiples_of: None,
            read_only: false,
            created_at: now,
            updated_at: now,
            metadata: HashMap::new(),
        }
    }

    /// Monthly installments on a 360-day year of 30-day months.
    pub fn monthly_360_30() -> Self {
        Self {
            description: Some("Monthly installments, 360/30 day basis".to_string()),
            days_in_year: DaysInYear::Days360,
            days_in_month: DaysInMonth::Days30,
            read_only: true,
            ..Self::new("MONTHLY.360.30")
        }
    }

    /// Monthly installments on actual calendar days.
    pub fn monthly_actual() -> Self {
        Self {
            description: Some("Monthly installments, actual/actual day basis".to_string()),
            read_only: true,
            ..Self::new("MONTHLY.ACTUAL")
        }
    }

    /// Weekly installments on a 365-day year.
    pub fn weekly_365() -> Self {
        Self {
            description: Some("Weekly installments, 365-day year".to_string()),
            frequency: PeriodFrequency::Weeks,
            days_in_year: DaysInYear::Days365,
            read_only: true,
            ..Self::new("WEEKLY.365")
        }
    }

    /// Daily installments on a 365-day year.
    pub fn daily_365() -> Self {
        Self {
            description: Some("Daily installments, 365-day year".to_string()),
            frequency: PeriodFrequency::Days,
            days_in_year: DaysInYear::Days365,
            read_only: true,
            ..Self::new("DAILY.365")
        }
    }

    /// Builder method to set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.read_only = false;
        self.updated_at = Utc::now();
        self
    }

    /// Builder method to set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self.updated_at = Utc::now();
        self
    }

    /// Builder method to set the nominal annual rate (percent).
    pub fn with_annual_interest_rate(mut self, rate: Decimal) -> Self {
        self.annual_interest_rate = rate;
        self.updated_at = Utc::now();
        self
    }

    /// Builder method to set the repayment frequency.
    pub fn with_frequency(mut self, frequency: PeriodFrequency, repay_every: u32) -> Self {
        self.frequency = frequency;
        self.repay_every = repay_every;
        self.updated_at = Utc::now();
        self
    }

    /// Builder method to set the year basis.
    pub fn with_days_in_year(mut self, days_in_year: DaysInYear) -> Self {
        self.days_in_year = days_in_year;
        self.updated_at = Utc::now();
        self
    }

    /// Builder method to set the month basis.
    pub fn with_days_in_month(mut self, days_in_month: DaysInMonth) -> Self {
        self.days_in_month = days_in_month;
        self.updated_at = Utc::now();
        self
    }

    /// Builder method to set rate scale and rounding mode.
    pub fn with_rounding(mut self, rate_scale: u32, mode: RoundingMode) -> Self {
        self.rate_scale = rate_scale;
        self.rounding_mode = mode;
        self.updated_at = Utc::now();
        self
    }

    /// Builder method to round installments to multiples of `unit`.
    pub fn with_installment_multiples_of(mut self, unit: u32) -> Self {
        self.installment_multiples_of = Some(unit);
        self.updated_at = Utc::now();
        self
    }

    /// Adds metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Rounding policy for the engine.
    pub fn rounding_policy(&self) -> RoundingPolicy {
        RoundingPolicy::new(self.rate_scale, self.rounding_mode)
    }

    /// Converts into the engine's product terms.
    pub fn to_product_detail(&self) -> ProductDetail {
        ProductDetail::new(self.currency, self.annual_interest_rate)
            .with_frequency(self.frequency, self.repay_every)
            .with_days_in_year(self.days_in_year)
            .with_days_in_month(self.days_in_month)
            .with_rounding(self.rounding_policy())
    }

    /// Builds an empty schedule of `installments` periods starting on `start`.
    pub fn schedule_model(
        &self,
        start: Date,
        installments: usize,
    ) -> ScheduleResult<ScheduleModel> {
        let product = self.to_product_detail();
        let windows = product.repayment_windows(start, installments);
        ScheduleModel::from_dates(&windows, product, self.installment_multiples_of)
    }
}

impl Validate for ProductConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        if self.annual_interest_rate < Decimal::ZERO {
            errors.push(ValidationError::with_rule(
                "annual_interest_rate",
                format!(
                    "Annual interest rate {} cannot be negative",
                    self.annual_interest_rate
                ),
                "non_negative_rate",
            ));
        }

        if self.repay_every == 0 {
            errors.push(ValidationError::with_rule(
                "repay_every",
                "Repayment period must span at least one unit",
                "positive_repay_every",
            ));
        }

        if self.rate_scale > MAX_RATE_SCALE {
            errors.push(ValidationError::with_rule(
                "rate_scale",
                format!("Rate scale {} exceeds maximum of {MAX_RATE_SCALE}", self.rate_scale),
                "max_rate_scale",
            ));
        }

        if self.installment_multiples_of == Some(0) {
            errors.push(ValidationError::with_rule(
                "installment_multiples_of",
                "Installment rounding unit must be positive",
                "positive_unit",
            ));
        }

        errors
    }
}
