//! Dated nominal interest rate history.

use progressive_core::types::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A nominal annual rate that applies from `effective_from` onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    /// First date the rate is charged on.
    pub effective_from: Date,
    /// Date the change was recorded.
    pub valid_from: Date,
    /// Nominal annual rate in percent.
    pub annual_rate: Decimal,
}

impl RateEntry {
    /// Creates a rate entry.
    #[must_use]
    pub fn new(effective_from: Date, valid_from: Date, annual_rate: Decimal) -> Self {
        Self {
            effective_from,
            valid_from,
            annual_rate,
        }
    }
}

/// Rate entries ordered by `effective_from`, latest first.
///
/// When two entries share an `effective_from`, the one added last is found
/// first and therefore wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateHistory {
    entries: Vec<RateEntry>,
}

impl RateHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, keeping descending `effective_from` order.
    pub fn add(&mut self, entry: RateEntry) {
        let position = self
            .entries
            .partition_point(|existing| existing.effective_from > entry.effective_from);
        self.entries.insert(position, entry);
    }

    /// Adds an entry, builder style.
    #[must_use]
    pub fn with_entry(mut self, entry: RateEntry) -> Self {
        self.add(entry);
        self
    }

    /// Returns the entry in force on `date`, if any.
    #[must_use]
    pub fn entry_for(&self, date: Date) -> Option<&RateEntry> {
        self.entries.iter().find(|entry| entry.effective_from <= date)
    }

    /// Returns the nominal annual rate in force on `date`, falling back to
    /// `default_rate` when no entry applies.
    #[must_use]
    pub fn interest_rate(&self, date: Date, default_rate: Decimal) -> Decimal {
        self.entry_for(date)
            .map_or(default_rate, |entry| entry.annual_rate)
    }

    /// Returns the entries, latest `effective_from` first.
    #[must_use]
    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no rate has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RateEntry> for RateHistory {
    fn from_iter<I: IntoIterator<Item = RateEntry>>(iter: I) -> Self {
        let mut history = Self::new();
        for entry in iter {
            history.add(entry);
        }
        history
    }
}
