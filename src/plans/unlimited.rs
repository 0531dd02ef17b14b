//! Unlimited Passes

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

/// Weeks in a year, used to estimate visits from an advertised cadence.
const WEEKS_PER_YEAR: u32 = 52;

/// A flat-fee pass granting unlimited visits within a validity period.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlimitedOption<'a> {
    /// Unique option code (e.g. `12U2`)
    pub code: String,

    /// Human readable description
    pub description: String,

    /// Months the pass is valid for
    pub validity_months: u32,

    /// Advertised visit cadence in weeks, if any
    pub visit_frequency_weeks: Option<u32>,

    /// Price of the pass for services without an override
    pub flat_price: Money<'a, Currency>,

    /// Per-service price overrides, keyed by service name
    pub service_prices: FxHashMap<String, Money<'a, Currency>>,
}

impl<'a> UnlimitedOption<'a> {
    /// Create a new unlimited option with a single catalog-wide price.
    pub fn new(
        code: impl Into<String>,
        validity_months: u32,
        flat_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            code: code.into(),
            description: format!("{validity_months} Months Unlimited"),
            validity_months,
            visit_frequency_weeks: None,
            flat_price,
            service_prices: FxHashMap::default(),
        }
    }

    /// Replace the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the advertised visit cadence.
    #[must_use]
    pub fn with_visit_frequency(mut self, weeks: u32) -> Self {
        self.visit_frequency_weeks = Some(weeks);
        self
    }

    /// Override the pass price for one service.
    #[must_use]
    pub fn with_service_price(
        mut self,
        service: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        self.service_prices.insert(service.into(), price);
        self
    }

    /// Price of one pass for the named service.
    pub fn price_for(&self, service: &str) -> Money<'a, Currency> {
        self.service_prices
            .get(service)
            .copied()
            .unwrap_or(self.flat_price)
    }

    /// Number of validity periods needed to cover a horizon (one period when no horizon is given).
    pub fn periods_for(&self, horizon_months: Option<u32>) -> u32 {
        match horizon_months {
            Some(months) if self.validity_months > 0 => months.div_ceil(self.validity_months),
            _ => 1,
        }
    }

    /// Whole visits per validity period at the advertised cadence.
    pub fn estimated_visits(&self) -> Option<u32> {
        let weeks = self.visit_frequency_weeks.filter(|weeks| *weeks > 0)?;

        let total_weeks = self.validity_months.checked_mul(WEEKS_PER_YEAR)?;

        Some(total_weeks / weeks.checked_mul(12)?)
    }
}
