//! Prepaid Bundles

use rusty_money::{Money, iso::Currency};

use crate::pricing::{PricingError, price_per_unit, price_times};

/// A "buy N, get M free" multi-visit bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepaidRule {
    /// Unique rule code (e.g. `B9G3`)
    pub code: String,

    /// Human readable description
    pub description: String,

    /// Visits the customer pays for
    pub paid_visits: u32,

    /// Visits granted free once the paid visits are purchased
    pub free_visits: u32,
}

impl PrepaidRule {
    /// Create a new prepaid rule with a generated description.
    pub fn new(code: impl Into<String>, paid_visits: u32, free_visits: u32) -> Self {
        Self {
            code: code.into(),
            description: format!("Buy {paid_visits}, Get {free_visits} Free"),
            paid_visits,
            free_visits,
        }
    }

    /// Replace the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Total visits covered by one bundle.
    pub fn bundle_size(&self) -> u32 {
        self.paid_visits.saturating_add(self.free_visits)
    }

    /// Price of one bundle for a service with the given standard price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the price does not fit in minor units.
    pub fn bundle_price<'a>(
        &self,
        standard_price: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        price_times(standard_price, self.paid_visits)
    }

    /// Effective price per visit when every visit in the bundle is used.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the bundle is empty or the price overflows.
    pub fn effective_visit_price<'a>(
        &self,
        standard_price: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        price_per_unit(self.bundle_price(standard_price)?, self.bundle_size())
    }

    /// Whether the bundle grants no free visits and so can never beat standard pricing.
    pub fn is_no_op(&self) -> bool {
        self.free_visits == 0
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_generates_description() {
        let rule = PrepaidRule::new("B9G3", 9, 3);

        assert_eq!(rule.description, "Buy 9, Get 3 Free");
    }

    #[test]
    fn bundle_size_adds_free_visits() {
        assert_eq!(PrepaidRule::new("B9G3", 9, 3).bundle_size(), 12);
        assert_eq!(PrepaidRule::new("B6G1", 6, 1).bundle_size(), 7);
    }

    #[test]
    fn bundle_price_charges_paid_visits_only() -> TestResult {
        let rule = PrepaidRule::new("B9G3", 9, 3);

        assert_eq!(
            rule.bundle_price(Money::from_minor(2600, USD))?,
            Money::from_minor(23_400, USD)
        );

        Ok(())
    }

    #[test]
    fn effective_visit_price_spreads_bundle_over_all_visits() -> TestResult {
        let rule = PrepaidRule::new("B9G3", 9, 3);

        // 234.00 / 12 = 19.50
        assert_eq!(
            rule.effective_visit_price(Money::from_minor(2600, USD))?,
            Money::from_minor(1950, USD)
        );

        Ok(())
    }

    #[test]
    fn zero_free_visits_is_a_no_op() {
        assert!(PrepaidRule::new("B5G0", 5, 0).is_no_op());
        assert!(!PrepaidRule::new("B6G1", 6, 1).is_no_op());
    }
}
