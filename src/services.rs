//! Services

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::plans::PlanKind;

new_key_type! {
    /// Service Key
    pub struct ServiceKey;
}

/// Plan codes referenced by a service.
pub type PlanCodes = SmallVec<[String; 4]>;

/// A bookable service with its standard price and plan eligibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition<'a> {
    /// Service name, unique within a catalog
    pub name: String,

    /// Display grouping, no effect on pricing
    pub category: String,

    /// Optional display text
    pub description: Option<String>,

    /// Price of one standalone visit
    pub standard_price: Money<'a, Currency>,

    /// Whether prepaid bundles may be used for this service
    pub prepaid_eligible: bool,

    /// Whether unlimited passes may be used for this service
    pub unlimited_eligible: bool,

    /// Prepaid rule codes, in catalog order
    pub prepaid_rule_codes: PlanCodes,

    /// Unlimited option codes, in catalog order
    pub unlimited_option_codes: PlanCodes,
}

impl<'a> ServiceDefinition<'a> {
    /// Create a service with no eligible plans.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        standard_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: None,
            standard_price,
            prepaid_eligible: false,
            unlimited_eligible: false,
            prepaid_rule_codes: SmallVec::new(),
            unlimited_option_codes: SmallVec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Make the service eligible for the given prepaid rules.
    #[must_use]
    pub fn with_prepaid_rules(mut self, codes: &[&str]) -> Self {
        self.prepaid_eligible = true;
        self.prepaid_rule_codes = codes.iter().map(|code| (*code).to_string()).collect();
        self
    }

    /// Make the service eligible for the given unlimited options.
    #[must_use]
    pub fn with_unlimited_options(mut self, codes: &[&str]) -> Self {
        self.unlimited_eligible = true;
        self.unlimited_option_codes = codes.iter().map(|code| (*code).to_string()).collect();
        self
    }

    /// Whether the service is eligible for a plan family at all.
    pub fn is_eligible_for_kind(&self, kind: PlanKind) -> bool {
        match kind {
            PlanKind::Standard => true,
            PlanKind::Prepaid => self.prepaid_eligible,
            PlanKind::Unlimited => self.unlimited_eligible,
        }
    }

    /// Codes this service accepts for a plan family (empty when not eligible).
    pub fn plan_codes(&self, kind: PlanKind) -> &[String] {
        if !self.is_eligible_for_kind(kind) {
            return &[];
        }

        match kind {
            PlanKind::Standard => &[],
            PlanKind::Prepaid => &self.prepaid_rule_codes,
            PlanKind::Unlimited => &self.unlimited_option_codes,
        }
    }

    /// Whether the service accepts the given plan code for a plan family.
    pub fn accepts(&self, kind: PlanKind, code: &str) -> bool {
        self.plan_codes(kind).iter().any(|accepted| accepted == code)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    fn underarms<'a>() -> ServiceDefinition<'a> {
        ServiceDefinition::new("Underarms", "Body", Money::from_minor(2600, USD))
    }

    #[test]
    fn new_service_is_standard_only() {
        let service = underarms();

        assert!(!service.prepaid_eligible);
        assert!(!service.unlimited_eligible);
        assert!(service.plan_codes(PlanKind::Prepaid).is_empty());
        assert!(service.is_eligible_for_kind(PlanKind::Standard));
    }

    #[test]
    fn with_prepaid_rules_sets_eligibility_and_order() {
        let service = underarms().with_prepaid_rules(&["B9G3", "B6G1"]);

        assert!(service.prepaid_eligible);
        assert_eq!(service.plan_codes(PlanKind::Prepaid), ["B9G3", "B6G1"]);
        assert!(service.accepts(PlanKind::Prepaid, "B6G1"));
        assert!(!service.accepts(PlanKind::Unlimited, "B6G1"));
    }

    #[test]
    fn ineligible_family_hides_its_codes() {
        let mut service = underarms().with_unlimited_options(&["12U2"]);
        service.unlimited_eligible = false;

        assert!(!service.accepts(PlanKind::Unlimited, "12U2"));
    }
}
