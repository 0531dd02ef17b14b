//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    fixtures::FixtureError,
    plans::{prepaid::PrepaidRule, unlimited::UnlimitedOption},
    services::ServiceDefinition,
};

/// Catalog file
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code every price is expressed in
    pub currency: String,

    /// Map of rule code -> prepaid rule
    #[serde(default)]
    pub prepaid_rules: FxHashMap<String, PrepaidRuleFixture>,

    /// Map of option code -> unlimited option
    #[serde(default)]
    pub unlimited_options: FxHashMap<String, UnlimitedOptionFixture>,

    /// Map of service name -> service
    pub services: FxHashMap<String, ServiceFixture>,
}

/// Prepaid Rule Fixture
#[derive(Debug, Deserialize)]
pub struct PrepaidRuleFixture {
    /// Description, generated from the visit counts when absent
    pub description: Option<String>,

    /// Visits paid for
    pub paid_visits: u32,

    /// Visits granted free
    #[serde(default)]
    pub free_visits: u32,
}

/// Unlimited Option Fixture
#[derive(Debug, Deserialize)]
pub struct UnlimitedOptionFixture {
    /// Description, generated from the validity when absent
    pub description: Option<String>,

    /// Months the pass is valid for
    pub validity_months: u32,

    /// Advertised visit cadence in weeks
    pub visit_frequency_weeks: Option<u32>,

    /// Pass price (e.g. "332.00" or "332.00 USD")
    pub price: String,

    /// Map of service name -> price override
    #[serde(default)]
    pub service_prices: FxHashMap<String, String>,
}

/// Service Fixture
#[derive(Debug, Deserialize)]
pub struct ServiceFixture {
    /// Display category
    #[serde(default = "default_category")]
    pub category: String,

    /// Display text
    pub description: Option<String>,

    /// Standard price per visit (e.g. "26.00")
    pub price: String,

    /// Prepaid eligibility, defaults to having prepaid rules
    pub prepaid_eligible: Option<bool>,

    /// Unlimited eligibility, defaults to having unlimited options
    pub unlimited_eligible: Option<bool>,

    /// Prepaid rule codes
    #[serde(default)]
    pub prepaid_rules: Vec<String>,

    /// Unlimited option codes
    #[serde(default)]
    pub unlimited_options: Vec<String>,
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

impl CatalogFixture {
    /// Parse a catalog fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the document does not match the catalog format.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Convert into a validated catalog.
    ///
    /// Entries are added in key order so the resulting catalog does not
    /// depend on map iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or currency cannot be parsed, or if the
    /// catalog fails integrity validation.
    pub fn try_into_catalog(self) -> Result<Catalog<'static>, FixtureError> {
        let currency = parse_currency(&self.currency)?;
        let mut builder = Catalog::builder(currency);

        for (code, rule) in sorted(self.prepaid_rules) {
            builder = builder.prepaid_rule(rule.into_rule(code));
        }

        for (code, option) in sorted(self.unlimited_options) {
            builder = builder.unlimited_option(option.try_into_option(code, currency)?);
        }

        for (name, service) in sorted(self.services) {
            builder = builder.service(service.try_into_service(name, currency)?);
        }

        Ok(builder.build()?)
    }
}

impl PrepaidRuleFixture {
    fn into_rule(self, code: String) -> PrepaidRule {
        let rule = PrepaidRule::new(code, self.paid_visits, self.free_visits);

        match self.description {
            Some(description) => rule.with_description(description),
            None => rule,
        }
    }
}

impl UnlimitedOptionFixture {
    fn try_into_option(
        self,
        code: String,
        currency: &'static Currency,
    ) -> Result<UnlimitedOption<'static>, FixtureError> {
        let mut option =
            UnlimitedOption::new(code, self.validity_months, parse_price(&self.price, currency)?);

        if let Some(description) = self.description {
            option = option.with_description(description);
        }

        if let Some(weeks) = self.visit_frequency_weeks {
            option = option.with_visit_frequency(weeks);
        }

        for (service, price) in sorted(self.service_prices) {
            option = option.with_service_price(service, parse_price(&price, currency)?);
        }

        Ok(option)
    }
}

impl ServiceFixture {
    fn try_into_service(
        self,
        name: String,
        currency: &'static Currency,
    ) -> Result<ServiceDefinition<'static>, FixtureError> {
        let price = parse_price(&self.price, currency)?;
        let mut service = ServiceDefinition::new(name, self.category, price);

        service.description = self.description;
        service.prepaid_eligible = self
            .prepaid_eligible
            .unwrap_or(!self.prepaid_rules.is_empty());
        service.unlimited_eligible = self
            .unlimited_eligible
            .unwrap_or(!self.unlimited_options.is_empty());
        service.prepaid_rule_codes = self.prepaid_rules.into_iter().collect();
        service.unlimited_option_codes = self.unlimited_options.into_iter().collect();

        Ok(service)
    }
}

/// Map entries in name order, so catalogs build the same way on every load.
fn sorted<V>(map: FxHashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<(String, V)> = map.into_iter().collect();

    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    entries
}

/// Parse an ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for unsupported codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a price string (e.g. "26.00" or "26.00 USD") in the catalog currency.
///
/// Every supported currency has two minor digits.
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT [CURRENCY]`, if
/// the amount cannot be parsed, or if the currency differs from `currency`.
pub fn parse_price(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let (amount, code) = match parts.as_slice() {
        [amount] => (*amount, None),
        [amount, code] => (*amount, Some(*code)),
        _ => {
            return Err(FixtureError::InvalidPrice(format!(
                "Expected format 'AMOUNT [CURRENCY]', got: {s}"
            )));
        }
    };

    if let Some(code) = code {
        let found = parse_currency(code)?;

        if found != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                found.iso_alpha_code.to_string(),
            ));
        }
    }

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}
