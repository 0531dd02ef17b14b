//! Catalog
//!
//! Immutable reference data for quoting: services, prepaid rules and unlimited
//! options sharing one currency. A [`Catalog`] can only be produced by
//! [`CatalogBuilder::build`], which checks every cross reference once so that
//! pricing never has to.

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    plans::{PlanKind, prepaid::PrepaidRule, unlimited::UnlimitedOption},
    services::{ServiceDefinition, ServiceKey},
};

/// Catalog integrity errors, raised while building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two services share a name.
    #[error("duplicate service: {0}")]
    DuplicateService(String),

    /// Two plans of the same family share a code.
    #[error("duplicate {kind} plan code: {code}")]
    DuplicatePlanCode {
        /// Plan family
        kind: PlanKind,
        /// Repeated code
        code: String,
    },

    /// A service references a plan code with no definition.
    #[error("service {service} references undefined {kind} plan {code}")]
    DanglingPlanCode {
        /// Referencing service
        service: String,
        /// Plan family
        kind: PlanKind,
        /// Missing code
        code: String,
    },

    /// A service lists plan codes for a family it is not eligible for.
    #[error("service {service} lists {kind} plans but is not {kind} eligible")]
    EligibilityMismatch {
        /// Offending service
        service: String,
        /// Plan family
        kind: PlanKind,
    },

    /// A prepaid rule does not require any paid visits.
    #[error("prepaid rule {0} must have at least one paid visit")]
    InvalidPrepaidRule(String),

    /// An unlimited option has a zero-length validity period.
    #[error("unlimited option {0} must be valid for at least one month")]
    InvalidValidity(String),

    /// An unlimited option prices a service that is not in the catalog.
    #[error("unlimited option {code} prices unknown service {service}")]
    UnknownServicePrice {
        /// Option code
        code: String,
        /// Unknown service name
        service: String,
    },

    /// A price is below zero.
    #[error("negative price for {0}")]
    NegativePrice(String),

    /// A price is not in the catalog currency.
    #[error("{subject} is priced in {found}, but catalog currency is {expected}")]
    CurrencyMismatch {
        /// What was priced
        subject: String,
        /// Catalog currency code
        expected: &'static str,
        /// Price currency code
        found: &'static str,
    },
}

/// Validated, read-only pricing catalog.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    services: SlotMap<ServiceKey, ServiceDefinition<'a>>,
    service_keys: FxHashMap<String, ServiceKey>,
    prepaid_rules: FxHashMap<String, PrepaidRule>,
    unlimited_options: FxHashMap<String, UnlimitedOption<'a>>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Start building a catalog priced in the given currency.
    pub fn builder(currency: &'static Currency) -> CatalogBuilder<'a> {
        CatalogBuilder::new(currency)
    }

    /// Look up a service by name.
    pub fn service(&self, name: &str) -> Option<&ServiceDefinition<'a>> {
        self.service_key(name).and_then(|key| self.service_by_key(key))
    }

    /// Look up a service key by name.
    pub fn service_key(&self, name: &str) -> Option<ServiceKey> {
        self.service_keys.get(name).copied()
    }

    /// Look up a service by key.
    pub fn service_by_key(&self, key: ServiceKey) -> Option<&ServiceDefinition<'a>> {
        self.services.get(key)
    }

    /// Iterate over services in the order they were added to the builder.
    ///
    /// Catalogs loaded from fixtures add services sorted by name.
    pub fn services(&self) -> impl Iterator<Item = &ServiceDefinition<'a>> {
        self.services.values()
    }

    /// Look up a prepaid rule by code.
    pub fn prepaid_rule(&self, code: &str) -> Option<&PrepaidRule> {
        self.prepaid_rules.get(code)
    }

    /// Look up an unlimited option by code.
    pub fn unlimited_option(&self, code: &str) -> Option<&UnlimitedOption<'a>> {
        self.unlimited_options.get(code)
    }

    /// Currency every price in the catalog is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Collects catalog entries and validates them into a [`Catalog`].
#[derive(Debug)]
pub struct CatalogBuilder<'a> {
    services: Vec<ServiceDefinition<'a>>,
    prepaid_rules: Vec<PrepaidRule>,
    unlimited_options: Vec<UnlimitedOption<'a>>,
    currency: &'static Currency,
}

impl<'a> CatalogBuilder<'a> {
    /// Create an empty builder.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            services: Vec::new(),
            prepaid_rules: Vec::new(),
            unlimited_options: Vec::new(),
            currency,
        }
    }

    /// Add a service.
    #[must_use]
    pub fn service(mut self, service: ServiceDefinition<'a>) -> Self {
        self.services.push(service);
        self
    }

    /// Add a prepaid rule.
    #[must_use]
    pub fn prepaid_rule(mut self, rule: PrepaidRule) -> Self {
        self.prepaid_rules.push(rule);
        self
    }

    /// Add an unlimited option.
    #[must_use]
    pub fn unlimited_option(mut self, option: UnlimitedOption<'a>) -> Self {
        self.unlimited_options.push(option);
        self
    }

    /// Validate all entries and produce the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found: duplicate names or codes,
    /// malformed plans, prices outside the catalog currency, or services
    /// referencing undefined plans.
    pub fn build(self) -> Result<Catalog<'a>, CatalogError> {
        let currency = self.currency;

        let mut prepaid_rules = FxHashMap::default();

        for rule in self.prepaid_rules {
            if rule.paid_visits == 0 {
                return Err(CatalogError::InvalidPrepaidRule(rule.code));
            }

            if prepaid_rules.contains_key(&rule.code) {
                return Err(CatalogError::DuplicatePlanCode {
                    kind: PlanKind::Prepaid,
                    code: rule.code,
                });
            }

            prepaid_rules.insert(rule.code.clone(), rule);
        }

        let service_names: FxHashSet<&str> = self
            .services
            .iter()
            .map(|service| service.name.as_str())
            .collect();

        let mut unlimited_options = FxHashMap::default();

        for option in self.unlimited_options {
            validate_unlimited_option(&option, &service_names, currency)?;

            if unlimited_options.contains_key(&option.code) {
                return Err(CatalogError::DuplicatePlanCode {
                    kind: PlanKind::Unlimited,
                    code: option.code,
                });
            }

            unlimited_options.insert(option.code.clone(), option);
        }

        let mut services = SlotMap::with_key();
        let mut service_keys = FxHashMap::default();

        for service in self.services {
            validate_service(&service, &prepaid_rules, &unlimited_options, currency)?;

            if service_keys.contains_key(&service.name) {
                return Err(CatalogError::DuplicateService(service.name));
            }

            let name = service.name.clone();
            let key = services.insert(service);

            service_keys.insert(name, key);
        }

        Ok(Catalog {
            services,
            service_keys,
            prepaid_rules,
            unlimited_options,
            currency,
        })
    }
}

fn validate_unlimited_option(
    option: &UnlimitedOption<'_>,
    service_names: &FxHashSet<&str>,
    currency: &'static Currency,
) -> Result<(), CatalogError> {
    if option.validity_months == 0 {
        return Err(CatalogError::InvalidValidity(option.code.clone()));
    }

    check_price(&option.code, option.flat_price, currency)?;

    for (service, price) in &option.service_prices {
        if !service_names.contains(service.as_str()) {
            return Err(CatalogError::UnknownServicePrice {
                code: option.code.clone(),
                service: service.clone(),
            });
        }

        check_price(&format!("{} for {service}", option.code), *price, currency)?;
    }

    Ok(())
}

fn validate_service(
    service: &ServiceDefinition<'_>,
    prepaid_rules: &FxHashMap<String, PrepaidRule>,
    unlimited_options: &FxHashMap<String, UnlimitedOption<'_>>,
    currency: &'static Currency,
) -> Result<(), CatalogError> {
    check_price(&service.name, service.standard_price, currency)?;

    let families = [
        (
            PlanKind::Prepaid,
            service.prepaid_eligible,
            &service.prepaid_rule_codes,
        ),
        (
            PlanKind::Unlimited,
            service.unlimited_eligible,
            &service.unlimited_option_codes,
        ),
    ];

    for (kind, eligible, codes) in families {
        if !eligible && !codes.is_empty() {
            return Err(CatalogError::EligibilityMismatch {
                service: service.name.clone(),
                kind,
            });
        }

        for code in codes {
            let defined = match kind {
                PlanKind::Prepaid => prepaid_rules.contains_key(code),
                PlanKind::Unlimited => unlimited_options.contains_key(code),
                PlanKind::Standard => true,
            };

            if !defined {
                return Err(CatalogError::DanglingPlanCode {
                    service: service.name.clone(),
                    kind,
                    code: code.clone(),
                });
            }
        }
    }

    Ok(())
}

fn check_price(
    subject: &str,
    price: Money<'_, Currency>,
    currency: &'static Currency,
) -> Result<(), CatalogError> {
    if price.currency() != currency {
        return Err(CatalogError::CurrencyMismatch {
            subject: subject.to_string(),
            expected: currency.iso_alpha_code,
            found: price.currency().iso_alpha_code,
        });
    }

    if price.to_minor_units() < 0 {
        return Err(CatalogError::NegativePrice(subject.to_string()));
    }

    Ok(())
}
