//! Cart Optimizer
//!
//! Prices every selected service independently and aggregates the result.
//! Selections are validated up front: one bad selection fails the whole
//! request and no partial recommendation is produced.

use rustc_hash::FxHashSet;
use rusty_money::MoneyError;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::Catalog,
    evaluator::{PlanError, Usage, UsageError},
    optimizer::optimize_service,
    plans::PlanKind,
    pricing::{PricingError, price_times, total_price},
    recommendation::{PricingRecommendation, RecommendationLine},
    services::{ServiceDefinition, ServiceKey},
};

/// Errors that abort a quote.
#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    /// A selection names a service that is not in the catalog.
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// A selection has unusable usage values.
    #[error(transparent)]
    InvalidUsage(#[from] UsageError),

    /// No services were selected.
    #[error("no services selected")]
    EmptySelection,

    /// The same service was selected more than once.
    #[error("service selected more than once: {0}")]
    DuplicateSelection(String),

    /// A service references a plan the catalog does not define.
    #[error("catalog integrity error: {service} references undefined {kind} plan {code}")]
    CatalogIntegrity {
        /// Referencing service
        service: String,
        /// Plan family
        kind: PlanKind,
        /// Missing code
        code: String,
    },

    /// No plan, not even standard pricing, could be evaluated for a service.
    #[error("no plan could be evaluated for {0}")]
    NoCandidates(String),

    /// Wrapped plan evaluation error.
    #[error(transparent)]
    Plan(PlanError),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<PlanError> for QuoteError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::InvalidUsage(usage) => QuoteError::InvalidUsage(usage),
            other => QuoteError::Plan(other),
        }
    }
}

impl From<MoneyError> for QuoteError {
    fn from(err: MoneyError) -> Self {
        QuoteError::Pricing(PricingError::Money(err))
    }
}

/// One service a customer wants quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Catalog service name
    pub service_name: String,

    /// Expected usage
    pub usage: Usage,
}

impl Selection {
    /// Select a service for the given number of visits.
    pub fn new(service_name: impl Into<String>, visits: u32) -> Self {
        Self {
            service_name: service_name.into(),
            usage: Usage::visits(visits),
        }
    }

    /// Select a service for a single visit.
    pub fn single(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            usage: Usage::default(),
        }
    }

    /// Spread the visits over a number of months.
    #[must_use]
    pub fn over_months(mut self, months: u32) -> Self {
        self.usage = self.usage.over_months(months);
        self
    }
}

/// Recommend the cheapest plan for every selected service.
///
/// # Errors
///
/// - [`QuoteError::EmptySelection`]: no selections were given.
/// - [`QuoteError::InvalidUsage`]: a selection has zero visits or an empty horizon.
/// - [`QuoteError::DuplicateSelection`]: a service was selected twice.
/// - [`QuoteError::UnknownService`]: a selection is not in the catalog.
/// - [`QuoteError::CatalogIntegrity`]: a service references an undefined plan.
/// - [`QuoteError::Pricing`]: price arithmetic failed.
pub fn recommend<'a>(
    catalog: &'a Catalog<'a>,
    selections: &[Selection],
) -> Result<PricingRecommendation<'a>, QuoteError> {
    let resolved = resolve(catalog, selections)?;

    let mut lines = Vec::with_capacity(resolved.len());

    for (key, service, usage) in resolved {
        let choice = optimize_service(catalog, service, usage)?;
        let standard_cost = price_times(service.standard_price, usage.visits)?;

        lines.push(RecommendationLine::new(
            key,
            service,
            usage,
            choice,
            standard_cost,
        ));
    }

    let currency = catalog.currency();

    let subtotal = total_price(lines.iter().map(|line| line.chosen().total), currency)?;
    let standard_total = total_price(lines.iter().map(RecommendationLine::standard_cost), currency)?;

    info!(
        services = lines.len(),
        %subtotal,
        %standard_total,
        "priced recommendation"
    );

    Ok(PricingRecommendation::new(
        lines,
        subtotal,
        standard_total,
        currency,
    ))
}

type Resolved<'a> = (ServiceKey, &'a ServiceDefinition<'a>, Usage);

/// Validate every selection before any pricing happens.
fn resolve<'a>(
    catalog: &'a Catalog<'a>,
    selections: &[Selection],
) -> Result<SmallVec<[Resolved<'a>; 8]>, QuoteError> {
    if selections.is_empty() {
        return Err(QuoteError::EmptySelection);
    }

    let mut seen = FxHashSet::default();
    let mut resolved = SmallVec::new();

    for selection in selections {
        selection.usage.validate()?;

        if !seen.insert(selection.service_name.as_str()) {
            return Err(QuoteError::DuplicateSelection(
                selection.service_name.clone(),
            ));
        }

        let unknown = || QuoteError::UnknownService(selection.service_name.clone());

        let key = catalog
            .service_key(&selection.service_name)
            .ok_or_else(unknown)?;
        let service = catalog.service_by_key(key).ok_or_else(unknown)?;

        resolved.push((key, service, selection.usage));
    }

    Ok(resolved)
}
