//! Service Optimizer
//!
//! Chooses the cheapest way to pay for one service. Candidates are standard
//! pricing plus every plan the service is eligible for; ties prefer standard
//! pricing, then the smaller upfront payment, then the lexicographically
//! smaller plan code.

use std::cmp::Ordering;

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    cart::QuoteError,
    catalog::Catalog,
    evaluator::{CostEstimate, PlanError, Usage, evaluate},
    plans::{Plan, PlanKind},
    services::ServiceDefinition,
};

/// Candidate plans for a service.
pub type Candidates<'a> = SmallVec<[Plan<'a>; 8]>;

/// The winning plan for a service, with every evaluated alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanChoice<'a> {
    chosen: CostEstimate<'a>,
    ranked: SmallVec<[CostEstimate<'a>; 8]>,
}

impl<'a> PlanChoice<'a> {
    /// Winning estimate.
    pub fn chosen(&self) -> &CostEstimate<'a> {
        &self.chosen
    }

    /// Winning plan.
    pub fn plan(&self) -> Plan<'a> {
        self.chosen.plan
    }

    /// Every evaluated candidate, best first (the winner included).
    pub fn ranked(&self) -> &[CostEstimate<'a>] {
        &self.ranked
    }

    /// Consume the choice, returning the winning estimate.
    pub fn into_chosen(self) -> CostEstimate<'a> {
        self.chosen
    }
}

/// Resolve the plans a service may use, standard pricing first.
///
/// # Errors
///
/// Returns [`QuoteError::CatalogIntegrity`] if the service references a plan
/// code that the catalog does not define.
pub fn candidates<'a>(
    catalog: &'a Catalog<'a>,
    service: &ServiceDefinition<'_>,
) -> Result<Candidates<'a>, QuoteError> {
    let mut plans: Candidates<'a> = SmallVec::new();

    plans.push(Plan::Standard);

    for code in service.plan_codes(PlanKind::Prepaid) {
        let rule = catalog
            .prepaid_rule(code)
            .ok_or_else(|| integrity_error(service, PlanKind::Prepaid, code))?;

        plans.push(Plan::Prepaid(rule));
    }

    for code in service.plan_codes(PlanKind::Unlimited) {
        let option = catalog
            .unlimited_option(code)
            .ok_or_else(|| integrity_error(service, PlanKind::Unlimited, code))?;

        plans.push(Plan::Unlimited(option));
    }

    Ok(plans)
}

/// Find the cheapest plan for a service at the given usage.
///
/// # Errors
///
/// - [`QuoteError::InvalidUsage`]: zero visits or an empty horizon.
/// - [`QuoteError::CatalogIntegrity`]: the service references an undefined plan.
/// - [`QuoteError::Plan`]: price arithmetic failed.
pub fn optimize_service<'a>(
    catalog: &'a Catalog<'a>,
    service: &'a ServiceDefinition<'a>,
    usage: Usage,
) -> Result<PlanChoice<'a>, QuoteError> {
    usage.validate()?;

    let plans = candidates(catalog, service)?;

    choose(service, &plans, usage)
}

/// Evaluate the given plans and pick the winner.
///
/// Plans the service is not eligible for are skipped with a warning.
///
/// # Errors
///
/// - [`QuoteError::NoCandidates`]: nothing could be evaluated.
/// - [`QuoteError::Plan`]: any evaluation error other than ineligibility.
pub fn choose<'a>(
    service: &'a ServiceDefinition<'a>,
    plans: &[Plan<'a>],
    usage: Usage,
) -> Result<PlanChoice<'a>, QuoteError> {
    let mut ranked: SmallVec<[CostEstimate<'a>; 8]> = SmallVec::new();

    for plan in plans {
        match evaluate(service, *plan, usage) {
            Ok(estimate) => ranked.push(estimate),
            Err(err @ PlanError::IneligiblePlan { .. }) => {
                warn!(service = %service.name, plan = %plan, %err, "skipping ineligible plan");
            }
            Err(err) => return Err(err.into()),
        }
    }

    ranked.sort_by(compare_estimates);

    let chosen = ranked
        .first()
        .cloned()
        .ok_or_else(|| QuoteError::NoCandidates(service.name.clone()))?;

    debug!(
        service = %service.name,
        visits = usage.visits,
        plan = %chosen.plan,
        total = %chosen.total,
        candidates = ranked.len(),
        "chose plan"
    );

    Ok(PlanChoice { chosen, ranked })
}

/// Cheapest first; ties prefer standard, then smaller upfront, then smaller code.
fn compare_estimates(a: &CostEstimate<'_>, b: &CostEstimate<'_>) -> Ordering {
    a.total
        .to_minor_units()
        .cmp(&b.total.to_minor_units())
        .then_with(|| b.plan.is_standard().cmp(&a.plan.is_standard()))
        .then_with(|| a.upfront.to_minor_units().cmp(&b.upfront.to_minor_units()))
        .then_with(|| a.plan.code().cmp(&b.plan.code()))
}

fn integrity_error(service: &ServiceDefinition<'_>, kind: PlanKind, code: &str) -> QuoteError {
    QuoteError::CatalogIntegrity {
        service: service.name.clone(),
        kind,
        code: code.to_string(),
    }
}
