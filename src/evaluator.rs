//! Plan Evaluation
//!
//! Prices a single plan for a single service at a given usage.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    plans::{Plan, PlanKind, prepaid::PrepaidRule, unlimited::UnlimitedOption},
    pricing::{PricingError, price_per_unit, price_times},
    services::ServiceDefinition,
};

/// Errors raised while evaluating a plan.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    /// The plan is not applicable to the service.
    #[error("{kind} plan {code} is not available for {service}")]
    IneligiblePlan {
        /// Service name
        service: String,
        /// Plan family
        kind: PlanKind,
        /// Plan code
        code: String,
    },

    /// The usage cannot be priced.
    #[error(transparent)]
    InvalidUsage(#[from] UsageError),

    /// Price arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<MoneyError> for PlanError {
    fn from(err: MoneyError) -> Self {
        PlanError::Pricing(PricingError::Money(err))
    }
}

/// Invalid usage values.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum UsageError {
    /// Expected visits must be at least one.
    #[error("expected visits must be at least 1, got {0}")]
    NoVisits(u32),

    /// A usage horizon must be at least one month.
    #[error("usage horizon must be at least 1 month")]
    EmptyHorizon,
}

/// How much a customer expects to use a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    /// Expected number of visits
    pub visits: u32,

    /// Months the visits are spread over; `None` means within one pass period.
    pub horizon_months: Option<u32>,
}

impl Usage {
    /// Usage of `visits` visits with no horizon.
    pub const fn visits(visits: u32) -> Self {
        Self {
            visits,
            horizon_months: None,
        }
    }

    /// Spread the visits over a number of months.
    #[must_use]
    pub const fn over_months(mut self, months: u32) -> Self {
        self.horizon_months = Some(months);
        self
    }

    /// Check that the usage can be priced.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] for zero visits or a zero-month horizon.
    pub fn validate(&self) -> Result<(), UsageError> {
        if self.visits == 0 {
            return Err(UsageError::NoVisits(self.visits));
        }

        if self.horizon_months == Some(0) {
            return Err(UsageError::EmptyHorizon);
        }

        Ok(())
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::visits(1)
    }
}

/// Cost of using one plan for one service.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate<'a> {
    /// Plan that was priced
    pub plan: Plan<'a>,

    /// Visits the estimate covers
    pub visits: u32,

    /// Total out-of-pocket cost
    pub total: Money<'a, Currency>,

    /// Effective price per visit
    pub unit_price: Money<'a, Currency>,

    /// Amount paid at purchase time for bundles or passes
    pub upfront: Money<'a, Currency>,

    /// Bundles or passes bought
    pub purchases: u32,

    /// Visits paid at the standard price
    pub standard_visits: u32,
}

impl<'a> CostEstimate<'a> {
    /// Savings of this estimate against another total (usually standard pricing).
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the currencies differ.
    pub fn savings_against(
        &self,
        baseline: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, MoneyError> {
        baseline.sub(self.total)
    }
}

/// Price a plan for a service at the given usage.
///
/// # Errors
///
/// - [`PlanError::InvalidUsage`]: zero visits or an empty horizon.
/// - [`PlanError::IneligiblePlan`]: the service does not accept the plan.
/// - [`PlanError::Pricing`]: price arithmetic overflowed.
pub fn evaluate<'a>(
    service: &'a ServiceDefinition<'a>,
    plan: Plan<'a>,
    usage: Usage,
) -> Result<CostEstimate<'a>, PlanError> {
    usage.validate()?;

    match plan {
        Plan::Standard => standard(service, usage),
        Plan::Prepaid(rule) => {
            ensure_accepts(service, plan)?;
            prepaid(service, rule, usage)
        }
        Plan::Unlimited(option) => {
            ensure_accepts(service, plan)?;
            unlimited(service, option, usage)
        }
    }
}

fn ensure_accepts(service: &ServiceDefinition<'_>, plan: Plan<'_>) -> Result<(), PlanError> {
    let code = plan.code().unwrap_or_default();

    if service.accepts(plan.kind(), code) {
        Ok(())
    } else {
        Err(PlanError::IneligiblePlan {
            service: service.name.clone(),
            kind: plan.kind(),
            code: code.to_string(),
        })
    }
}

fn standard<'a>(
    service: &'a ServiceDefinition<'a>,
    usage: Usage,
) -> Result<CostEstimate<'a>, PlanError> {
    let price = service.standard_price;

    Ok(CostEstimate {
        plan: Plan::Standard,
        visits: usage.visits,
        total: price_times(price, usage.visits)?,
        unit_price: price,
        upfront: Money::from_minor(0, price.currency()),
        purchases: 0,
        standard_visits: usage.visits,
    })
}

/// Full bundles cover as many visits as they can. The remainder is either paid
/// at the standard price or covered by opening one more bundle, whichever is
/// cheaper; on a tie the remainder stays at the standard price.
fn prepaid<'a>(
    service: &'a ServiceDefinition<'a>,
    rule: &'a PrepaidRule,
    usage: Usage,
) -> Result<CostEstimate<'a>, PlanError> {
    let price = service.standard_price;
    let size = rule.bundle_size();

    let full_bundles = usage
        .visits
        .checked_div(size)
        .ok_or(PricingError::ZeroUnits)?;
    let remainder = usage
        .visits
        .checked_rem(size)
        .ok_or(PricingError::ZeroUnits)?;

    let bundle_price = rule.bundle_price(price)?;
    let remainder_cost = price_times(price, remainder)?;

    let open_partial =
        remainder > 0 && bundle_price.to_minor_units() < remainder_cost.to_minor_units();

    let (purchases, standard_visits) = if open_partial {
        (full_bundles + 1, 0)
    } else {
        (full_bundles, remainder)
    };

    let upfront = price_times(bundle_price, purchases)?;
    let total = upfront.add(price_times(price, standard_visits)?)?;

    Ok(CostEstimate {
        plan: Plan::Prepaid(rule),
        visits: usage.visits,
        total,
        unit_price: price_per_unit(total, usage.visits)?,
        upfront,
        purchases,
        standard_visits,
    })
}

fn unlimited<'a>(
    service: &'a ServiceDefinition<'a>,
    option: &'a UnlimitedOption<'a>,
    usage: Usage,
) -> Result<CostEstimate<'a>, PlanError> {
    let passes = option.periods_for(usage.horizon_months);
    let total = price_times(option.price_for(&service.name), passes)?;

    Ok(CostEstimate {
        plan: Plan::Unlimited(option),
        visits: usage.visits,
        total,
        unit_price: price_per_unit(total, usage.visits)?,
        upfront: total,
        purchases: passes,
        standard_visits: 0,
    })
}
