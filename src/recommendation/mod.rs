//! Pricing Recommendation

use std::io;

use decimal_percentage::Percentage;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    evaluator::{CostEstimate, Usage},
    optimizer::PlanChoice,
    plans::Plan,
    services::{ServiceDefinition, ServiceKey},
};

pub mod installments;

pub use installments::{MAX_INSTALLMENTS, PaymentPlan, payment_plans};

/// Errors that can occur when rendering a recommendation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Recommended plan for one selected service.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationLine<'a> {
    key: ServiceKey,
    service: &'a ServiceDefinition<'a>,
    usage: Usage,
    choice: PlanChoice<'a>,
    standard_cost: Money<'a, Currency>,
}

impl<'a> RecommendationLine<'a> {
    /// Create a line from an optimizer choice.
    pub fn new(
        key: ServiceKey,
        service: &'a ServiceDefinition<'a>,
        usage: Usage,
        choice: PlanChoice<'a>,
        standard_cost: Money<'a, Currency>,
    ) -> Self {
        Self {
            key,
            service,
            usage,
            choice,
            standard_cost,
        }
    }

    /// Catalog key of the service being quoted.
    pub fn service_key(&self) -> ServiceKey {
        self.key
    }

    /// Service being quoted.
    pub fn service(&self) -> &'a ServiceDefinition<'a> {
        self.service
    }

    /// Name of the service being quoted.
    pub fn service_name(&self) -> &'a str {
        self.service.name.as_str()
    }

    /// Usage the line was priced for.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// Optimizer result, including ranked alternatives.
    pub fn choice(&self) -> &PlanChoice<'a> {
        &self.choice
    }

    /// Winning estimate.
    pub fn chosen(&self) -> &CostEstimate<'a> {
        self.choice.chosen()
    }

    /// Winning plan.
    pub fn plan(&self) -> Plan<'a> {
        self.choice.plan()
    }

    /// Cost of paying the standard price for every visit.
    pub fn standard_cost(&self) -> Money<'a, Currency> {
        self.standard_cost
    }

    /// Savings of the chosen plan against standard pricing.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.chosen().savings_against(self.standard_cost)
    }
}

/// Priced recommendation for a whole selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRecommendation<'a> {
    /// One line per selection, in selection order
    lines: Vec<RecommendationLine<'a>>,

    /// Total of the chosen plans
    subtotal: Money<'a, Currency>,

    /// Total at standard prices
    standard_total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> PricingRecommendation<'a> {
    /// Create a new recommendation with the given details.
    #[must_use]
    pub fn new(
        lines: Vec<RecommendationLine<'a>>,
        subtotal: Money<'a, Currency>,
        standard_total: Money<'a, Currency>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            lines,
            subtotal,
            standard_total,
            currency,
        }
    }

    /// Lines in selection order.
    pub fn lines(&self) -> &[RecommendationLine<'a>] {
        &self.lines
    }

    /// Lookup the line for a service.
    pub fn line_for(&self, service_name: &str) -> Option<&RecommendationLine<'a>> {
        self.lines
            .iter()
            .find(|line| line.service_name() == service_name)
    }

    /// Total of the chosen plans.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total at standard prices.
    pub fn standard_total(&self) -> Money<'a, Currency> {
        self.standard_total
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Savings against paying standard prices.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.standard_total.sub(self.subtotal)
    }

    /// Savings as a fraction of the standard total.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let standard_minor = self.standard_total.to_minor_units();

        if standard_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let standard_dec = Decimal::from_i64(standard_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / standard_dec))
    }

    /// Equal-installment schedules for the subtotal.
    pub fn payment_plans(&self, max_installments: u32) -> SmallVec<[PaymentPlan<'a>; 4]> {
        payment_plans(self.subtotal, max_installments)
    }

    /// Writes the recommendation as a table followed by totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the recommendation cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record([
            "Service",
            "Visits",
            "Plan",
            "Standard",
            "Quoted",
            "Per Visit",
            "Savings",
        ]);

        for line in &self.lines {
            let chosen = line.chosen();

            builder.push_record([
                line.service_name().to_string(),
                line.usage().visits.to_string(),
                plan_label(chosen),
                line.standard_cost().to_string(),
                chosen.total.to_string(),
                chosen.unit_price.to_string(),
                line.savings()?.to_string(),
            ]);
        }

        write_table(&mut out, builder, 3..7)?;
        write_summary(&mut out, self)
    }

    /// Writes every evaluated plan per service, best first.
    ///
    /// # Errors
    ///
    /// Returns an error if the alternatives cannot be written.
    pub fn write_alternatives_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        for line in &self.lines {
            let mut builder = Builder::default();

            builder.push_record([
                "",
                "Plan",
                "Total",
                "Per Visit",
                "Upfront",
                "Savings",
                "Cadence",
            ]);

            for (rank, estimate) in line.choice().ranked().iter().enumerate() {
                builder.push_record([
                    (rank + 1).to_string(),
                    plan_label(estimate),
                    estimate.total.to_string(),
                    estimate.unit_price.to_string(),
                    estimate.upfront.to_string(),
                    estimate.savings_against(line.standard_cost())?.to_string(),
                    cadence_label(estimate.plan),
                ]);
            }

            writeln!(out, "\n {} ({} visits)", line.service_name(), line.usage().visits)
                .map_err(|_err| ReportError::IO)?;

            write_table(&mut out, builder, 2..6)?;
        }

        Ok(())
    }

    /// Writes payment schedules for the subtotal in up to `max_installments` installments.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedules cannot be written.
    pub fn write_payment_plans_to(
        &self,
        mut out: impl io::Write,
        max_installments: u32,
    ) -> Result<(), ReportError> {
        let plans = self.payment_plans(max_installments);

        if plans.is_empty() {
            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Installments", "First Payment", "Then"]);

        for plan in plans {
            let then = if plan.installments > 1 {
                format!("{} x {}", plan.installments - 1, plan.per_installment)
            } else {
                "-".to_string()
            };

            builder.push_record([
                plan.installments.to_string(),
                plan.first_payment_due.to_string(),
                then,
            ]);
        }

        write_table(&mut out, builder, 1..3)
    }
}

/// Plan code with purchase details, e.g. `B9G3 x2 + 3 std`.
fn plan_label(estimate: &CostEstimate<'_>) -> String {
    match estimate.plan {
        Plan::Standard => estimate.plan.to_string(),
        Plan::Prepaid(_) | Plan::Unlimited(_) => {
            let mut label = format!("{} x{}", estimate.plan, estimate.purchases);

            if estimate.standard_visits > 0 {
                label.push_str(&format!(" + {} std", estimate.standard_visits));
            }

            label
        }
    }
}

/// Advertised visits per pass period, e.g. `~26 visits`.
fn cadence_label(plan: Plan<'_>) -> String {
    match plan {
        Plan::Unlimited(option) => option
            .estimated_visits()
            .map(|visits| format!("~{visits} visits"))
            .unwrap_or_default(),
        Plan::Standard | Plan::Prepaid(_) => String::new(),
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    money_columns: std::ops::Range<usize>,
) -> Result<(), ReportError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(money_columns), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| ReportError::IO)
}

fn write_summary(
    out: &mut impl io::Write,
    recommendation: &PricingRecommendation<'_>,
) -> Result<(), ReportError> {
    let savings = recommendation.savings()?;
    let savings_percent_points = percent_points(recommendation.savings_percent()?);

    let rows = [
        (" Standard:", recommendation.standard_total().to_string()),
        (" Subtotal:", recommendation.subtotal().to_string()),
        (" Savings:", format!("({savings_percent_points:.2}%) {savings}")),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReportError::IO)?;
    }

    writeln!(out).map_err(|_err| ReportError::IO)
}

fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
