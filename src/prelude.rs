//! Waxpass prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{QuoteError, Selection, recommend},
    catalog::{Catalog, CatalogBuilder, CatalogError},
    evaluator::{CostEstimate, PlanError, Usage, UsageError, evaluate},
    fixtures::{Fixture, FixtureError, load_catalog, parse_selection},
    optimizer::{PlanChoice, optimize_service},
    plans::{Plan, PlanKind, prepaid::PrepaidRule, unlimited::UnlimitedOption},
    pricing::PricingError,
    recommendation::{PaymentPlan, PricingRecommendation, RecommendationLine, ReportError},
    services::{ServiceDefinition, ServiceKey},
};
