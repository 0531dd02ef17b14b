//! Integration tests for how the optimizer treats plans that never win.
//!
//! B9G2 buys 11 visits for the price of nine and B9G3 buys 12 for the same
//! price, so B9G2 can at best tie B9G3. Dropping it, or dropping every plan
//! except the winner, must not change what a customer pays.

use rusty_money::{
    Money,
    iso::{Currency, USD},
};
use testresult::TestResult;

use waxpass::{
    cart::{Selection, recommend},
    catalog::{Catalog, CatalogError},
    evaluator::{Usage, evaluate},
    plans::{Plan, PlanKind, prepaid::PrepaidRule, unlimited::UnlimitedOption},
    services::ServiceDefinition,
};

fn usd(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, USD)
}

fn catalog_with(prepaid: &[&str], unlimited: &[&str]) -> Result<Catalog<'static>, CatalogError> {
    Catalog::builder(USD)
        .prepaid_rule(PrepaidRule::new("B9G3", 9, 3))
        .prepaid_rule(PrepaidRule::new("B9G2", 9, 2))
        .prepaid_rule(PrepaidRule::new("B6G1", 6, 1))
        .unlimited_option(UnlimitedOption::new("12U2", 12, usd(33_200)).with_visit_frequency(2))
        .unlimited_option(UnlimitedOption::new("12U3", 12, usd(27_200)).with_visit_frequency(3))
        .service(
            ServiceDefinition::new("Underarms", "Body", usd(2600))
                .with_prepaid_rules(prepaid)
                .with_unlimited_options(unlimited),
        )
        .build()
}

#[test]
fn dropping_a_dominated_bundle_keeps_the_price() -> TestResult {
    let full = catalog_with(&["B9G3", "B9G2", "B6G1"], &["12U2", "12U3"])?;
    let trimmed = catalog_with(&["B9G3", "B6G1"], &["12U2", "12U3"])?;

    for visits in 1..=40 {
        let selections = [Selection::new("Underarms", visits)];

        assert_eq!(
            recommend(&full, &selections)?.subtotal(),
            recommend(&trimmed, &selections)?.subtotal(),
            "{visits} visits"
        );
    }

    Ok(())
}

#[test]
fn winner_alone_matches_full_catalog() -> TestResult {
    let full = catalog_with(&["B9G3", "B9G2", "B6G1"], &["12U2", "12U3"])?;

    for visits in 1..=40 {
        let selections = [Selection::new("Underarms", visits)];
        let recommendation = recommend(&full, &selections)?;
        let line = recommendation.line_for("Underarms").ok_or("missing line")?;

        let only = match line.plan() {
            Plan::Standard => catalog_with(&[], &[])?,
            Plan::Prepaid(rule) => catalog_with(&[rule.code.as_str()], &[])?,
            Plan::Unlimited(option) => catalog_with(&[], &[option.code.as_str()])?,
        };

        let alone = recommend(&only, &selections)?;

        assert_eq!(alone.subtotal(), recommendation.subtotal(), "{visits} visits");
        assert_eq!(
            alone
                .line_for("Underarms")
                .map(|line| line.plan().code()),
            Some(line.plan().code()),
            "{visits} visits"
        );
    }

    Ok(())
}

#[test]
fn equal_totals_break_on_code() -> TestResult {
    let catalog = catalog_with(&["B9G3", "B9G2"], &[])?;

    // Eleven visits: B9G2 is one $234 bundle; B9G3 is one $234 bundle with a
    // visit to spare. Same total, same upfront, so the lower code wins.
    let recommendation = recommend(&catalog, &[Selection::new("Underarms", 11)])?;
    let line = recommendation.line_for("Underarms").ok_or("missing line")?;

    assert_eq!(line.chosen().total, usd(23_400));
    assert_eq!(line.plan().code(), Some("B9G2"));

    Ok(())
}

#[test]
fn ineligible_service_quotes_standard_only() -> TestResult {
    let catalog = catalog_with(&[], &[])?;

    let recommendation = recommend(&catalog, &[Selection::new("Underarms", 40)])?;
    let line = recommendation.line_for("Underarms").ok_or("missing line")?;

    assert!(line.plan().is_standard());
    assert_eq!(line.choice().ranked().len(), 1);
    assert_eq!(line.chosen().total, usd(104_000));

    Ok(())
}

#[test]
fn exactly_one_bundle_has_no_remainder() -> TestResult {
    let catalog = catalog_with(&["B9G3"], &[])?;
    let service = catalog.service("Underarms").ok_or("missing service")?;
    let rule = catalog.prepaid_rule("B9G3").ok_or("missing rule")?;

    let estimate = evaluate(service, Plan::Prepaid(rule), Usage::visits(12))?;

    assert_eq!(estimate.plan.kind(), PlanKind::Prepaid);
    assert_eq!(estimate.total, usd(23_400));
    assert_eq!(estimate.purchases, 1);
    assert_eq!(estimate.standard_visits, 0);

    Ok(())
}
