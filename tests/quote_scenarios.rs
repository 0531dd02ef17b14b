//! Integration tests for quoting against the standard catalog.
//!
//! Underarms is $26 per visit with B9G3, B9G2 and B6G1 bundles and the 12U2
//! ($332) and 12U3 ($272) unlimited passes. For 12 visits:
//!
//! - standard: 12 x $26 = $312
//! - B9G3: one 12-visit bundle at 9 x $26 = $234
//! - B9G2: one 11-visit bundle ($234) + 1 x $26 = $260
//! - B6G1: one 7-visit bundle ($156) + 5 x $26 = $286
//! - 12U3: $272, 12U2: $332
//!
//! B9G3 wins at $234, saving $78.

use rusty_money::{
    Money,
    iso::{Currency, USD},
};
use testresult::TestResult;

use waxpass::{
    cart::{QuoteError, Selection, recommend},
    fixtures::Fixture,
    plans::{Plan, PlanKind},
};

fn usd(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, USD)
}

#[test]
fn bundle_beats_standard_for_a_year_of_underarms() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    let recommendation = recommend(&catalog, &[Selection::new("Underarms", 12)])?;
    let line = recommendation.line_for("Underarms").ok_or("missing line")?;

    assert_eq!(line.plan().code(), Some("B9G3"));
    assert_eq!(line.chosen().total, usd(23_400));
    assert_eq!(line.chosen().unit_price, usd(1950));
    assert_eq!(line.savings()?, usd(7800));

    let totals: Vec<Money<'_, Currency>> = line
        .choice()
        .ranked()
        .iter()
        .map(|estimate| estimate.total)
        .collect();

    assert_eq!(
        totals,
        [
            usd(23_400),
            usd(26_000),
            usd(27_200),
            usd(28_600),
            usd(31_200),
            usd(33_200)
        ]
    );

    Ok(())
}

#[test]
fn few_visits_stay_standard() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    let recommendation = recommend(&catalog, &[Selection::new("Underarms", 5)])?;
    let line = recommendation.line_for("Underarms").ok_or("missing line")?;

    assert_eq!(line.plan(), Plan::Standard);
    assert_eq!(line.chosen().total, usd(13_000));
    assert_eq!(recommendation.savings()?, usd(0));

    Ok(())
}

#[test]
fn unknown_service_fails_the_whole_quote() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    let result = recommend(
        &catalog,
        &[Selection::new("Underarms", 12), Selection::single("Leg - Full")],
    );

    assert_eq!(
        result.map(|recommendation| recommendation.lines().len()),
        Err(QuoteError::UnknownService("Leg - Full".to_string()))
    );

    Ok(())
}

#[test]
fn exact_tie_prefers_standard() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    // 9 x $26 = $234 standard, and B9G3 costs $234 for the same nine visits.
    let recommendation = recommend(&catalog, &[Selection::new("Underarms", 9)])?;
    let line = recommendation.line_for("Underarms").ok_or("missing line")?;

    assert_eq!(line.plan(), Plan::Standard);
    assert_eq!(line.chosen().total, usd(23_400));

    Ok(())
}

#[test]
fn unlimited_pass_wins_for_frequent_visits_within_a_year() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    let recommendation = recommend(
        &catalog,
        &[Selection::new("Brazilian", 20).over_months(12)],
    )?;
    let line = recommendation.line_for("Brazilian").ok_or("missing line")?;

    assert_eq!(line.plan().kind(), PlanKind::Unlimited);
    assert_eq!(line.plan().code(), Some("12U3"));
    assert_eq!(line.chosen().total, usd(59_400));
    assert_eq!(line.chosen().upfront, usd(59_400));

    Ok(())
}

#[test]
fn longer_horizon_renews_passes() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    // Two 12U3 periods cost $1,188; B9G3 plus eight standard visits is $1,122.
    let recommendation = recommend(
        &catalog,
        &[Selection::new("Brazilian", 20).over_months(24)],
    )?;
    let line = recommendation.line_for("Brazilian").ok_or("missing line")?;

    assert_eq!(line.plan().code(), Some("B9G3"));
    assert_eq!(line.chosen().total, usd(112_200));
    assert_eq!(line.chosen().standard_visits, 8);

    let renewed = line
        .choice()
        .ranked()
        .iter()
        .find(|estimate| estimate.plan.code() == Some("12U3"))
        .ok_or("12U3 not evaluated")?;

    assert_eq!(renewed.purchases, 2);
    assert_eq!(renewed.total, usd(118_800));

    Ok(())
}

#[test]
fn unlimited_only_service_skips_prepaid() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    let recommendation = recommend(&catalog, &[Selection::new("Full Face", 30)])?;
    let line = recommendation.line_for("Full Face").ok_or("missing line")?;

    assert!(
        line.choice()
            .ranked()
            .iter()
            .all(|estimate| estimate.plan.kind() != PlanKind::Prepaid)
    );
    assert_eq!(line.plan().code(), Some("12U2"));
    assert_eq!(line.chosen().total, usd(82_900));

    Ok(())
}

#[test]
fn service_without_unlimited_options_never_gets_one() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    let recommendation = recommend(&catalog, &[Selection::new("Back - Full", 40)])?;
    let line = recommendation.line_for("Back - Full").ok_or("missing line")?;

    assert!(
        line.choice()
            .ranked()
            .iter()
            .all(|estimate| estimate.plan.kind() != PlanKind::Unlimited)
    );
    assert_eq!(line.plan().kind(), PlanKind::Prepaid);

    Ok(())
}

#[test]
fn recommend_is_idempotent() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;
    let selections = Fixture::new().selections("bikini-year")?;

    let first = recommend(&catalog, &selections)?;
    let second = recommend(&catalog, &selections)?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn selections_fixture_totals() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;
    let selections = Fixture::new().selections("bikini-year")?;

    let recommendation = recommend(&catalog, &selections)?;

    let plans: Vec<Option<&str>> = recommendation
        .lines()
        .iter()
        .map(|line| line.plan().code())
        .collect();

    assert_eq!(plans, [Some("12U3"), Some("B9G3"), None]);
    assert_eq!(recommendation.subtotal(), usd(85_300));
    assert_eq!(recommendation.standard_total(), usd(165_700));

    Ok(())
}

#[test]
fn chosen_cost_never_decreases_with_more_visits() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    for service in catalog.services() {
        let mut previous = 0;

        for visits in 1..=60 {
            let recommendation =
                recommend(&catalog, &[Selection::new(service.name.clone(), visits)])?;
            let total = recommendation.subtotal().to_minor_units();

            assert!(
                total >= previous,
                "{} at {visits} visits costs {total}, less than {previous}",
                service.name
            );

            previous = total;
        }
    }

    Ok(())
}

#[test]
fn savings_never_decrease_with_more_visits() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    for service in catalog.services() {
        let mut previous = 0;

        for visits in 1..=60 {
            let recommendation =
                recommend(&catalog, &[Selection::new(service.name.clone(), visits)])?;
            let savings = recommendation.savings()?.to_minor_units();

            assert!(
                savings >= previous,
                "{} at {visits} visits saves {savings}, less than {previous}",
                service.name
            );

            previous = savings;
        }
    }

    Ok(())
}

#[test]
fn chosen_cost_never_exceeds_standard() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    for service in catalog.services() {
        for visits in 1..=40 {
            let recommendation =
                recommend(&catalog, &[Selection::new(service.name.clone(), visits)])?;

            assert!(
                recommendation.subtotal().to_minor_units()
                    <= recommendation.standard_total().to_minor_units(),
                "{} at {visits} visits is quoted above standard",
                service.name
            );
        }
    }

    Ok(())
}

#[test]
fn zero_visits_is_invalid_usage() -> TestResult {
    let catalog = Fixture::new().catalog("standard")?;

    let result = recommend(&catalog, &[Selection::new("Underarms", 0)]);

    assert!(matches!(result, Err(QuoteError::InvalidUsage(_))));

    Ok(())
}
