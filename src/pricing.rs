//! Prices

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur during price arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Minor unit arithmetic overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// A price cannot be spread over zero units.
    #[error("cannot divide a price into zero units")]
    ZeroUnits,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Multiplies a unit price by a count of units.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the product does not fit in minor units.
pub fn price_times(
    price: Money<'_, Currency>,
    count: u32,
) -> Result<Money<'_, Currency>, PricingError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(count))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Spreads a total over a number of units, rounding half away from zero to the minor unit.
///
/// # Errors
///
/// - [`PricingError::ZeroUnits`]: `units` is zero.
/// - [`PricingError::Overflow`]: the result cannot be represented in minor units.
pub fn price_per_unit(
    total: Money<'_, Currency>,
    units: u32,
) -> Result<Money<'_, Currency>, PricingError> {
    if units == 0 {
        return Err(PricingError::ZeroUnits);
    }

    let Some(minor) = Decimal::from_i64(total.to_minor_units()) else {
        return Err(PricingError::Overflow);
    };

    let per_unit = (minor / Decimal::from(units))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(per_unit, total.currency()))
}

/// Sums a sequence of prices, starting from zero in the given currency.
///
/// # Errors
///
/// - [`PricingError::Money`]: a price is in a different currency.
pub fn total_price<'a>(
    prices: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))?;

    Ok(total)
}
