//! Payment Plans

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

/// Most installments a total can be split into.
pub const MAX_INSTALLMENTS: u32 = 12;

/// An equal-installment schedule for paying a quoted total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentPlan<'a> {
    /// Number of installments
    pub installments: u32,

    /// Amount of every installment after the first
    pub per_installment: Money<'a, Currency>,

    /// Amount due up front; absorbs any rounding remainder
    pub first_payment_due: Money<'a, Currency>,
}

/// Build schedules for paying `total` in 1 to `max_installments` installments.
///
/// `max_installments` is capped at [`MAX_INSTALLMENTS`].
///
/// Every schedule sums exactly to `total`: installments are whole minor units
/// and the remainder of the split is added to the first payment.
pub fn payment_plans(
    total: Money<'_, Currency>,
    max_installments: u32,
) -> SmallVec<[PaymentPlan<'_>; 4]> {
    let minor = total.to_minor_units();
    let currency = total.currency();

    (1..=max_installments.min(MAX_INSTALLMENTS))
        .map(|installments| {
            let count = i64::from(installments);
            let per_installment = minor / count;
            let remainder = minor % count;

            PaymentPlan {
                installments,
                per_installment: Money::from_minor(per_installment, currency),
                first_payment_due: Money::from_minor(per_installment + remainder, currency),
            }
        })
        .collect()
}
