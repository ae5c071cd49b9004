//! Price Calculator
//!
//! Pure money math for the pricing engine. Percentage calculations run
//! through rust_decimal and are rounded half-up to whole currency units
//! (the currency has no subunits, storage is zero-decimal).

use rust_decimal::prelude::*;
use shared::models::{DiscountType, Voucher};

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round to whole currency units (half-up) and convert back to i64
#[inline]
fn to_amount(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Voucher discount for a given subtotal.
///
/// Below the voucher's minimum order value the discount is zero; no
/// error is surfaced, declining a coupon is not a failure. The result
/// never exceeds the subtotal.
pub fn voucher_discount(voucher: &Voucher, sub_total: i64) -> i64 {
    if sub_total < voucher.min_order_value {
        return 0;
    }
    let discount = match voucher.discount_type {
        DiscountType::Fixed => to_amount(to_decimal(voucher.value)),
        DiscountType::Percentage => {
            let raw = Decimal::from(sub_total) * to_decimal(voucher.value) / Decimal::ONE_HUNDRED;
            let amount = to_amount(raw);
            match voucher.max_discount {
                Some(cap) => amount.min(cap),
                None => amount,
            }
        }
    };
    discount.clamp(0, sub_total)
}

/// Loyalty-point discount: the customer's balance converted at the
/// redemption rate, capped at the amount still owed and floored at zero.
pub fn points_redemption(points: i64, redeem_rate: i64, amount_due: i64) -> i64 {
    let potential = points.saturating_mul(redeem_rate);
    potential.min(amount_due).max(0)
}

/// Points consumed by a given redemption discount (floor division)
pub fn points_to_debit(points_discount: i64, redeem_rate: i64) -> i64 {
    if redeem_rate <= 0 {
        return 0;
    }
    (points_discount / redeem_rate).max(0)
}

/// Points earned by a completed order (floor division)
pub fn points_earned(total_amount: i64, earn_rate: i64) -> i64 {
    if earn_rate <= 0 {
        return 0;
    }
    (total_amount / earn_rate).max(0)
}

/// Final charged amount, floored at zero
pub fn order_total(sub_total: i64, delivery_fee: i64, discount: i64, points_discount: i64) -> i64 {
    (sub_total + delivery_fee - discount - points_discount).max(0)
}
