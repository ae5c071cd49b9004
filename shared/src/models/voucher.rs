//! Voucher Model

use serde::{Deserialize, Serialize};

/// Voucher discount type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// Discount exactly `value` currency units
    Fixed,
    /// Discount `value` percent of the subtotal, capped at `max_discount`
    Percentage,
}

/// Voucher entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Voucher {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Fixed amount in currency units, or percentage (0..=100)
    pub value: f64,
    /// Subtotal threshold below which the voucher silently does not apply
    pub min_order_value: i64,
    /// Cap for percentage discounts, in currency units
    pub max_discount: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
