//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
///
/// Created lazily the first time an order references an unseen phone
/// number (silent registration). `phone` is indexed but not unique;
/// lookups take the first match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub internal_note: Option<String>,
    /// Loyalty point balance
    pub points: i64,
    /// Lifetime spend in currency units
    pub total_spent: i64,
    /// Lifetime completed-order count
    pub order_count: i64,
    /// Epoch millis of the last completed order
    pub last_order_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial CRM update: only supplied fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub full_name: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub internal_note: Option<String>,
}
