//! Product Catalog Models
//!
//! Read-only from the engine's perspective: catalog admin CRUD lives in
//! the management surface, the engine only resolves prices by id.

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Base price in currency units (options are added on top)
    pub base_price: i64,
    pub image_url: Option<String>,
    pub display_order: i64,
    pub is_best_seller: bool,
    pub is_out_of_stock: bool,
    pub category_id: Option<i64>,
}

/// Option group (e.g. "Size", "Toppings")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OptionGroup {
    pub id: i64,
    pub name: String,
    pub display_order: i64,
}

/// A selectable value within an option group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OptionValue {
    pub id: i64,
    pub option_group_id: i64,
    pub name: String,
    /// Price delta in currency units, added to the product base price
    pub price_adjustment: i64,
    pub is_out_of_stock: bool,
}
