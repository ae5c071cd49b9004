//! Order Model
//!
//! The order aggregate and its wire payloads. Monetary fields are whole
//! currency units (the currency has no subunits); enum values round-trip
//! through persistence as the exact SCREAMING_SNAKE_CASE strings below.

use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// NEW → CONFIRMED → PREPARING → READY → OUT_FOR_DELIVERY → COMPLETED,
/// with CANCELLED / REJECTED reachable from early states. No transition
/// matrix is enforced: any status can be written over any other; only
/// the transition into COMPLETED carries side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Completed,
    Cancelled,
    Rejected,
}

/// Payment method selected at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    BankTransfer,
    Momo,
}

/// Delivery method selected at checkout
///
/// Only EXPRESS carries a delivery surcharge; fee schedules for the other
/// tiers are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    DineIn,
    Takeaway,
    Standard,
    Express,
}

/// One requested product line, as submitted by a customer.
///
/// Never persisted as-is; prices are re-read from the catalog and the
/// line is translated into an [`OrderItem`] snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Selected option-value ids
    #[serde(default)]
    pub options: Vec<i64>,
    pub note: Option<String>,
    /// Label of the group member who added the line (group orders)
    pub ordered_by: Option<String>,
}

/// Pricing request; safe to call repeatedly, persists nothing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub items: Vec<CartLine>,
    pub voucher_code: Option<String>,
    pub delivery_method: DeliveryMethod,
    /// Phone used to look up the loyalty balance
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub use_points: bool,
}

/// Computed price breakdown
///
/// Invariants: `total_amount = max(0, sub_total + delivery_fee
/// - discount_amount - points_discount)`; `discount_amount <= sub_total`;
/// `points_discount <= sub_total + delivery_fee - discount_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub sub_total: i64,
    pub delivery_fee: i64,
    /// Voucher discount
    pub discount_amount: i64,
    /// Loyalty-point discount
    pub points_discount: i64,
    pub total_amount: i64,
    /// Raw point balance of the matched customer (0 when none matched)
    pub user_points_available: i64,
    /// True iff the matched customer has a positive balance
    pub can_use_points: bool,
}

/// Order placement request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<CartLine>,
    pub voucher_code: Option<String>,
    pub delivery_method: DeliveryMethod,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_note: Option<String>,
    pub table_id: Option<i64>,
    #[serde(default)]
    pub use_points: bool,
}

impl OrderRequest {
    /// The pricing view of this request
    pub fn as_quote(&self) -> QuoteRequest {
        QuoteRequest {
            items: self.items.clone(),
            voucher_code: self.voucher_code.clone(),
            delivery_method: self.delivery_method,
            customer_phone: Some(self.customer_phone.clone()),
            use_points: self.use_points,
        }
    }
}

/// Order entity (aggregate root)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_note: Option<String>,
    /// Linked customer record (silent registration), if any
    pub customer_id: Option<i64>,
    pub table_id: Option<i64>,
    pub sub_total: i64,
    pub delivery_fee: i64,
    pub discount_amount: i64,
    pub points_discount: i64,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub delivery_method: DeliveryMethod,
    pub voucher_code: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Persisted order line; snapshots the product name and unit price at
/// order time so later catalog edits don't rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at order time, including selected option deltas
    pub item_price: i64,
    pub item_note: Option<String>,
    pub ordered_by: Option<String>,
}

/// Snapshot of one selected option on an order item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemOption {
    pub id: i64,
    pub order_item_id: i64,
    pub option_name: String,
    pub value_name: String,
    pub added_price: i64,
}

/// Order item with its selected options (read model)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub options_selected: Vec<OrderItemOption>,
}

/// Full order with items (read model for staff views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"OUT_FOR_DELIVERY\"");
        let back: OrderStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(back, OrderStatus::Completed);
    }

    #[test]
    fn test_delivery_method_roundtrip() {
        for (method, text) in [
            (DeliveryMethod::DineIn, "\"DINE_IN\""),
            (DeliveryMethod::Takeaway, "\"TAKEAWAY\""),
            (DeliveryMethod::Standard, "\"STANDARD\""),
            (DeliveryMethod::Express, "\"EXPRESS\""),
        ] {
            assert_eq!(serde_json::to_string(&method).unwrap(), text);
            let back: DeliveryMethod = serde_json::from_str(text).unwrap();
            assert_eq!(back, method);
        }
    }

    #[test]
    fn test_cart_line_options_default_empty() {
        let line: CartLine =
            serde_json::from_str(r#"{"product_id": 1, "quantity": 2}"#).unwrap();
        assert!(line.options.is_empty());
        assert!(line.note.is_none());
    }
}
