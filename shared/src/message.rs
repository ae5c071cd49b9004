//! Staff notification payloads
//!
//! Events published on the in-process bus after order state changes.
//! Serialized with a `type` tag so WebSocket/TCP transports can forward
//! them to staff dashboards verbatim.

use serde::{Deserialize, Serialize};

/// Broadcast event for staff-facing consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusEvent {
    /// A customer submitted a new order
    NewOrder {
        order_id: i64,
        customer_name: String,
        table_id: Option<i64>,
        /// Final charged amount in currency units
        total_amount: i64,
        /// Epoch milliseconds
        timestamp: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_wire_format() {
        let event = BusEvent::NewOrder {
            order_id: 42,
            customer_name: "Ana".to_string(),
            table_id: Some(7),
            total_amount: 60000,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "new_order");
        assert_eq!(json["order_id"], 42);
        assert_eq!(json["table_id"], 7);
        assert_eq!(json["total_amount"], 60000);
    }

    #[test]
    fn test_new_order_roundtrip() {
        let event = BusEvent::NewOrder {
            order_id: 1,
            customer_name: "Walk-in".to_string(),
            table_id: None,
            total_amount: 0,
            timestamp: 0,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: BusEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
