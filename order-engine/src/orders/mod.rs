//! Orders Module
//!
//! Order placement, status transitions and completion reconciliation.

mod service;

pub use service::OrderService;
