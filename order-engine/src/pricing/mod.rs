//! Pricing Module
//!
//! Computes a price breakdown (subtotal, delivery fee, voucher discount,
//! loyalty-point discount) for a cart. Prices are always re-read from the
//! catalog; nothing supplied by the caller is trusted.

pub mod calculator;
mod engine;

pub use engine::PricingEngine;
