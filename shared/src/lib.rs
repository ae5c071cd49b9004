//! Shared types for the order engine
//!
//! Domain models, fixed enum sets, wire payloads and small utilities used
//! by the engine crate and by the transport layer that embeds it.

pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message re-exports (for convenient access)
pub use message::BusEvent;
