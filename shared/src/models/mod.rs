//! Domain models
//!
//! One file per entity. Row structs derive `sqlx::FromRow` behind the
//! `db` feature so transport-side consumers don't pull in the database.

pub mod customer;
pub mod dining_table;
pub mod order;
pub mod product;
pub mod voucher;

pub use customer::{Customer, CustomerUpdate};
pub use dining_table::{DiningTable, TableStatus};
pub use order::{
    CartLine, DeliveryMethod, Order, OrderDetail, OrderItem, OrderItemDetail, OrderItemOption,
    OrderRequest, OrderStatus, PaymentMethod, PriceBreakdown, QuoteRequest,
};
pub use product::{OptionGroup, OptionValue, Product};
pub use voucher::{DiscountType, Voucher};
