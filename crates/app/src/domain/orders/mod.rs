//! Orders domain: the immutable order ledger.

pub mod errors;
pub mod models;
pub mod number;
pub(crate) mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use models::{Order, OrderItem, OrderStatus, OrderUuid, ShippingDetails};
pub use service::{OrdersService, PgOrdersService};
