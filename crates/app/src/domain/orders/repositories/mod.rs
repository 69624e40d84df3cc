//! Order Repositories

pub(crate) mod items;
pub(crate) mod orders;

pub(crate) use items::{InsertOrderItem, PgOrderItemsRepository};
pub(crate) use orders::{InsertOrder, PgOrdersRepository};
