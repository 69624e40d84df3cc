//! Domain modules.

pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod notifications;
pub mod orders;
pub mod users;
