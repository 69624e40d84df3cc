//! EcoShop storefront core: catalog, carts, order ledger and the
//! checkout workflow that ties them together.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
