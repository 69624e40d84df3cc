//! Catalog: categories and products.

pub mod errors;
pub mod models;
pub(crate) mod repositories;
pub mod service;
pub mod slug;

pub use errors::CatalogServiceError;
pub use service::*;
