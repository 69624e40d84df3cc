//! Checkout workflow: turns a cart into an order atomically.

pub mod config;
pub mod errors;
pub mod pricing;
pub mod service;

pub use config::CheckoutConfig;
pub use errors::CheckoutError;
pub use pricing::PricingQuote;
pub use service::{CheckoutService, PgCheckoutService};
