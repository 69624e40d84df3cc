//! Checkout errors.

use thiserror::Error;

/// Checkout error variants.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user has no cart, or the cart has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line asks for more units than the product has.
    #[error("insufficient stock for {product}: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: u32,
        requested: u32,
    },

    /// Shipping details failed validation; carries the offending field.
    #[error("invalid shipping details: {0}")]
    InvalidShipping(&'static str),

    /// The checkout user does not exist.
    #[error("user not found")]
    UserNotFound,

    /// Could not allocate an unused order number within the retry budget.
    #[error("could not allocate a unique order number")]
    OrderNumberExhausted,

    /// Underlying SQL/storage error.
    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}
