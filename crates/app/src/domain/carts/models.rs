//! Cart Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    domain::{catalog::models::ProductUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart identity: an authenticated user or an anonymous session key,
/// never both. Each owner has at most one cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
    User(UserUuid),
    Session(String),
}

impl CartOwner {
    #[must_use]
    pub fn user_uuid(&self) -> Option<Uuid> {
        match self {
            Self::User(uuid) => Some(uuid.into_uuid()),
            Self::Session(_) => None,
        }
    }

    #[must_use]
    pub fn session_key(&self) -> Option<&str> {
        match self {
            Self::User(_) => None,
            Self::Session(key) => Some(key),
        }
    }
}

/// Cart Model
///
/// Totals are computed on read against live product price and eco score;
/// they are never stored.
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub owner: CartOwner,
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: Decimal,
    pub total_eco_points: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// CartItem Model
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    /// Live product price at read time, not a snapshot.
    pub unit_price: Decimal,
    pub eco_score: u32,
    pub quantity: u32,
    pub added_at: Timestamp,
}

impl CartItem {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// One cart line joined with the product fields checkout needs, read under
/// a row lock on the product.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub item_uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub unit_price: Decimal,
    pub eco_score: u32,
    pub stock: u32,
    pub quantity: u32,
}

impl CheckoutLine {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    #[must_use]
    pub fn eco_points(&self) -> u64 {
        u64::from(self.eco_score) * u64::from(self.quantity)
    }
}
