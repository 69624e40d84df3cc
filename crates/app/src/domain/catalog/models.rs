//! Catalog Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{domain::users::models::UserUuid, uuids::TypedUuid};

/// Category UUID
pub type CategoryUuid = TypedUuid<Category>;

/// Category Model
#[derive(Debug, Clone)]
pub struct Category {
    pub uuid: CategoryUuid,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Category Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub name: String,
    /// Derived from `name` when absent.
    pub slug: Option<String>,
    pub icon: String,
    pub description: String,
}

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_uuid: CategoryUuid,
    pub seller_uuid: UserUuid,
    pub price: Decimal,
    pub stock: u32,
    /// Sustainability rating, always within [1, 100].
    pub eco_score: u32,
    pub is_active: bool,
    pub is_featured: bool,
    pub views_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub category_uuid: CategoryUuid,
    pub seller_uuid: UserUuid,
    pub price: Decimal,
    pub stock: u32,
    pub eco_score: u32,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Product Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    pub eco_score: u32,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Filter for product listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub category: Option<CategoryUuid>,
    pub active_only: bool,
    pub featured_only: bool,
}
