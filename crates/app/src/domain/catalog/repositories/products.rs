//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::try_get_u32,
    domain::{
        catalog::models::{CategoryUuid, Product, ProductFilter, ProductUuid},
        users::models::UserUuid,
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("../sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("../sql/get_product.sql");
const GET_PRODUCT_BY_SLUG_SQL: &str = include_str!("../sql/get_product_by_slug.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("../sql/list_products.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("../sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("../sql/delete_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("../sql/decrement_stock.sql");
const RECORD_VIEW_SQL: &str = include_str!("../sql/record_view.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

#[derive(Debug, Clone)]
pub(crate) struct InsertProduct<'a> {
    pub uuid: ProductUuid,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub category_uuid: CategoryUuid,
    pub seller_uuid: UserUuid,
    pub price: Decimal,
    pub stock: u32,
    pub eco_score: u32,
    pub is_active: bool,
    pub is_featured: bool,
}

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: InsertProduct<'_>,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(product.slug)
            .bind(product.description)
            .bind(product.category_uuid.into_uuid())
            .bind(product.seller_uuid.into_uuid())
            .bind(product.price)
            .bind(i64::from(product.stock))
            .bind(i32::try_from(product.eco_score).unwrap_or(i32::MAX))
            .bind(product.is_active)
            .bind(product.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .bind(filter.category.map(CategoryUuid::into_uuid))
            .bind(filter.active_only)
            .bind(filter.featured_only)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        name: &str,
        description: &str,
        price: Decimal,
        stock: u32,
        eco_score: u32,
        is_active: bool,
        is_featured: bool,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(name)
            .bind(description)
            .bind(price)
            .bind(i64::from(stock))
            .bind(i32::try_from(eco_score).unwrap_or(i32::MAX))
            .bind(is_active)
            .bind(is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Guarded stock decrement: only succeeds while `stock >= quantity`,
    /// so concurrent checkouts can never drive stock negative. Returns the
    /// number of rows updated (0 means insufficient stock).
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn record_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RECORD_VIEW_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            category_uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
            seller_uuid: UserUuid::from_uuid(row.try_get("seller_uuid")?),
            price: row.try_get("price")?,
            stock: try_get_u32(row, "stock")?,
            eco_score: try_get_u32(row, "eco_score")?,
            is_active: row.try_get("is_active")?,
            is_featured: row.try_get("is_featured")?,
            views_count: try_get_u32(row, "views_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
