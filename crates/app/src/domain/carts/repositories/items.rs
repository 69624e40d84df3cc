//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::try_get_u32,
    domain::{
        carts::models::{CartItem, CartItemUuid, CartUuid, CheckoutLine},
        catalog::models::ProductUuid,
    },
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const UPSERT_ITEM_SQL: &str = include_str!("../sql/upsert_item.sql");
const GET_ITEM_SQL: &str = include_str!("../sql/get_item.sql");
const GET_ITEM_FOR_UPDATE_SQL: &str = include_str!("../sql/get_item_for_update.sql");
const SET_QUANTITY_SQL: &str = include_str!("../sql/set_quantity.sql");
const DELETE_ITEM_SQL: &str = include_str!("../sql/delete_item.sql");
const CLEAR_ITEMS_SQL: &str = include_str!("../sql/clear_items.sql");
const GET_CHECKOUT_LINES_SQL: &str = include_str!("../sql/get_checkout_lines.sql");

/// Cart line quantity with current stock, fetched under a row lock for
/// quantity changes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemForUpdate {
    pub quantity: u32,
    pub stock: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a line or, when the product is already in the cart, add the
    /// quantity onto the existing row. Returns the row's UUID.
    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItemUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(UPSERT_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_one(&mut **tx)
            .await?;

        Ok(CartItemUuid::from_uuid(uuid))
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_item_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<ItemForUpdate, sqlx::Error> {
        let row = query(GET_ITEM_FOR_UPDATE_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(ItemForUpdate {
            quantity: try_get_u32(&row, "quantity")?,
            stock: try_get_u32(&row, "stock")?,
        })
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Fetch all cart lines joined with product data, locking the product
    /// rows until the surrounding transaction completes.
    pub(crate) async fn get_checkout_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CheckoutLine>, sqlx::Error> {
        query_as::<Postgres, CheckoutLine>(GET_CHECKOUT_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            unit_price: row.try_get("unit_price")?,
            eco_score: try_get_u32(row, "eco_score")?,
            quantity: try_get_u32(row, "quantity")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CheckoutLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item_uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            unit_price: row.try_get("unit_price")?,
            eco_score: try_get_u32(row, "eco_score")?,
            stock: try_get_u32(row, "stock")?,
            quantity: try_get_u32(row, "quantity")?,
        })
    }
}
