//! Order Items Repository

use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_get_u32,
    domain::{
        catalog::models::ProductUuid,
        orders::models::{OrderItem, OrderItemUuid, OrderUuid},
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

/// Column values for a new order line: the product snapshot at purchase.
#[derive(Debug, Clone)]
pub(crate) struct InsertOrderItem<'a> {
    pub uuid: OrderItemUuid,
    pub order: OrderUuid,
    pub product: ProductUuid,
    pub product_name: &'a str,
    pub product_price: Decimal,
    pub eco_score: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: InsertOrderItem<'_>,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(item.order.into_uuid())
            .bind(item.product.into_uuid())
            .bind(item.product_name)
            .bind(item.product_price)
            .bind(i64::from(item.eco_score))
            .bind(i64::from(item.quantity))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let product_uuid: Option<Uuid> = row.try_get("product_uuid")?;

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: product_uuid.map(ProductUuid::from_uuid),
            product_name: row.try_get("product_name")?,
            product_price: row.try_get("product_price")?,
            eco_score: try_get_u32(row, "eco_score")?,
            quantity: try_get_u32(row, "quantity")?,
        })
    }
}
