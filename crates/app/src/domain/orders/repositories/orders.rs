//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::try_get_u64,
    domain::{
        orders::models::{Order, OrderStatus, OrderUuid, ShippingDetails},
        users::models::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const ORDER_NUMBER_EXISTS_SQL: &str = include_str!("../sql/order_number_exists.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const GET_ORDER_BY_NUMBER_SQL: &str = include_str!("../sql/get_order_by_number.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const UPDATE_STATUS_SQL: &str = include_str!("../sql/update_status.sql");
const DELETE_ORDER_SQL: &str = include_str!("../sql/delete_order.sql");

/// Column values for a new order row. Everything here is immutable once
/// written; later updates touch only the status column.
#[derive(Debug, Clone)]
pub(crate) struct InsertOrder<'a> {
    pub uuid: OrderUuid,
    pub order_number: &'a str,
    pub user: UserUuid,
    pub status: OrderStatus,
    pub shipping: &'a ShippingDetails,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub eco_points_earned: u64,
    pub co2_saved: Decimal,
    pub notes: &'a str,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: InsertOrder<'_>,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number)
            .bind(order.user.into_uuid())
            .bind(order.status.as_str())
            .bind(&order.shipping.name)
            .bind(&order.shipping.email)
            .bind(&order.shipping.phone)
            .bind(&order.shipping.address)
            .bind(&order.shipping.city)
            .bind(&order.shipping.country)
            .bind(&order.shipping.postal_code)
            .bind(order.subtotal)
            .bind(order.tax)
            .bind(order.shipping_cost)
            .bind(order.total)
            .bind(i64::try_from(order.eco_points_earned).unwrap_or(i64::MAX))
            .bind(order.co2_saved)
            .bind(order.notes)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn order_number_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_number: &str,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(ORDER_NUMBER_EXISTS_SQL)
            .bind(order_number)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_by_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order_number: &str,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_BY_NUMBER_SQL)
            .bind(user.into_uuid())
            .bind(order_number)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: &str = row.try_get("status")?;
        let status = OrderStatus::try_from(status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: e.into(),
        })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            status,
            shipping: ShippingDetails {
                name: row.try_get("shipping_name")?,
                email: row.try_get("shipping_email")?,
                phone: row.try_get("shipping_phone")?,
                address: row.try_get("shipping_address")?,
                city: row.try_get("shipping_city")?,
                country: row.try_get("shipping_country")?,
                postal_code: row.try_get("shipping_postal_code")?,
            },
            subtotal: row.try_get("subtotal")?,
            tax: row.try_get("tax")?,
            shipping_cost: row.try_get("shipping_cost")?,
            total: row.try_get("total")?,
            eco_points_earned: try_get_u64(row, "eco_points_earned")?,
            co2_saved: row.try_get("co2_saved")?,
            notes: row.try_get("notes")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
