//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{try_get_u32, try_get_u64},
    domain::users::models::{NewUser, User, UserRole, UserUuid},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const CREDIT_LOYALTY_SQL: &str = include_str!("sql/credit_loyalty.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: NewUser,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.username)
            .bind(user.email)
            .bind(user.role.as_str())
            .bind(user.phone)
            .bind(user.address)
            .bind(user.city)
            .bind(user.country)
            .bind(user.postal_code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Increment the loyalty counters; the counters only ever grow.
    pub(crate) async fn credit_loyalty(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        eco_points: u64,
        co2_saved: Decimal,
    ) -> Result<u64, sqlx::Error> {
        let points_i64 = i64::try_from(eco_points).map_err(|e| sqlx::Error::ColumnDecode {
            index: "eco_points".to_string(),
            source: Box::new(e),
        })?;

        let rows_affected = query(CREDIT_LOYALTY_SQL)
            .bind(user.into_uuid())
            .bind(points_i64)
            .bind(co2_saved)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;
        let role = UserRole::try_from(role.as_str()).map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: e.into(),
        })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            role,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
            postal_code: row.try_get("postal_code")?,
            eco_points: try_get_u64(row, "eco_points")?,
            total_orders: try_get_u32(row, "total_orders")?,
            co2_saved: row.try_get("co2_saved")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
