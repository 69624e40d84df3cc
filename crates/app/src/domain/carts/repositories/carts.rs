//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_get_u64,
    domain::{
        carts::models::{Cart, CartOwner, CartUuid},
        users::models::UserUuid,
    },
};

const INSERT_CART_SQL: &str = include_str!("../sql/insert_cart.sql");
const GET_CART_BY_OWNER_SQL: &str = include_str!("../sql/get_cart_by_owner.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a cart for the owner unless one already exists.
    ///
    /// Relies on the partial unique indexes over `user_uuid` and
    /// `session_key`, so racing first accesses converge on a single row.
    pub(crate) async fn insert_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CartUuid,
        owner: &CartOwner,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(INSERT_CART_SQL)
            .bind(uuid.into_uuid())
            .bind(owner.user_uuid())
            .bind(owner.session_key())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Fetch the owner's cart with live totals; items are not loaded.
    pub(crate) async fn find_cart_by_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: &CartOwner,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(GET_CART_BY_OWNER_SQL)
            .bind(owner.user_uuid())
            .bind(owner.session_key())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let user_uuid: Option<Uuid> = row.try_get("user_uuid")?;
        let session_key: Option<String> = row.try_get("session_key")?;

        let owner = match (user_uuid, session_key) {
            (Some(uuid), None) => CartOwner::User(UserUuid::from_uuid(uuid)),
            (None, Some(key)) => CartOwner::Session(key),
            _ => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "user_uuid".to_string(),
                    source: "cart must be owned by a user or a session".into(),
                });
            }
        };

        let item_rows: i64 = row.try_get("item_rows")?;

        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            owner,
            items: Vec::with_capacity(usize::try_from(item_rows).unwrap_or_default()),
            total_items: try_get_u64(row, "total_items")?,
            total_price: row.try_get("total_price")?,
            total_eco_points: try_get_u64(row, "total_eco_points")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
