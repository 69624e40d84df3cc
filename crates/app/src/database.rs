//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Decode an `INTEGER` column that the schema constrains to be non-negative.
pub(crate) fn try_get_u32(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let value_i32: i32 = row.try_get(col)?;

    u32::try_from(value_i32).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Decode a `BIGINT` column that the schema constrains to be non-negative.
pub(crate) fn try_get_u64(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let value_i64: i64 = row.try_get(col)?;

    u64::try_from(value_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
