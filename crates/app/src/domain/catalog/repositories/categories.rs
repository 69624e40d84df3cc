//! Categories Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::catalog::models::{Category, CategoryUuid};

const CREATE_CATEGORY_SQL: &str = include_str!("../sql/create_category.sql");
const LIST_CATEGORIES_SQL: &str = include_str!("../sql/list_categories.sql");
const GET_CATEGORY_BY_SLUG_SQL: &str = include_str!("../sql/get_category_by_slug.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCategoriesRepository;

impl PgCategoriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CategoryUuid,
        name: &str,
        slug: &str,
        icon: &str,
        description: &str,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(CREATE_CATEGORY_SQL)
            .bind(uuid.into_uuid())
            .bind(name)
            .bind(slug)
            .bind(icon)
            .bind(description)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        query_as::<Postgres, Category>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_category_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(GET_CATEGORY_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            icon: row.try_get("icon")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
