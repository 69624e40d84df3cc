//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{
            Category, NewCategory, NewProduct, Product, ProductFilter, ProductUpdate, ProductUuid,
        },
        repositories::{PgCategoriesRepository, PgProductsRepository, products::InsertProduct},
        slug::slugify,
    },
};

/// Bounds applied to `eco_score` at write time.
const ECO_SCORE_MIN: u32 = 1;
const ECO_SCORE_MAX: u32 = 100;

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    categories_repository: PgCategoriesRepository,
    products_repository: PgProductsRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            categories_repository: PgCategoriesRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, CatalogServiceError> {
        let slug = category
            .slug
            .unwrap_or_else(|| slugify(&category.name));

        let mut tx = self.db.begin().await?;

        let created = self
            .categories_repository
            .create_category(
                &mut tx,
                category.uuid,
                &category.name,
                &slug,
                &category.icon,
                &category.description,
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.categories_repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn get_category_by_slug(&self, slug: &str) -> Result<Category, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let category = self
            .categories_repository
            .get_category_by_slug(&mut tx, slug)
            .await?;

        tx.commit().await?;

        Ok(category)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let slug = slugify(&product.name);
        let eco_score = product.eco_score.clamp(ECO_SCORE_MIN, ECO_SCORE_MAX);

        let mut tx = self.db.begin().await?;

        let created = self
            .products_repository
            .create_product(
                &mut tx,
                InsertProduct {
                    uuid: product.uuid,
                    name: &product.name,
                    slug: &slug,
                    description: &product.description,
                    category_uuid: product.category_uuid,
                    seller_uuid: product.seller_uuid,
                    price: product.price,
                    stock: product.stock,
                    eco_score,
                    is_active: product.is_active,
                    is_featured: product.is_featured,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError> {
        let eco_score = update.eco_score.clamp(ECO_SCORE_MIN, ECO_SCORE_MAX);

        let mut tx = self.db.begin().await?;

        let updated = self
            .products_repository
            .update_product(
                &mut tx,
                product,
                &update.name,
                &update.description,
                update.price,
                update.stock,
                eco_score,
                update.is_active,
                update.is_featured,
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.products_repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .products_repository
            .get_product_by_slug(&mut tx, slug)
            .await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self
            .products_repository
            .list_products(&mut tx, filter)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .products_repository
            .delete_product(&mut tx, product)
            .await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn record_product_view(&self, product: ProductUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .products_repository
            .record_view(&mut tx, product)
            .await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a new category, deriving the slug from the name when absent.
    async fn create_category(&self, category: NewCategory)
    -> Result<Category, CatalogServiceError>;

    /// Retrieves all categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError>;

    /// Retrieve a single category by its slug.
    async fn get_category_by_slug(&self, slug: &str) -> Result<Category, CatalogServiceError>;

    /// Creates a new product. The slug is derived from the name and the
    /// eco score is clamped into [1, 100].
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Updates a product. The eco score is clamped into [1, 100].
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single product by its slug.
    async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CatalogServiceError>;

    /// Retrieves products matching the filter, newest first.
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, CatalogServiceError>;

    /// Remove a product from the catalog. Order item snapshots survive;
    /// their product reference becomes null.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError>;

    /// Increment a product's view counter.
    async fn record_product_view(&self, product: ProductUuid) -> Result<(), CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::catalog::models::CategoryUuid,
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_derives_slug_from_name() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Bamboo Toothbrush", 399, 10, 90))
            .await?;

        assert_eq!(product.slug, "bamboo-toothbrush");
        assert_eq!(product.price, Decimal::new(399, 2));
        assert_eq!(product.stock, 10);

        Ok(())
    }

    #[tokio::test]
    async fn eco_score_is_clamped_at_create() -> TestResult {
        let ctx = TestContext::new().await;

        let low = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Zero Score", 100, 1, 0))
            .await?;
        let high = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Huge Score", 100, 1, 150))
            .await?;

        assert_eq!(low.eco_score, 1);
        assert_eq!(high.eco_score, 100);

        Ok(())
    }

    #[tokio::test]
    async fn eco_score_is_clamped_at_update() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Clamp Me", 100, 1, 50))
            .await?;

        let updated = ctx
            .catalog
            .update_product(
                product.uuid,
                ProductUpdate {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: product.price,
                    stock: product.stock,
                    eco_score: 500,
                    is_active: product.is_active,
                    is_featured: product.is_featured,
                },
            )
            .await?;

        assert_eq!(updated.eco_score, 100);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_product_slug_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.catalog
            .create_product(helpers::new_product(&ctx, "Hemp Tote Bag", 1200, 5, 80))
            .await?;

        let result = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Hemp Tote Bag", 1300, 2, 70))
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_product_by_slug_returns_product() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Solar Charger", 2999, 3, 85))
            .await?;

        let fetched = ctx.catalog.get_product_by_slug("solar-charger").await?;

        assert_eq!(fetched.uuid, created.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_with_unknown_category_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;

        let mut product = helpers::new_product(&ctx, "Orphan", 100, 1, 50);
        product.category_uuid = CategoryUuid::from_uuid(Uuid::now_v7());

        let result = ctx.catalog.create_product(product).await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_active_only_filters_inactive() -> TestResult {
        let ctx = TestContext::new().await;

        let active = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Active", 100, 1, 50))
            .await?;

        let mut inactive = helpers::new_product(&ctx, "Inactive", 100, 1, 50);
        inactive.is_active = false;
        let inactive = ctx.catalog.create_product(inactive).await?;

        let products = ctx
            .catalog
            .list_products(ProductFilter {
                active_only: true,
                ..ProductFilter::default()
            })
            .await?;

        let uuids: Vec<ProductUuid> = products.iter().map(|p| p.uuid).collect();

        assert!(uuids.contains(&active.uuid), "active product missing");
        assert!(!uuids.contains(&inactive.uuid), "inactive product listed");

        Ok(())
    }

    #[tokio::test]
    async fn list_products_by_category() -> TestResult {
        let ctx = TestContext::new().await;

        let other_category = ctx
            .catalog
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: "Garden".to_string(),
                slug: None,
                icon: String::new(),
                description: String::new(),
            })
            .await?;

        let in_default = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "In Default", 100, 1, 50))
            .await?;

        let mut elsewhere = helpers::new_product(&ctx, "Elsewhere", 100, 1, 50);
        elsewhere.category_uuid = other_category.uuid;
        let elsewhere = ctx.catalog.create_product(elsewhere).await?;

        let products = ctx
            .catalog
            .list_products(ProductFilter {
                category: Some(ctx.category_uuid),
                ..ProductFilter::default()
            })
            .await?;

        let uuids: Vec<ProductUuid> = products.iter().map(|p| p.uuid).collect();

        assert!(uuids.contains(&in_default.uuid));
        assert!(!uuids.contains(&elsewhere.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn category_slug_derived_and_fetchable() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .catalog
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: "Home & Kitchen".to_string(),
                slug: None,
                icon: String::new(),
                description: "Everyday essentials".to_string(),
            })
            .await?;

        assert_eq!(created.slug, "home-kitchen");

        let fetched = ctx.catalog.get_category_by_slug("home-kitchen").await?;

        assert_eq!(fetched.uuid, created.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn record_product_view_increments_counter() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Viewed", 100, 1, 50))
            .await?;

        ctx.catalog.record_product_view(product.uuid).await?;
        ctx.catalog.record_product_view(product.uuid).await?;

        let fetched = ctx.catalog.get_product(product.uuid).await?;

        assert_eq!(fetched.views_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_removes_it() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Short Lived", 100, 1, 50))
            .await?;

        ctx.catalog.delete_product(product.uuid).await?;

        let result = ctx.catalog.get_product(product.uuid).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn guarded_decrement_refuses_overdraw() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(helpers::new_product(&ctx, "Scarce", 100, 2, 50))
            .await?;

        let repository = PgProductsRepository::new();
        let mut tx = ctx.db.begin_test_transaction().await;

        let refused = repository.decrement_stock(&mut tx, product.uuid, 3).await?;
        let taken = repository.decrement_stock(&mut tx, product.uuid, 2).await?;

        assert_eq!(refused, 0, "overdraw must not update any row");
        assert_eq!(taken, 1);

        Ok(())
    }
}
