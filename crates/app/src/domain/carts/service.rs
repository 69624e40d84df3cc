//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItem, CartItemUuid, CartOwner, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        catalog::{models::ProductUuid, repositories::PgProductsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn find_or_create_cart(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner: &CartOwner,
    ) -> Result<Cart, CartsServiceError> {
        self.carts_repository
            .insert_cart(tx, CartUuid::new(), owner)
            .await?;

        self.carts_repository
            .find_cart_by_owner(tx, owner)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_or_create(&self, owner: &CartOwner) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.find_or_create_cart(&mut tx, owner).await?;

        let items = self.items_repository.get_cart_items(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(cart)
    }

    async fn get_cart(&self, owner: &CartOwner) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self
            .carts_repository
            .find_cart_by_owner(&mut tx, owner)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let items = self.items_repository.get_cart_items(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(cart)
    }

    async fn add_item(
        &self,
        owner: &CartOwner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let cart = self.find_or_create_cart(&mut tx, owner).await?;

        let product = self.products_repository.get_product(&mut tx, product).await?;

        // Inactive products are not purchasable.
        if !product.is_active {
            return Err(CartsServiceError::NotFound);
        }

        if product.stock < quantity {
            return Err(CartsServiceError::OutOfStock {
                available: product.stock,
            });
        }

        let item_uuid = self
            .items_repository
            .upsert_item(&mut tx, cart.uuid, CartItemUuid::new(), product.uuid, quantity)
            .await?;

        let item = self
            .items_repository
            .get_item(&mut tx, cart.uuid, item_uuid)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn change_quantity(
        &self,
        owner: &CartOwner,
        item: CartItemUuid,
        delta: i32,
    ) -> Result<Option<CartItem>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart_by_owner(&mut tx, owner)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let current = self
            .items_repository
            .get_item_for_update(&mut tx, cart.uuid, item)
            .await?;

        let new_quantity = i64::from(current.quantity) + i64::from(delta);

        if new_quantity <= 0 {
            self.items_repository
                .delete_item(&mut tx, cart.uuid, item)
                .await?;

            tx.commit().await?;

            return Ok(None);
        }

        if delta > 0 && new_quantity > i64::from(current.stock) {
            return Err(CartsServiceError::StockExceeded {
                available: current.stock,
            });
        }

        // Bounds checked above; new_quantity is in 1..=stock.
        let new_quantity = u32::try_from(new_quantity).map_err(|_| CartsServiceError::InvalidData)?;

        self.items_repository
            .set_quantity(&mut tx, cart.uuid, item, new_quantity)
            .await?;

        let updated = self
            .items_repository
            .get_item(&mut tx, cart.uuid, item)
            .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn remove_item(
        &self,
        owner: &CartOwner,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart_by_owner(&mut tx, owner)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let rows_affected = self
            .items_repository
            .delete_item(&mut tx, cart.uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn clear(&self, owner: &CartOwner) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart_by_owner(&mut tx, owner)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        self.items_repository.clear_items(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Return the owner's single cart, creating it on first access.
    async fn get_or_create(&self, owner: &CartOwner) -> Result<Cart, CartsServiceError>;

    /// Retrieve the owner's cart with items and live totals.
    async fn get_cart(&self, owner: &CartOwner) -> Result<Cart, CartsServiceError>;

    /// Add a product to the cart. Adding a product already present merges
    /// into the existing line instead of duplicating it.
    async fn add_item(
        &self,
        owner: &CartOwner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError>;

    /// Adjust a line's quantity by `delta`. Dropping to zero removes the
    /// line and returns `None`.
    async fn change_quantity(
        &self,
        owner: &CartOwner,
        item: CartItemUuid,
        delta: i32,
    ) -> Result<Option<CartItem>, CartsServiceError>;

    /// Remove a single line from the cart.
    async fn remove_item(
        &self,
        owner: &CartOwner,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Remove every line from the cart; the cart itself survives.
    async fn clear(&self, owner: &CartOwner) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::catalog::{CatalogService, models::ProductUpdate},
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn get_or_create_returns_same_cart_for_user() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let first = ctx.carts.get_or_create(&owner).await?;
        let second = ctx.carts.get_or_create(&owner).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(first.owner, owner);

        Ok(())
    }

    #[tokio::test]
    async fn get_or_create_returns_same_cart_for_session() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::Session("anon-session-1".to_string());

        let first = ctx.carts.get_or_create(&owner).await?;
        let second = ctx.carts.get_or_create(&owner).await?;

        assert_eq!(first.uuid, second.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn user_and_session_carts_are_distinct() -> TestResult {
        let ctx = TestContext::new().await;

        let user_cart = ctx
            .carts
            .get_or_create(&CartOwner::User(ctx.user_uuid))
            .await?;
        let session_cart = ctx
            .carts
            .get_or_create(&CartOwner::Session("anon-session-2".to_string()))
            .await?;

        assert!(user_cart.uuid != session_cart.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_twice_merges_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let product = helpers::create_product(&ctx, "Beeswax Wraps", 899, 10, 75).await?;

        let first = ctx.carts.add_item(&owner, product.uuid, 2).await?;
        let second = ctx.carts.add_item(&owner, product.uuid, 3).await?;

        assert_eq!(first.uuid, second.uuid, "should reuse the same line");
        assert_eq!(second.quantity, 5);

        let cart = ctx.carts.get_cart(&owner).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_items, 5);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_beyond_stock_is_rejected_and_leaves_state_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let product = helpers::create_product(&ctx, "Limited", 500, 3, 60).await?;

        let result = ctx.carts.add_item(&owner, product.uuid, 4).await;

        assert!(
            matches!(result, Err(CartsServiceError::OutOfStock { available: 3 })),
            "expected OutOfStock, got {result:?}"
        );

        let cart = ctx.carts.get_or_create(&owner).await?;
        let unchanged = ctx.catalog.get_product(product.uuid).await?;

        assert!(cart.items.is_empty(), "rejected add must not touch the cart");
        assert_eq!(unchanged.stock, 3, "rejected add must not touch stock");

        Ok(())
    }

    #[tokio::test]
    async fn add_inactive_product_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let mut new_product = helpers::new_product(&ctx, "Retired", 500, 3, 60);
        new_product.is_active = false;
        let product = ctx.catalog.create_product(new_product).await?;

        let result = ctx.carts.add_item(&owner, product.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn totals_follow_live_product_price() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let product = helpers::create_product(&ctx, "Repriced", 1000, 10, 50).await?;

        ctx.carts.add_item(&owner, product.uuid, 2).await?;

        let before = ctx.carts.get_cart(&owner).await?;
        assert_eq!(before.total_price, Decimal::new(2000, 2));

        ctx.catalog
            .update_product(
                product.uuid,
                ProductUpdate {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: Decimal::new(1500, 2),
                    stock: product.stock,
                    eco_score: product.eco_score,
                    is_active: true,
                    is_featured: false,
                },
            )
            .await?;

        let after = ctx.carts.get_cart(&owner).await?;
        assert_eq!(after.total_price, Decimal::new(3000, 2));

        Ok(())
    }

    #[tokio::test]
    async fn totals_sum_price_and_eco_points() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let a = helpers::create_product(&ctx, "Product A", 1299, 10, 95).await?;
        let b = helpers::create_product(&ctx, "Product B", 2499, 10, 94).await?;

        ctx.carts.add_item(&owner, a.uuid, 2).await?;
        ctx.carts.add_item(&owner, b.uuid, 1).await?;

        let cart = ctx.carts.get_cart(&owner).await?;

        assert_eq!(cart.total_items, 3);
        assert_eq!(cart.total_price, Decimal::new(5097, 2));
        assert_eq!(cart.total_eco_points, 284);

        Ok(())
    }

    #[tokio::test]
    async fn increase_beyond_stock_returns_stock_exceeded() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let product = helpers::create_product(&ctx, "Scarce", 500, 2, 60).await?;

        let item = ctx.carts.add_item(&owner, product.uuid, 2).await?;

        let result = ctx.carts.change_quantity(&owner, item.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::StockExceeded { available: 2 })),
            "expected StockExceeded, got {result:?}"
        );

        let cart = ctx.carts.get_cart(&owner).await?;
        assert_eq!(cart.total_items, 2, "rejected change must leave quantity");

        Ok(())
    }

    #[tokio::test]
    async fn decrease_to_zero_removes_item() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let product = helpers::create_product(&ctx, "Single", 500, 5, 60).await?;

        let item = ctx.carts.add_item(&owner, product.uuid, 1).await?;

        let removed = ctx.carts.change_quantity(&owner, item.uuid, -1).await?;

        assert!(removed.is_none());

        let cart = ctx.carts.get_cart(&owner).await?;
        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_and_clear() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let a = helpers::create_product(&ctx, "Keep", 500, 5, 60).await?;
        let b = helpers::create_product(&ctx, "Drop", 700, 5, 70).await?;

        let kept = ctx.carts.add_item(&owner, a.uuid, 1).await?;
        let dropped = ctx.carts.add_item(&owner, b.uuid, 1).await?;

        ctx.carts.remove_item(&owner, dropped.uuid).await?;

        let cart = ctx.carts.get_cart(&owner).await?;
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].uuid, kept.uuid);

        ctx.carts.clear(&owner).await?;

        let cart = ctx.carts.get_cart(&owner).await?;
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_price, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn remove_unknown_item_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        ctx.carts.get_or_create(&owner).await?;

        let result = ctx.carts.remove_item(&owner, CartItemUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_zero_quantity_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::User(ctx.user_uuid);

        let product = helpers::create_product(&ctx, "Nothing", 500, 5, 60).await?;

        let result = ctx.carts.add_item(&owner, product.uuid, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }
}
