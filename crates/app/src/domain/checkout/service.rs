//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{
            models::{CartOwner, CheckoutLine},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        catalog::repositories::PgProductsRepository,
        checkout::{config::CheckoutConfig, errors::CheckoutError, pricing},
        notifications::{self, NotificationSender},
        orders::{
            models::{Order, OrderItemUuid, OrderStatus, OrderUuid, ShippingDetails},
            number,
            repositories::{
                InsertOrder, InsertOrderItem, PgOrderItemsRepository, PgOrdersRepository,
            },
        },
        users::{models::UserUuid, repository::PgUsersRepository},
    },
};

/// Random order numbers collide with probability 2^-32 per attempt; this
/// bounds the lookup loop all the same.
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 4;

pub struct PgCheckoutService {
    db: Db,
    config: CheckoutConfig,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    orders_repository: PgOrdersRepository,
    order_items_repository: PgOrderItemsRepository,
    users_repository: PgUsersRepository,
    sender: Arc<dyn NotificationSender>,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, config: CheckoutConfig, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            db,
            config,
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            order_items_repository: PgOrderItemsRepository::new(),
            users_repository: PgUsersRepository::new(),
            sender,
        }
    }

    /// Pick an order number not yet present in the ledger. Runs inside the
    /// checkout transaction; the unique index remains the final arbiter.
    async fn allocate_order_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, CheckoutError> {
        for _ in 0..MAX_ORDER_NUMBER_ATTEMPTS {
            let candidate = number::generate();

            if !self
                .orders_repository
                .order_number_exists(tx, &candidate)
                .await?
            {
                return Ok(candidate);
            }
        }

        Err(CheckoutError::OrderNumberExhausted)
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn place_order(
        &self,
        user: UserUuid,
        shipping: ShippingDetails,
        notes: &str,
    ) -> Result<Order, CheckoutError> {
        shipping.validate().map_err(CheckoutError::InvalidShipping)?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart_by_owner(&mut tx, &CartOwner::User(user))
            .await?
            .ok_or(CheckoutError::EmptyCart)?;

        // Locks every product row in the cart until commit or rollback.
        let lines = self
            .cart_items_repository
            .get_checkout_lines(&mut tx, cart.uuid)
            .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Fail fast before any write.
        for line in &lines {
            if line.stock < line.quantity {
                return Err(insufficient(line));
            }
        }

        let subtotal = lines.iter().map(CheckoutLine::subtotal).sum();
        let eco_points: u64 = lines.iter().map(CheckoutLine::eco_points).sum();

        let priced = pricing::quote(subtotal, &self.config);
        let co2_saved = pricing::co2_saved(eco_points, &self.config);

        let order_number = self.allocate_order_number(&mut tx).await?;
        let order_uuid = OrderUuid::new();

        self.orders_repository
            .create_order(
                &mut tx,
                InsertOrder {
                    uuid: order_uuid,
                    order_number: &order_number,
                    user,
                    status: OrderStatus::Pending,
                    shipping: &shipping,
                    subtotal: priced.subtotal,
                    tax: priced.tax,
                    shipping_cost: priced.shipping_cost,
                    total: priced.total,
                    eco_points_earned: eco_points,
                    co2_saved,
                    notes,
                },
            )
            .await?;

        for line in &lines {
            self.order_items_repository
                .create_order_item(
                    &mut tx,
                    InsertOrderItem {
                        uuid: OrderItemUuid::new(),
                        order: order_uuid,
                        product: line.product_uuid,
                        product_name: &line.product_name,
                        product_price: line.unit_price,
                        eco_score: line.eco_score,
                        quantity: line.quantity,
                    },
                )
                .await?;

            let rows_affected = self
                .products_repository
                .decrement_stock(&mut tx, line.product_uuid, line.quantity)
                .await?;

            // The rows are locked, so this only fires if the fail-fast
            // check itself raced a concurrent commit.
            if rows_affected == 0 {
                return Err(insufficient(line));
            }
        }

        let rows_affected = self
            .users_repository
            .credit_loyalty(&mut tx, user, eco_points, co2_saved)
            .await?;

        if rows_affected == 0 {
            return Err(CheckoutError::UserNotFound);
        }

        self.cart_items_repository
            .clear_items(&mut tx, cart.uuid)
            .await?;

        let mut order = self.orders_repository.get_order(&mut tx, order_uuid).await?;
        order.items = self
            .order_items_repository
            .get_order_items(&mut tx, order_uuid)
            .await?;

        tx.commit().await?;

        info!(
            order_number = %order.order_number,
            total = %order.total,
            eco_points,
            "order placed",
        );

        notifications::spawn_order_confirmation(Arc::clone(&self.sender), order.clone());

        Ok(order)
    }
}

fn insufficient(line: &CheckoutLine) -> CheckoutError {
    CheckoutError::InsufficientStock {
        product: line.product_name.clone(),
        available: line.stock,
        requested: line.quantity,
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Convert the user's cart into a pending order in one transaction:
    /// snapshot every line, decrement stock, credit loyalty, clear the
    /// cart. Leaves no trace on failure; sends a confirmation after
    /// commit.
    async fn place_order(
        &self,
        user: UserUuid,
        shipping: ShippingDetails,
        notes: &str,
    ) -> Result<Order, CheckoutError>;
}
