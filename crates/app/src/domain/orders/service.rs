//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        notifications::{self, NotificationSender},
        orders::{
            errors::OrdersServiceError,
            models::{Order, OrderStatus, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        users::models::UserUuid,
    },
};

pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    sender: Arc<dyn NotificationSender>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            sender,
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn get_order(
        &self,
        user: UserUuid,
        order_number: &str,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self
            .orders_repository
            .get_order_by_number(&mut tx, user, order_number)
            .await?;

        order.items = self
            .items_repository
            .get_order_items(&mut tx, order.uuid)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders_repository.list_orders(&mut tx, user).await?;

        for order in &mut orders {
            order.items = self
                .items_repository
                .get_order_items(&mut tx, order.uuid)
                .await?;
        }

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .orders_repository
            .update_status(&mut tx, order, status)
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        let mut updated = self.orders_repository.get_order(&mut tx, order).await?;

        updated.items = self
            .items_repository
            .get_order_items(&mut tx, order)
            .await?;

        tx.commit().await?;

        if status.notifies_customer() {
            notifications::spawn_status_update(Arc::clone(&self.sender), updated.clone());
        }

        Ok(updated)
    }

    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.orders_repository.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Fetch one of the user's orders by order number, items included.
    /// Another user's order number yields `NotFound`.
    async fn get_order(
        &self,
        user: UserUuid,
        order_number: &str,
    ) -> Result<Order, OrdersServiceError>;

    /// The user's orders, newest first, items included.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Set an order's status. Transitions are unrestricted; `Shipped` and
    /// `Delivered` dispatch a best-effort customer notification.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;

    /// Remove an order and its items from the ledger. Staff only; the
    /// caller enforces authorization.
    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError>;
}
