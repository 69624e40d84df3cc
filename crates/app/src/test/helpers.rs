//! Test Helpers

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::{
    domain::{
        carts::{CartsService, models::CartOwner},
        catalog::{
            CatalogService, CatalogServiceError,
            models::{NewProduct, Product, ProductUuid},
        },
        checkout::CheckoutService,
        notifications::{NotificationError, NotificationSender},
        orders::models::{Order, OrderStatus, ShippingDetails},
        users::models::{NewUser, UserRole, UserUuid},
    },
    test::TestContext,
};

pub(crate) fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        username: username.to_string(),
        email: email.to_string(),
        role: UserRole::Customer,
        phone: Some("+1 555 010 0200".to_string()),
        address: Some("12 Willow Lane".to_string()),
        city: Some("Portland".to_string()),
        country: Some("USA".to_string()),
        postal_code: Some("97201".to_string()),
    }
}

/// A product in the context's seeded category, priced in cents.
pub(crate) fn new_product(
    ctx: &TestContext,
    name: &str,
    price_cents: i64,
    stock: u32,
    eco_score: u32,
) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        description: String::new(),
        category_uuid: ctx.category_uuid,
        seller_uuid: ctx.seller_uuid,
        price: Decimal::new(price_cents, 2),
        stock,
        eco_score,
        is_active: true,
        is_featured: false,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price_cents: i64,
    stock: u32,
    eco_score: u32,
) -> Result<Product, CatalogServiceError> {
    ctx.catalog
        .create_product(new_product(ctx, name, price_cents, stock, eco_score))
        .await
}

pub(crate) fn shipping_details() -> ShippingDetails {
    ShippingDetails {
        name: "Eco Customer".to_string(),
        email: "customer@example.com".to_string(),
        phone: "+1 555 010 0200".to_string(),
        address: "12 Willow Lane".to_string(),
        city: "Portland".to_string(),
        country: "USA".to_string(),
        postal_code: "97201".to_string(),
    }
}

/// Create a product, cart one unit of it for the context user and check
/// out. Returns the placed order and the product it bought.
pub(crate) async fn place_order(ctx: &TestContext, product_name: &str) -> (Order, Product) {
    let product = create_product(ctx, product_name, 1500, 5, 80)
        .await
        .expect("Failed to create product for order");

    ctx.carts
        .add_item(&CartOwner::User(ctx.user_uuid), product.uuid, 1)
        .await
        .expect("Failed to cart product for order");

    let order = ctx
        .checkout
        .place_order(ctx.user_uuid, shipping_details(), "")
        .await
        .expect("Failed to place order");

    (order, product)
}

/// What a [`RecordingSender`] saw.
#[derive(Debug)]
pub(crate) enum RecordedNotification {
    Confirmation {
        order_number: String,
    },
    StatusUpdate {
        order_number: String,
        status: OrderStatus,
    },
}

/// Sender that forwards every notification onto a channel so tests can
/// await dispatches from spawned tasks without sleeping.
pub(crate) struct RecordingSender {
    tx: mpsc::UnboundedSender<RecordedNotification>,
}

impl RecordingSender {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<RecordedNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (Self { tx }, rx)
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn order_confirmation(&self, order: &Order) -> Result<(), NotificationError> {
        let _ = self.tx.send(RecordedNotification::Confirmation {
            order_number: order.order_number.clone(),
        });

        Ok(())
    }

    async fn status_update(&self, order: &Order) -> Result<(), NotificationError> {
        let _ = self.tx.send(RecordedNotification::StatusUpdate {
            order_number: order.order_number.clone(),
            status: order.status,
        });

        Ok(())
    }
}

/// Sender that always fails, for asserting delivery problems never leak
/// into the triggering operation.
pub(crate) struct FailingSender;

#[async_trait]
impl NotificationSender for FailingSender {
    async fn order_confirmation(&self, _order: &Order) -> Result<(), NotificationError> {
        Err(NotificationError::UnexpectedResponse(
            "mail endpoint unavailable".to_string(),
        ))
    }

    async fn status_update(&self, _order: &Order) -> Result<(), NotificationError> {
        Err(NotificationError::UnexpectedResponse(
            "mail endpoint unavailable".to_string(),
        ))
    }
}
