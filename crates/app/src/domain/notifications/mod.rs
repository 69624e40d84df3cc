//! Customer notifications.
//!
//! Checkout and the order ledger hand completed [`Order`]s to a
//! [`NotificationSender`]; delivery runs on a background task and never
//! affects the outcome of the operation that triggered it.

pub mod log;
pub mod sender;
pub mod webhook;

use std::sync::Arc;

use tracing::warn;

use crate::domain::orders::models::Order;

pub use log::LogNotificationSender;
pub use sender::{NotificationError, NotificationSender};
pub use webhook::{WebhookConfig, WebhookNotificationSender};

/// Send an order confirmation on a background task. Failures are logged
/// and swallowed.
pub fn spawn_order_confirmation(sender: Arc<dyn NotificationSender>, order: Order) {
    tokio::spawn(async move {
        if let Err(error) = sender.order_confirmation(&order).await {
            warn!(
                order_number = %order.order_number,
                %error,
                "order confirmation notification failed",
            );
        }
    });
}

/// Send a status update on a background task. Failures are logged and
/// swallowed.
pub fn spawn_status_update(sender: Arc<dyn NotificationSender>, order: Order) {
    tokio::spawn(async move {
        if let Err(error) = sender.status_update(&order).await {
            warn!(
                order_number = %order.order_number,
                status = %order.status,
                %error,
                "status update notification failed",
            );
        }
    });
}
