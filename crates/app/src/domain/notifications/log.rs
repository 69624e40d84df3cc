//! Logging notification sender.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{
    notifications::sender::{NotificationError, NotificationSender},
    orders::models::Order,
};

/// Sender that only logs. The default when no webhook is configured;
/// always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn order_confirmation(&self, order: &Order) -> Result<(), NotificationError> {
        info!(
            order_number = %order.order_number,
            email = %order.shipping.email,
            total = %order.total,
            "order confirmation",
        );

        Ok(())
    }

    async fn status_update(&self, order: &Order) -> Result<(), NotificationError> {
        info!(
            order_number = %order.order_number,
            email = %order.shipping.email,
            status = %order.status,
            "order status update",
        );

        Ok(())
    }
}
