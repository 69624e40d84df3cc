//! Notification sender seam.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::orders::models::Order;

/// Errors a sender implementation can report.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The delivery endpoint returned a non-2xx response.
    #[error("unexpected response from notification endpoint: {0}")]
    UnexpectedResponse(String),
}

/// Outbound customer notifications. Implementations must be cheap to
/// call from a spawned task; retries and queueing live behind this seam.
#[automock]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Notify the customer that their order was placed.
    async fn order_confirmation(&self, order: &Order) -> Result<(), NotificationError>;

    /// Notify the customer that their order changed status.
    async fn status_update(&self, order: &Order) -> Result<(), NotificationError>;
}
