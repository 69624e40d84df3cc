//! Webhook notification sender.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    notifications::sender::{NotificationError, NotificationSender},
    orders::models::Order,
};

/// Configuration for the webhook delivery endpoint.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint URL, e.g. `"https://mailer.internal/notify"`.
    pub endpoint: String,

    /// Bearer token presented on every request.
    pub token: String,
}

/// Sender that POSTs a JSON payload per notification to a configured
/// endpoint. The endpoint owns templating and actual e-mail delivery.
#[derive(Debug, Clone)]
pub struct WebhookNotificationSender {
    config: WebhookConfig,
    http: Client,
}

#[derive(Debug, Serialize)]
struct OrderPayload<'a> {
    event: &'static str,
    order_number: &'a str,
    status: &'a str,
    email: &'a str,
    name: &'a str,
    total: Decimal,
    eco_points_earned: u64,
    co2_saved: Decimal,
}

impl<'a> OrderPayload<'a> {
    fn new(event: &'static str, order: &'a Order) -> Self {
        Self {
            event,
            order_number: &order.order_number,
            status: order.status.as_str(),
            email: &order.shipping.email,
            name: &order.shipping.name,
            total: order.total,
            eco_points_earned: order.eco_points_earned,
            co2_saved: order.co2_saved,
        }
    }
}

impl WebhookNotificationSender {
    /// Create a new sender from the given configuration.
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn post(&self, payload: &OrderPayload<'_>) -> Result<(), NotificationError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.token)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotificationError::UnexpectedResponse(format!(
                "notify request failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationSender for WebhookNotificationSender {
    async fn order_confirmation(&self, order: &Order) -> Result<(), NotificationError> {
        self.post(&OrderPayload::new("order_confirmation", order)).await
    }

    async fn status_update(&self, order: &Order) -> Result<(), NotificationError> {
        self.post(&OrderPayload::new("status_update", order)).await
    }
}
