//! Order Models

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        catalog::models::ProductUuid,
        users::models::{User, UserUuid},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order lifecycle status, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses whose transitions notify the customer.
    #[must_use]
    pub fn notifies_customer(&self) -> bool {
        matches!(self, Self::Shipped | Self::Delivered)
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipping details captured at checkout and snapshotted onto the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

impl ShippingDetails {
    /// Validate presence and basic format, returning the first offending
    /// field name.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name");
        }

        let email = self.email.trim();
        let email_ok = email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
        if !email_ok {
            return Err("email");
        }

        if self.phone.chars().filter(|c| c.is_ascii_digit()).count() < 7 {
            return Err("phone");
        }

        if self.address.trim().is_empty() {
            return Err("address");
        }

        if self.city.trim().is_empty() {
            return Err("city");
        }

        if self.country.trim().is_empty() {
            return Err("country");
        }

        if self.postal_code.trim().is_empty() {
            return Err("postal_code");
        }

        Ok(())
    }

    /// Prefill from the user's saved profile; missing fields come back
    /// blank for the caller to complete.
    #[must_use]
    pub fn prefill(user: &User) -> Self {
        Self {
            name: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
            city: user.city.clone().unwrap_or_default(),
            country: user.country.clone().unwrap_or_default(),
            postal_code: user.postal_code.clone().unwrap_or_default(),
        }
    }
}

/// Order Model
///
/// Pricing and loyalty fields are written once at creation; only `status`
/// and `updated_at` change afterwards.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub status: OrderStatus,
    pub shipping: ShippingDetails,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub eco_points_earned: u64,
    pub co2_saved: Decimal,
    pub notes: String,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// OrderItem Model
///
/// A point-in-time snapshot of a product at purchase. The product
/// reference goes `None` if the product is later deleted; the
/// denormalized fields keep history stable.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: Option<ProductUuid>,
    pub product_name: String,
    pub product_price: Decimal,
    pub eco_score: u32,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product_price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::domain::users::models::UserRole;

    use super::*;

    fn details() -> ShippingDetails {
        ShippingDetails {
            name: "Alice Green".to_string(),
            email: "alice@example.com".to_string(),
            phone: "+1 555 0100 200".to_string(),
            address: "12 Willow Lane".to_string(),
            city: "Portland".to_string(),
            country: "USA".to_string(),
            postal_code: "97201".to_string(),
        }
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::try_from(status.as_str()), Ok(status));
        }

        assert!(OrderStatus::try_from("refunded").is_err());
    }

    #[test]
    fn only_shipped_and_delivered_notify() {
        assert!(OrderStatus::Shipped.notifies_customer());
        assert!(OrderStatus::Delivered.notifies_customer());
        assert!(!OrderStatus::Pending.notifies_customer());
        assert!(!OrderStatus::Processing.notifies_customer());
        assert!(!OrderStatus::Cancelled.notifies_customer());
    }

    #[test]
    fn complete_details_validate() {
        assert_eq!(details().validate(), Ok(()));
    }

    #[test]
    fn blank_fields_are_rejected_by_name() {
        let mut d = details();
        d.name = "   ".to_string();
        assert_eq!(d.validate(), Err("name"));

        let mut d = details();
        d.city = String::new();
        assert_eq!(d.validate(), Err("city"));

        let mut d = details();
        d.postal_code = String::new();
        assert_eq!(d.validate(), Err("postal_code"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["plainaddress", "missing@dot", "@example.com", "a@.com"] {
            let mut d = details();
            d.email = email.to_string();
            assert_eq!(d.validate(), Err("email"), "{email}");
        }
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut d = details();
        d.phone = "12345".to_string();
        assert_eq!(d.validate(), Err("phone"));
    }

    #[test]
    fn prefill_copies_profile_and_blanks_missing_fields() {
        let user = User {
            uuid: UserUuid::new(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::Customer,
            phone: Some("+1 555 0100 200".to_string()),
            address: Some("12 Willow Lane".to_string()),
            city: None,
            country: Some("USA".to_string()),
            postal_code: None,
            eco_points: 0,
            total_orders: 0,
            co2_saved: Decimal::ZERO,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };

        let prefilled = ShippingDetails::prefill(&user);

        assert_eq!(prefilled.name, "alice");
        assert_eq!(prefilled.email, "alice@example.com");
        assert_eq!(prefilled.address, "12 Willow Lane");
        assert_eq!(prefilled.city, "");
        assert_eq!(prefilled.postal_code, "");

        // Prefilled-but-incomplete details still need the missing fields.
        assert_eq!(prefilled.validate(), Err("city"));
    }

    #[test]
    fn order_item_subtotal_scales_with_quantity() {
        let item = OrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: Some(ProductUuid::new()),
            product_name: "Bamboo Toothbrush".to_string(),
            product_price: Decimal::new(399, 2),
            eco_score: 90,
            quantity: 4,
        };

        assert_eq!(item.subtotal(), Decimal::new(1596, 2));
    }
}
