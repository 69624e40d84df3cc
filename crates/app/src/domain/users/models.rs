//! User Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// Fixed role set. Staff roles drive the order-ledger mutations the
/// storefront itself never performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Supervisor,
    Customer,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Customer => "customer",
        }
    }

    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Supervisor)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UserRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "customer" => Ok(Self::Customer),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

/// User Model
#[derive(Debug, Clone)]
pub struct User {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    /// Loyalty points; monotonic, credited only by checkout.
    pub eco_points: u64,
    pub total_orders: u32,
    /// Cumulative CO2 saved in kilograms.
    pub co2_saved: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New User Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}
