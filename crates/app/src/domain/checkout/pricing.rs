//! Pure pricing arithmetic for checkout.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::checkout::config::CheckoutConfig;

/// Priced breakdown of a cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingQuote {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
}

/// Price a subtotal: tax rounded half-away-from-zero to cents, shipping
/// free at or above the configured threshold.
#[must_use]
pub fn quote(subtotal: Decimal, config: &CheckoutConfig) -> PricingQuote {
    let tax = (subtotal * config.tax_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let shipping_cost = if subtotal >= config.free_shipping_threshold {
        Decimal::ZERO
    } else {
        config.flat_shipping_fee
    };

    PricingQuote {
        subtotal,
        tax,
        shipping_cost,
        total: subtotal + tax + shipping_cost,
    }
}

/// Kilograms of CO2 credited for the eco points earned on an order.
#[must_use]
pub fn co2_saved(eco_points: u64, config: &CheckoutConfig) -> Decimal {
    (Decimal::from(eco_points) * config.co2_per_point)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
