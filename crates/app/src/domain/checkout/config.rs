//! Checkout configuration.

use rust_decimal::Decimal;

/// Pricing and loyalty knobs for checkout. All monetary values carry two
/// decimal places.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Tax applied to the cart subtotal.
    pub tax_rate: Decimal,

    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Decimal,

    /// Flat fee charged below the threshold.
    pub flat_shipping_fee: Decimal,

    /// Kilograms of CO2 credited per eco point earned.
    pub co2_per_point: Decimal,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(13, 2),
            free_shipping_threshold: Decimal::new(5000, 2),
            flat_shipping_fee: Decimal::new(500, 2),
            co2_per_point: Decimal::new(1, 2),
        }
    }
}
