//! Order number generation.

use rand::RngCore;

/// Prefix shared by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "ECO-";

/// Generate a candidate order number: `ECO-` followed by eight uppercase
/// hex characters. Uniqueness is enforced by the caller against the
/// database, not here.
#[must_use]
pub fn generate() -> String {
    let suffix = rand::thread_rng().next_u32();

    format!("{ORDER_NUMBER_PREFIX}{suffix:08X}")
}
