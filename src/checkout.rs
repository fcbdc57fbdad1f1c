//! Checkout
//!
//! Order submission is simulated: there is no backend, so acceptance always
//! succeeds once the cart is non-empty. The confirmation carries a generated
//! reference and the totals frozen at submission time.

use std::fmt;

use rand::Rng;

use crate::pricing::Totals;

/// Contact details collected from the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    /// Customer name.
    pub name: String,

    /// Customer phone number.
    pub phone: String,

    /// Email the (simulated) confirmation is addressed to.
    pub email: String,
}

/// Reference assigned to a simulated accepted order, e.g. `#0042`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReference(String);

impl OrderReference {
    /// Generate a random reference in `#0000..=#9999`.
    #[must_use]
    pub fn generate() -> Self {
        let number: u16 = rand::thread_rng().gen_range(0..10_000);

        OrderReference(format!("#{number:04}"))
    }

    /// Get the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation<'a> {
    /// Generated order reference.
    pub reference: OrderReference,

    /// Email the confirmation is addressed to.
    pub email: String,

    /// Totals at the moment of submission.
    pub totals: Totals<'a>,
}
