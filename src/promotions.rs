//! Promotions
//!
//! Promo codes map a case-insensitive code string to an integral percentage
//! discount. The table is static configuration injected into the cart store,
//! so alternate rule sets can be substituted without touching cart logic.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to promo-code configuration.
#[derive(Debug, Error)]
pub enum PromotionError {
    /// A discount percentage was outside `0..=100`.
    #[error("Discount percent {0} is outside 0..=100")]
    PercentOutOfRange(u8),
}

/// An integral discount percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percent(u8);

impl Percent {
    /// Create a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `PromotionError::PercentOutOfRange` for values above 100.
    pub fn new(value: u8) -> Result<Self, PromotionError> {
        if value > 100 {
            return Err(PromotionError::PercentOutOfRange(value));
        }

        Ok(Percent(value))
    }

    /// Get the raw percentage points.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = PromotionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// The promo code currently applied to the session, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromo {
    /// Normalized (uppercase) code.
    pub code: String,

    /// Discount percentage granted by the code.
    pub percent: Percent,
}

/// Static mapping from promo code to discount percentage.
///
/// Codes are matched case-insensitively; the table stores them uppercased.
#[derive(Debug, Clone, Default)]
pub struct PromoCodeTable {
    codes: FxHashMap<String, Percent>,
}

impl PromoCodeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        PromoCodeTable::default()
    }

    /// Build a table from `(code, percent)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `PromotionError::PercentOutOfRange` if any percentage is
    /// above 100.
    pub fn with_codes<'a>(
        codes: impl IntoIterator<Item = (&'a str, u8)>,
    ) -> Result<Self, PromotionError> {
        let mut table = PromoCodeTable::new();

        for (code, percent) in codes {
            table.insert(code, Percent::new(percent)?);
        }

        Ok(table)
    }

    /// Register a code. Re-inserting a code replaces its percentage.
    pub fn insert(&mut self, code: &str, percent: Percent) {
        self.codes.insert(normalize(code), percent);
    }

    /// Look up a code, ignoring case and surrounding whitespace.
    ///
    /// Returns the normalized code alongside its percentage.
    pub fn lookup(&self, code: &str) -> Option<AppliedPromo> {
        let normalized = normalize(code);

        self.codes.get(&normalized).map(|&percent| AppliedPromo {
            code: normalized,
            percent,
        })
    }

    /// Get the number of registered codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if the table has no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Canonical form of a code: trimmed and uppercased.
fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}
