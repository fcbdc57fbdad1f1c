//! Pricing
//!
//! Pure derived values over the current cart, catalog and active promo.
//! Nothing in here mutates state; callers re-render from the returned totals.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    products::Catalog,
    promotions::{AppliedPromo, Percent},
};

/// Errors that can occur while deriving totals.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A minor-unit amount overflowed or could not be represented.
    #[error("amount arithmetic overflowed or was not representable")]
    AmountConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Derived money values for a cart at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals<'a> {
    item_count: u32,
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> Totals<'a> {
    /// Compute totals for a cart against the catalog and the active promo.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an amount overflows or money arithmetic
    /// fails.
    pub fn compute(
        cart: &Cart,
        catalog: &Catalog<'a>,
        promo: Option<&AppliedPromo>,
    ) -> Result<Self, PricingError> {
        let subtotal = subtotal(cart, catalog)?;

        let discount = match promo {
            Some(promo) => discount_amount(subtotal, promo.percent)?,
            None => Money::from_minor(0, catalog.currency()),
        };

        let total = subtotal.sub(discount)?;

        Ok(Totals {
            item_count: cart.item_count(),
            subtotal,
            discount,
            total,
        })
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Total cost before any discount.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount taken off the subtotal by the active promo.
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable after the discount. Never negative.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Calculates the subtotal of a cart with live catalog prices.
///
/// A line whose product id no longer resolves contributes zero rather than
/// failing the whole computation.
///
/// # Errors
///
/// Returns a [`PricingError::AmountConversion`] if a line amount overflows.
pub fn subtotal<'a>(
    cart: &Cart,
    catalog: &Catalog<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    let mut total_minor = 0i64;

    for item in cart.iter() {
        let Some(product) = catalog.lookup(item.product_id) else {
            continue;
        };

        let line_minor = product
            .price
            .to_minor_units()
            .checked_mul(i64::from(item.quantity))
            .ok_or(PricingError::AmountConversion)?;

        total_minor = total_minor
            .checked_add(line_minor)
            .ok_or(PricingError::AmountConversion)?;
    }

    Ok(Money::from_minor(total_minor, catalog.currency()))
}

/// Calculate the discount amount for a percentage of a subtotal.
///
/// # Errors
///
/// Returns a [`PricingError::AmountConversion`] if the percentage result
/// cannot be represented in minor units.
pub fn discount_amount<'a>(
    subtotal: Money<'a, Currency>,
    percent: Percent,
) -> Result<Money<'a, Currency>, PricingError> {
    let discount_minor = percent_of_minor(percent, subtotal.to_minor_units())?;

    Ok(Money::from_minor(discount_minor, subtotal.currency()))
}

/// Calculate a percentage of a minor-unit amount, rounding midpoints away
/// from zero.
fn percent_of_minor(percent: Percent, minor: i64) -> Result<i64, PricingError> {
    let applied = Decimal::from(percent.value())
        .checked_mul(Decimal::from(minor))
        .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::AmountConversion)?;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::AmountConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::RUB;
    use testresult::TestResult;

    use crate::{cart::LineItem, products::Product, products::ProductId};

    use super::*;

    fn catalog() -> Result<Catalog<'static>, crate::products::CatalogError> {
        Catalog::with_products(
            [
                (
                    ProductId(1),
                    Product {
                        name: "Samurai Honour".to_string(),
                        price: Money::from_minor(45900, RUB),
                        image: None,
                        in_stock: true,
                        category: "combat".to_string(),
                    },
                ),
                (
                    ProductId(2),
                    Product {
                        name: "Moon Shadow".to_string(),
                        price: Money::from_minor(32900, RUB),
                        image: None,
                        in_stock: true,
                        category: "combat".to_string(),
                    },
                ),
            ],
            RUB,
        )
    }

    fn line(id: u32, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId(id),
            quantity,
            name: String::new(),
            unit_price_minor: 0,
            image: None,
        }
    }

    #[test]
    fn subtotal_multiplies_live_prices_by_quantity() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(1, 2));

        assert_eq!(subtotal(&cart, &catalog)?, Money::from_minor(91800, RUB));

        Ok(())
    }

    #[test]
    fn subtotal_of_empty_cart_is_zero() -> TestResult {
        let catalog = catalog()?;
        let cart = Cart::new();

        assert_eq!(subtotal(&cart, &catalog)?, Money::from_minor(0, RUB));

        Ok(())
    }

    #[test]
    fn missing_product_contributes_zero() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(1, 1));
        cart.push(line(99, 3));

        assert_eq!(subtotal(&cart, &catalog)?, Money::from_minor(45900, RUB));

        Ok(())
    }

    #[test]
    fn fifteen_percent_discount_rounds_like_the_storefront() -> TestResult {
        // 91800 * 0.15 = 13770 exactly.
        let discount = discount_amount(Money::from_minor(91800, RUB), Percent::new(15)?)?;

        assert_eq!(discount, Money::from_minor(13770, RUB));

        Ok(())
    }

    #[test]
    fn midpoint_rounds_away_from_zero() -> TestResult {
        // 25 * 0.10 = 2.5, which rounds up to 3.
        assert_eq!(percent_of_minor(Percent::new(10)?, 25)?, 3);

        Ok(())
    }

    #[test]
    fn totals_subtract_discount_from_subtotal() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(1, 2));

        let promo = AppliedPromo {
            code: "KATANA2023".to_string(),
            percent: Percent::new(15)?,
        };

        let totals = Totals::compute(&cart, &catalog, Some(&promo))?;

        assert_eq!(totals.item_count(), 2);
        assert_eq!(totals.subtotal(), Money::from_minor(91800, RUB));
        assert_eq!(totals.discount(), Money::from_minor(13770, RUB));
        assert_eq!(totals.total(), Money::from_minor(78030, RUB));

        Ok(())
    }

    #[test]
    fn totals_without_promo_have_zero_discount() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(2, 1));

        let totals = Totals::compute(&cart, &catalog, None)?;

        assert_eq!(totals.discount(), Money::from_minor(0, RUB));
        assert_eq!(totals.total(), totals.subtotal());

        Ok(())
    }

    #[test]
    fn full_discount_never_exceeds_subtotal() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(1, 3));

        let promo = AppliedPromo {
            code: "EVERYTHING".to_string(),
            percent: Percent::new(100)?,
        };

        let totals = Totals::compute(&cart, &catalog, Some(&promo))?;

        assert_eq!(totals.discount(), totals.subtotal());
        assert_eq!(totals.total(), Money::from_minor(0, RUB));

        Ok(())
    }
}
