//! Products

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product's currency differs from the catalog currency (id, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Two products were registered under the same id.
    #[error("Product id {0} is already registered")]
    DuplicateId(ProductId),
}

/// Product identifier, assigned by the catalog data source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'a, Currency>,

    /// Image reference, if any
    pub image: Option<String>,

    /// Whether the product can currently be ordered
    pub in_stock: bool,

    /// Product category
    pub category: String,
}

/// Read-only product catalog, keyed by externally assigned ids.
///
/// The catalog is static for the lifetime of a session; the cart never
/// mutates it and always re-reads prices from it.
#[derive(Debug)]
pub struct Catalog<'a> {
    products: FxHashMap<ProductId, Product<'a>>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create a new empty catalog with the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            products: FxHashMap::default(),
            currency,
        }
    }

    /// Create a new catalog from `(id, product)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on duplicate ids or a currency mismatch.
    pub fn with_products(
        products: impl IntoIterator<Item = (ProductId, Product<'a>)>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new(currency);

        for (id, product) in products {
            catalog.insert(id, product)?;
        }

        Ok(catalog)
    }

    /// Register a product under the given id.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the id is already taken or the product's
    /// currency differs from the catalog currency.
    pub fn insert(&mut self, id: ProductId, product: Product<'a>) -> Result<(), CatalogError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.products.contains_key(&id) {
            return Err(CatalogError::DuplicateId(id));
        }

        self.products.insert(id, product);

        Ok(())
    }

    /// Look up a product by id.
    pub fn lookup(&self, id: ProductId) -> Option<&Product<'a>> {
        self.products.get(&id)
    }

    /// Iterate over the products in the catalog.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, &Product<'a>)> {
        self.products.iter().map(|(id, product)| (*id, product))
    }

    /// Get the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{RUB, USD};
    use testresult::TestResult;

    use super::*;

    fn product(name: &str, minor: i64, in_stock: bool) -> Product<'static> {
        Product {
            name: name.to_string(),
            price: Money::from_minor(minor, RUB),
            image: None,
            in_stock,
            category: "combat".to_string(),
        }
    }

    #[test]
    fn with_products_registers_all() -> TestResult {
        let catalog = Catalog::with_products(
            [
                (ProductId(1), product("Katana", 45900, true)),
                (ProductId(2), product("Wakizashi", 32900, true)),
            ],
            RUB,
        )?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.currency(), RUB);

        Ok(())
    }

    #[test]
    fn lookup_returns_product() -> TestResult {
        let catalog = Catalog::with_products([(ProductId(1), product("Katana", 45900, true))], RUB)?;

        let found = catalog.lookup(ProductId(1));

        assert_eq!(found.map(|p| p.name.as_str()), Some("Katana"));

        Ok(())
    }

    #[test]
    fn lookup_missing_returns_none() {
        let catalog = Catalog::new(RUB);

        assert!(catalog.lookup(ProductId(99)).is_none());
    }

    #[test]
    fn insert_currency_mismatch_errors() {
        let mut catalog = Catalog::new(RUB);

        let result = catalog.insert(
            ProductId(1),
            Product {
                name: "Katana".to_string(),
                price: Money::from_minor(45900, USD),
                image: None,
                in_stock: true,
                category: "combat".to_string(),
            },
        );

        match result {
            Err(CatalogError::CurrencyMismatch(id, product_currency, catalog_currency)) => {
                assert_eq!(id, ProductId(1));
                assert_eq!(product_currency, USD.iso_alpha_code);
                assert_eq!(catalog_currency, RUB.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn insert_duplicate_id_errors() -> TestResult {
        let mut catalog = Catalog::new(RUB);

        catalog.insert(ProductId(1), product("Katana", 45900, true))?;
        let result = catalog.insert(ProductId(1), product("Tanto", 18900, true));

        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
        assert_eq!(catalog.len(), 1);

        Ok(())
    }
}
