//! Fixtures
//!
//! YAML fixture sets under `./fixtures`: a product catalog in
//! `products/<set>.yml` and a promo-code table in `promotions/<set>.yml`.
//! The shipped `katana` set mirrors the storefront's static data.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    fixtures::{products::ProductsFixture, promotions::PromotionsFixture},
    products::{Catalog, CatalogError, Product, ProductId},
    promotions::{PromoCodeTable, PromotionError},
};

pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// No products loaded yet
    #[error("No products loaded yet; catalog unavailable")]
    NoProducts,

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Promo table construction error
    #[error(transparent)]
    Promotion(#[from] PromotionError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog built from loaded products (currency taken from the first one)
    catalog: Option<Catalog<'a>>,

    /// Promo codes built from loaded promotion fixtures
    promo_codes: PromoCodeTable,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    #[must_use]
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            promo_codes: PromoCodeTable::new(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if there is
    /// a currency mismatch or duplicate id.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (id, product_fixture) in fixture.products {
            // Parse once up front so the catalog currency is known before
            // the product is converted.
            let (_minor_units, currency) = products::parse_price(&product_fixture.price)?;

            let catalog = self.catalog.get_or_insert_with(|| Catalog::new(currency));
            let product: Product<'a> = product_fixture.try_into()?;

            catalog.insert(ProductId(id), product)?;
        }

        Ok(self)
    }

    /// Load promo codes from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// percentage is out of range.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        self.promo_codes = fixture.try_into()?;

        Ok(self)
    }

    /// Load a complete fixture set (products and promotions with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_promotions(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoProducts)
    }

    /// Get the loaded promo code table
    #[must_use]
    pub fn promo_codes(&self) -> &PromoCodeTable {
        &self.promo_codes
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
