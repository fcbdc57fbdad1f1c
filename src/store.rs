//! Cart store
//!
//! [`CartStore`] owns the session's persisted cart and promo records and
//! exposes every mutating operation the storefront needs. Each operation is
//! a synchronous read-modify-write against the injected [`Storage`]: state is
//! validated first and persisted at most once, so a failed operation never
//! leaves a partial mutation behind.

use thiserror::Error;

use crate::{
    cart::{Cart, LineItem, MAX_QUANTITY, MIN_QUANTITY, clamp_quantity},
    checkout::{ContactInfo, OrderConfirmation, OrderReference},
    pricing::{PricingError, Totals},
    products::{Catalog, ProductId},
    promotions::{AppliedPromo, PromoCodeTable},
    storage::{Storage, StorageError},
};

/// Storage key for the persisted cart record.
const CART_KEY: &str = "cart";

/// Storage key for the persisted promo record.
const PROMO_KEY: &str = "promo";

/// Errors surfaced by cart store operations.
///
/// All of these are recoverable and meant for caller-side messaging; none
/// poison the store.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The product id has no catalog entry.
    #[error("Product {0} has no catalog entry")]
    ProductNotFound(ProductId),

    /// An add was attempted on an out-of-stock product.
    #[error("Product {0} is out of stock")]
    ProductUnavailable(ProductId),

    /// A requested quantity was outside the allowed range.
    #[error("Quantity {0} is outside {MIN_QUANTITY}..={MAX_QUANTITY}")]
    QuantityOutOfRange(u32),

    /// The promo code is not in the configured table.
    #[error("Promo code {0:?} is not valid")]
    InvalidPromoCode(String),

    /// Checkout was attempted with no line items.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Wrapped storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Wrapped pricing failure.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Success signal returned from [`CartStore::add`], for caller-side
/// notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLine {
    /// Name of the product that was added.
    pub name: String,

    /// Resulting quantity on the line after clamping.
    pub quantity: u32,

    /// The updated cart.
    pub cart: Cart,
}

/// Session cart state machine over injected storage, catalog and promo table.
#[derive(Debug)]
pub struct CartStore<'a, S: Storage> {
    storage: S,
    catalog: &'a Catalog<'a>,
    promo_codes: PromoCodeTable,
}

impl<'a, S: Storage> CartStore<'a, S> {
    /// Create a store over the given storage, catalog and promo table.
    #[must_use]
    pub fn new(storage: S, catalog: &'a Catalog<'a>, promo_codes: PromoCodeTable) -> Self {
        CartStore {
            storage,
            catalog,
            promo_codes,
        }
    }

    /// Get the catalog this store resolves products against.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog<'a> {
        self.catalog
    }

    /// Load the persisted cart. An absent record reads as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError::Storage`] if the record cannot be read
    /// or parsed.
    pub fn cart(&self) -> Result<Cart, CartStoreError> {
        match self.storage.read(CART_KEY)? {
            Some(raw) => Ok(serde_norway::from_str(&raw).map_err(StorageError::from)?),
            None => Ok(Cart::new()),
        }
    }

    /// Load the currently applied promo, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError::Storage`] if the record cannot be read
    /// or parsed.
    pub fn active_promo(&self) -> Result<Option<AppliedPromo>, CartStoreError> {
        match self.storage.read(PROMO_KEY)? {
            Some(raw) => Ok(Some(
                serde_norway::from_str(&raw).map_err(StorageError::from)?,
            )),
            None => Ok(None),
        }
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// An existing line is incremented and silently clamped at
    /// [`MAX_QUANTITY`]; otherwise a new line is appended at the end with the
    /// product's display snapshot cached on it.
    ///
    /// # Errors
    ///
    /// - [`CartStoreError::ProductNotFound`]: the id has no catalog entry.
    /// - [`CartStoreError::ProductUnavailable`]: the product is out of stock.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<AddedLine, CartStoreError> {
        let catalog = self.catalog;
        let product = catalog
            .lookup(product_id)
            .ok_or(CartStoreError::ProductNotFound(product_id))?;

        if !product.in_stock {
            return Err(CartStoreError::ProductUnavailable(product_id));
        }

        let mut cart = self.cart()?;

        let line_quantity = if let Some(line) = cart.line_mut(product_id) {
            line.quantity = clamp_quantity(line.quantity.saturating_add(quantity));
            line.quantity
        } else {
            let quantity = clamp_quantity(quantity);

            cart.push(LineItem {
                product_id,
                quantity,
                name: product.name.clone(),
                unit_price_minor: product.price.to_minor_units(),
                image: product.image.clone(),
            });

            quantity
        };

        self.persist_cart(&cart)?;

        Ok(AddedLine {
            name: product.name.clone(),
            quantity: line_quantity,
            cart,
        })
    }

    /// Remove a product's line from the cart. Removing an absent id is a
    /// no-op, so the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError::Storage`] if state cannot be read or
    /// persisted.
    pub fn remove(&mut self, product_id: ProductId) -> Result<Cart, CartStoreError> {
        let mut cart = self.cart()?;

        if cart.remove(product_id) {
            self.persist_cart(&cart)?;
        }

        Ok(cart)
    }

    /// Set a line's quantity outright.
    ///
    /// A quantity below [`MIN_QUANTITY`] removes the line. Setting a quantity
    /// for an id not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::QuantityOutOfRange`] above [`MAX_QUANTITY`],
    /// leaving the cart unchanged so callers can re-render the prior value.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartStoreError> {
        if quantity < MIN_QUANTITY {
            return self.remove(product_id);
        }

        if quantity > MAX_QUANTITY {
            return Err(CartStoreError::QuantityOutOfRange(quantity));
        }

        let mut cart = self.cart()?;

        if let Some(line) = cart.line_mut(product_id) {
            line.quantity = quantity;
            self.persist_cart(&cart)?;
        }

        Ok(cart)
    }

    /// Adjust a line's quantity by a signed step (±1 from UI controls).
    ///
    /// Stepping below [`MIN_QUANTITY`] removes the line; stepping on an id
    /// not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::QuantityOutOfRange`] above [`MAX_QUANTITY`],
    /// leaving the cart unchanged.
    pub fn increment_quantity(
        &mut self,
        product_id: ProductId,
        delta: i32,
    ) -> Result<Cart, CartStoreError> {
        let cart = self.cart()?;

        let Some(line) = cart.line(product_id) else {
            return Ok(cart);
        };

        let new_quantity = i64::from(line.quantity) + i64::from(delta);

        if new_quantity < i64::from(MIN_QUANTITY) {
            return self.remove(product_id);
        }

        if new_quantity > i64::from(MAX_QUANTITY) {
            return Err(CartStoreError::QuantityOutOfRange(
                u32::try_from(new_quantity).unwrap_or(u32::MAX),
            ));
        }

        self.set_quantity(product_id, u32::try_from(new_quantity).unwrap_or(MIN_QUANTITY))
    }

    /// Empty the cart and drop any applied promo. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError::Storage`] if the records cannot be
    /// removed.
    pub fn clear(&mut self) -> Result<(), CartStoreError> {
        self.storage.remove(CART_KEY)?;
        self.storage.remove(PROMO_KEY)?;

        Ok(())
    }

    /// Apply a promo code, replacing any previously applied code.
    ///
    /// Matching ignores case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::InvalidPromoCode`] if the code is not in
    /// the configured table.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<AppliedPromo, CartStoreError> {
        let promo = self
            .promo_codes
            .lookup(code)
            .ok_or_else(|| CartStoreError::InvalidPromoCode(code.trim().to_uppercase()))?;

        let raw = serde_norway::to_string(&promo).map_err(StorageError::from)?;

        self.storage.write(PROMO_KEY, &raw)?;

        Ok(promo)
    }

    /// Compute the current totals from persisted state and live catalog
    /// prices.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError`] if state cannot be loaded or the totals
    /// cannot be derived.
    pub fn totals(&self) -> Result<Totals<'a>, CartStoreError> {
        let cart = self.cart()?;
        let promo = self.active_promo()?;

        Ok(Totals::compute(&cart, self.catalog, promo.as_ref())?)
    }

    /// Submit the order (simulated) and reset the session.
    ///
    /// Totals are frozen before the reset, so the confirmation reflects what
    /// the customer saw at submission.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::EmptyCart`] if the cart has no line items.
    pub fn checkout(
        &mut self,
        contact: &ContactInfo,
    ) -> Result<OrderConfirmation<'a>, CartStoreError> {
        let cart = self.cart()?;

        if cart.is_empty() {
            return Err(CartStoreError::EmptyCart);
        }

        let promo = self.active_promo()?;
        let totals = Totals::compute(&cart, self.catalog, promo.as_ref())?;

        self.clear()?;

        Ok(OrderConfirmation {
            reference: OrderReference::generate(),
            email: contact.email.clone(),
            totals,
        })
    }

    fn persist_cart(&mut self, cart: &Cart) -> Result<(), CartStoreError> {
        let raw = serde_norway::to_string(cart).map_err(StorageError::from)?;

        self.storage.write(CART_KEY, &raw)?;

        Ok(())
    }
}
