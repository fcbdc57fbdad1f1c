//! Tsuba prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, LineItem, MAX_QUANTITY, MIN_QUANTITY},
    checkout::{ContactInfo, OrderConfirmation, OrderReference},
    fixtures::{Fixture, FixtureError},
    pricing::{PricingError, Totals},
    products::{Catalog, CatalogError, Product, ProductId},
    promotions::{AppliedPromo, Percent, PromoCodeTable, PromotionError},
    receipt::{Receipt, ReceiptError},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    store::{AddedLine, CartStore, CartStoreError},
};
