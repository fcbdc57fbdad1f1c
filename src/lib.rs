//! Tsuba
//!
//! Tsuba is the session cart, promo-code and checkout engine behind a small
//! katana storefront. All session state lives in an injected key/value
//! storage; prices are always re-read from a read-only product catalog so the
//! cart reflects catalog changes.

pub mod cart;
pub mod checkout;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod storage;
pub mod store;
pub mod utils;
