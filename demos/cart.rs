//! Cart Example
//!
//! Walks one session through the storefront flow: add a few blades, apply a
//! promo code, print the receipt and check out.
//!
//! Use `-f` to load a fixture set by name
//! Use `-p` to apply a promo code before checkout
//! Use `-s` to persist the session to a YAML file between runs

use std::io;

use anyhow::Result;

use clap::Parser;
use tsuba::{
    checkout::ContactInfo,
    fixtures::Fixture,
    products::ProductId,
    receipt::Receipt,
    storage::{FileStorage, MemoryStorage, Storage},
    store::CartStore,
    utils::DemoCartArgs,
};

/// Cart Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoCartArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let catalog = fixture.catalog()?;

    let storage: Box<dyn Storage> = match args.session.as_deref() {
        Some(path) => Box::new(FileStorage::new(path)),
        None => Box::new(MemoryStorage::new()),
    };

    let mut store = CartStore::new(storage, catalog, fixture.promo_codes().clone());

    for (product_id, quantity) in [(ProductId(1), 2), (ProductId(2), 1), (ProductId(4), 1)] {
        let added = store.add(product_id, quantity)?;

        println!("Added {} x{}", added.name, added.quantity);
    }

    if let Some(code) = args.promo.as_deref() {
        let promo = store.apply_promo_code(code)?;

        println!("Applied {} for {} off", promo.code, promo.percent);
    }

    let cart = store.cart()?;
    let promo = store.active_promo()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_cart(&cart, catalog, promo.as_ref())?.write_to(&mut handle)?;

    let contact = ContactInfo {
        name: "Miyamoto".to_string(),
        phone: "+7 900 000-00-00".to_string(),
        email: "miyamoto@example.com".to_string(),
    };

    let confirmation = store.checkout(&contact)?;

    println!(
        "Order {} accepted. Details sent to {}.",
        confirmation.reference, confirmation.email
    );

    Ok(())
}
