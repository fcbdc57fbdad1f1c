//! Utils

use clap::Parser;

/// Arguments for the cart demo
#[derive(Debug, Parser)]
pub struct DemoCartArgs {
    /// Fixture set to use for the catalog & promo codes
    #[clap(short, long, default_value = "katana")]
    pub fixture: String,

    /// Promo code to apply before checkout
    #[clap(short, long)]
    pub promo: Option<String>,

    /// Session file to persist the cart between runs
    #[clap(short, long)]
    pub session: Option<String>,
}
