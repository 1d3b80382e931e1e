use std::io;

use clap::{Parser, Subcommand};

use cartwright::{
    config::Settings,
    fixtures::CheckoutFixture,
    products::Product,
};

mod cart;
mod quote;
mod recent;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "cartwright", about = "Storefront cart and checkout pricing", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a checkout fixture
    Quote(quote::QuoteArgs),

    /// Manage the persisted cart
    Cart(cart::CartCommand),

    /// Manage the persisted wishlist
    Wishlist(wishlist::WishlistCommand),

    /// Manage the recently viewed history
    Recent(recent::RecentCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let out = io::stdout().lock();

        match self.command {
            Commands::Quote(args) => quote::run(&self.settings, args, out).await,
            Commands::Cart(command) => cart::run(&self.settings, command, out),
            Commands::Wishlist(command) => wishlist::run(&self.settings, command, out),
            Commands::Recent(command) => recent::run(&self.settings, command, out),
        }
    }
}

/// Look up `key` in the catalog of the fixture at `path`.
fn fixture_product(
    settings: &Settings,
    path: &std::path::Path,
    key: &str,
) -> Result<Product<'static>, String> {
    let fixture = CheckoutFixture::load(path)
        .map_err(|error| format!("failed to load {}: {error}", path.display()))?;

    let mut catalog = fixture
        .catalog(settings.store.currency)
        .map_err(|error| format!("invalid catalog in {}: {error}", path.display()))?;

    catalog
        .remove(key)
        .ok_or_else(|| format!("no product {key:?} in {}", path.display()))
}
