use std::{io, path::PathBuf};

use clap::{Args, Subcommand};

use cartwright::{
    config::Settings,
    shelves::{ShelfEntry, Wishlist},
};

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// List saved products
    Show,

    /// Save a product from a fixture catalog, or unsave it if already saved
    Toggle(ToggleArgs),

    /// Remove every saved product
    Clear,
}

#[derive(Debug, Args)]
struct ToggleArgs {
    /// Fixture holding the catalog (YAML)
    fixture: PathBuf,

    /// Product key in the fixture catalog
    product: String,
}

pub(crate) fn run(
    settings: &Settings,
    command: WishlistCommand,
    mut out: impl io::Write,
) -> Result<(), String> {
    let storage = settings.store.storage();
    let mut wishlist = Wishlist::open(settings.store.currency, storage);

    match command.command {
        WishlistSubcommand::Show => {}
        WishlistSubcommand::Toggle(args) => {
            let product = super::fixture_product(settings, &args.fixture, &args.product)?;

            let saved = wishlist
                .toggle(ShelfEntry::from_product(&product))
                .map_err(|error| format!("failed to update wishlist: {error}"))?;

            let verb = if saved { "Saved" } else { "Removed" };

            writeln!(out, "{verb} {}", product.title)
                .map_err(|error| format!("failed to write wishlist: {error}"))?;
        }
        WishlistSubcommand::Clear => wishlist.clear(),
    }

    if wishlist.is_empty() {
        return writeln!(out, "Your wishlist is empty.")
            .map_err(|error| format!("failed to write wishlist: {error}"));
    }

    for entry in wishlist.entries() {
        writeln!(out, "{}  {}", entry.title, entry.price)
            .map_err(|error| format!("failed to write wishlist: {error}"))?;
    }

    Ok(())
}
