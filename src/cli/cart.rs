use std::{io, path::PathBuf};

use clap::{Args, Subcommand};

use cartwright::{
    cart::{CartLine, CartStore, LineUuid, NewCartLine},
    checkout::Checkout,
    config::Settings,
    receipt::Receipt,
    storage::FileStorage,
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart and its totals
    Show,

    /// Add a product from a fixture catalog
    Add(AddArgs),

    /// Change the quantity of a line
    SetQuantity(SetQuantityArgs),

    /// Remove a line
    Remove(LineArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Fixture holding the catalog (YAML)
    fixture: PathBuf,

    /// Product key in the fixture catalog
    product: String,

    /// Units to add
    #[arg(long, short, default_value_t = 1)]
    quantity: u32,

    /// Variant, e.g. "Size M / Blue"
    #[arg(long)]
    variant: Option<String>,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Line number as shown by `cart show`
    line: usize,
}

#[derive(Debug, Args)]
struct SetQuantityArgs {
    /// Line number as shown by `cart show`
    line: usize,

    /// New quantity
    quantity: u32,
}

pub(crate) fn run(
    settings: &Settings,
    command: CartCommand,
    out: impl io::Write,
) -> Result<(), String> {
    let currency = settings.store.currency;
    let storage = settings.store.storage();

    let mut checkout = Checkout::new(
        CartStore::open(currency, storage),
        settings.shipping.policy(currency),
    );

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let product = super::fixture_product(settings, &args.fixture, &args.product)?;

            checkout
                .add_item(NewCartLine::from_product(
                    &product,
                    args.quantity,
                    args.variant,
                ))
                .map_err(|error| format!("failed to add {}: {error}", args.product))?;
        }
        CartSubcommand::SetQuantity(args) => {
            let uuid = line_at(&checkout, args.line)?;

            checkout.update_quantity(uuid, args.quantity);
        }
        CartSubcommand::Remove(args) => {
            let uuid = line_at(&checkout, args.line)?;

            checkout.remove_item(uuid);
        }
        CartSubcommand::Clear => checkout.clear_cart(),
    }

    Receipt::from_checkout(&checkout)
        .map_err(|error| format!("failed to price cart: {error}"))?
        .write_to(out)
        .map_err(|error| format!("failed to write cart: {error}"))
}

fn line_at(checkout: &Checkout<'_, FileStorage>, line: usize) -> Result<LineUuid, String> {
    line.checked_sub(1)
        .and_then(|idx| checkout.cart().lines().get(idx))
        .map(CartLine::uuid)
        .ok_or_else(|| format!("no line {line} in the cart"))
}
