use std::{io, path::PathBuf};

use clap::{Args, Subcommand};

use cartwright::{config::Settings, shelves::ShelfEntry};

#[derive(Debug, Args)]
pub(crate) struct RecentCommand {
    #[command(subcommand)]
    command: RecentSubcommand,
}

#[derive(Debug, Subcommand)]
enum RecentSubcommand {
    /// List recently viewed products, newest first
    Show,

    /// Record a view of a product from a fixture catalog
    View(ViewArgs),

    /// Forget every viewed product
    Clear,
}

#[derive(Debug, Args)]
struct ViewArgs {
    /// Fixture holding the catalog (YAML)
    fixture: PathBuf,

    /// Product key in the fixture catalog
    product: String,
}

pub(crate) fn run(
    settings: &Settings,
    command: RecentCommand,
    mut out: impl io::Write,
) -> Result<(), String> {
    let mut history = settings.store.recently_viewed();

    match command.command {
        RecentSubcommand::Show => {}
        RecentSubcommand::View(args) => {
            let product = super::fixture_product(settings, &args.fixture, &args.product)?;

            history
                .record(ShelfEntry::from_product(&product))
                .map_err(|error| format!("failed to record view: {error}"))?;
        }
        RecentSubcommand::Clear => history.clear(),
    }

    if history.entries().is_empty() {
        return writeln!(out, "Nothing viewed yet.")
            .map_err(|error| format!("failed to write history: {error}"));
    }

    for entry in history.entries() {
        writeln!(out, "{}  {}", entry.title, entry.price)
            .map_err(|error| format!("failed to write history: {error}"))?;
    }

    Ok(())
}
