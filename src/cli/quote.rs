use std::{io, path::PathBuf};

use clap::Args;
use jiff::Timestamp;
use tracing::info;

use cartwright::{
    config::Settings, fixtures::CheckoutFixture, receipt::Receipt, storage::MemoryStorage,
};

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Checkout fixture (YAML)
    fixture: PathBuf,

    /// Coupon code; overrides the fixture's own
    #[arg(long)]
    coupon: Option<String>,

    /// Instant to price at (RFC 3339); overrides the fixture's own, defaults to now
    #[arg(long)]
    at: Option<Timestamp>,

    /// Print the totals as JSON instead of a receipt
    #[arg(long)]
    json: bool,
}

pub(crate) async fn run(
    settings: &Settings,
    args: QuoteArgs,
    mut out: impl io::Write,
) -> Result<(), String> {
    let fixture = CheckoutFixture::load(&args.fixture)
        .map_err(|error| format!("failed to load {}: {error}", args.fixture.display()))?;

    let mut checkout = fixture
        .checkout(
            MemoryStorage::new(),
            settings.store.currency,
            &settings.shipping,
        )
        .map_err(|error| format!("invalid fixture {}: {error}", args.fixture.display()))?;

    let now = args.at.or(fixture.at).unwrap_or_else(Timestamp::now);

    if let Some(code) = args.coupon.or_else(|| fixture.coupon.clone()) {
        let lookup = fixture.coupon_lookup();

        if let Err(error) = checkout.apply_coupon(&lookup, &code, now).await {
            info!(code = %code, %error, "quoting without coupon");

            writeln!(out, "Coupon {} not applied: {error}", code.trim())
                .map_err(|error| format!("failed to write quote: {error}"))?;
        }
    }

    let receipt = Receipt::from_checkout(&checkout)
        .map_err(|error| format!("failed to price checkout: {error}"))?;

    if args.json {
        serde_json::to_writer_pretty(&mut out, receipt.totals())
            .map_err(|error| format!("failed to write quote: {error}"))?;

        return writeln!(out).map_err(|error| format!("failed to write quote: {error}"));
    }

    receipt
        .write_to(out)
        .map_err(|error| format!("failed to write quote: {error}"))
}
