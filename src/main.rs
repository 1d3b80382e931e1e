//! Cartwright CLI

use std::process::ExitCode;

use clap::Parser;

use cartwright::{config, observability};

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    _ = config::load_dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = observability::init(&cli.settings.logging) {
        report(&error.to_string());

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);

            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "errors are reported to the shopper, not only to the log"
)]
fn report(error: &str) {
    eprintln!("{error}");
}
