//! Configuration
//!
//! Settings come from command-line flags, falling back to environment variables (a `.env` file
//! is loaded first when present) and then to defaults.

use clap::Args;

pub mod logging;
pub mod shipping;
pub mod store;

pub use logging::{LogFormat, LoggingConfig};
pub use shipping::ShippingConfig;
pub use store::StoreConfig;

/// All settings shared by every command.
#[derive(Debug, Args)]
pub struct Settings {
    /// Store settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Shipping policy settings.
    #[command(flatten)]
    pub shipping: ShippingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Load variables from a `.env` file into the environment, if there is one.
///
/// Returns whether a file was loaded.
pub fn load_dotenv() -> bool {
    dotenvy::dotenv().is_ok()
}
