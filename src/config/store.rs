//! Store Config

use std::path::PathBuf;

use clap::Args;
use rusty_money::iso::Currency;

use crate::{
    money::parse_currency,
    shelves::{DEFAULT_RECENTLY_VIEWED_CAPACITY, RecentlyViewed},
    storage::FileStorage,
};

/// Store settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Currency every price is in (INR, USD, GBP, EUR)
    #[arg(long, env = "STORE_CURRENCY", default_value = "INR", value_parser = parse_currency)]
    pub currency: &'static Currency,

    /// Directory holding the persisted cart and shelves
    #[arg(long, env = "CARTWRIGHT_DATA_DIR", default_value = ".cartwright")]
    pub data_dir: PathBuf,

    /// Recently viewed products to remember
    #[arg(
        long,
        env = "RECENTLY_VIEWED_CAPACITY",
        default_value_t = DEFAULT_RECENTLY_VIEWED_CAPACITY
    )]
    pub recently_viewed_capacity: usize,
}

impl StoreConfig {
    /// File storage under the configured data directory.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }

    /// The persisted recently viewed history, limited to the configured capacity.
    pub fn recently_viewed(&self) -> RecentlyViewed<'static, FileStorage> {
        RecentlyViewed::open(self.currency, self.storage(), self.recently_viewed_capacity)
    }
}
