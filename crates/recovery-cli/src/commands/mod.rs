pub mod account;
pub mod catalog;
pub mod checkin;
pub mod config;
pub mod data;
pub mod play;
pub mod recommend;
pub mod report;

use std::sync::Arc;

use recovery_core::{AppStore, Catalog, Config, JsonFileStore, SystemClock};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the persisted app state with the system clock.
pub fn open_app(config: &Config) -> Result<AppStore<JsonFileStore>, Box<dyn std::error::Error>> {
    let store = JsonFileStore::open_default()?;
    Ok(AppStore::open(store, config, Arc::new(SystemClock)))
}

/// Built-in catalog, or the one named by `catalog.path`.
pub fn load_catalog(config: &Config) -> Result<Catalog, Box<dyn std::error::Error>> {
    Ok(Catalog::load(config.catalog_path().as_deref())?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
