//! Display currency commands.
//!
//! # Usage
//!
//! ```bash
//! mf-cli currency show
//! mf-cli currency set CAD
//! mf-cli currency toggle
//! ```

use std::sync::Arc;

use maplefront_storefront::StorefrontConfig;
use maplefront_storefront::persist::FilePersistence;
use maplefront_storefront::store::CurrencyStore;

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn currency_store() -> Result<CurrencyStore, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let preferences = Arc::new(FilePersistence::open(config.preferences_path())?);
    Ok(CurrencyStore::new(preferences))
}

/// Print the active display currency.
#[allow(clippy::print_stdout)]
pub fn show() -> CliResult {
    let store = currency_store()?;
    println!("{}", store.current());
    Ok(())
}

/// Set the display currency from a code string.
#[allow(clippy::print_stdout)]
pub fn set(code: &str) -> CliResult {
    let store = currency_store()?;
    let active = store.set_code(code)?;
    println!("{active}");
    Ok(())
}

/// Flip between the two supported currencies.
#[allow(clippy::print_stdout)]
pub fn toggle() -> CliResult {
    let store = currency_store()?;
    println!("{}", store.toggle());
    Ok(())
}
