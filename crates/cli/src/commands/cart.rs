//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! mf-cli cart list
//! mf-cli cart remove --id item-1
//! mf-cli cart checkout
//! ```
//!
//! # Environment Variables
//!
//! - `MAPLEFRONT_API_URL` - Base URL of the remote storefront API
//! - `MAPLEFRONT_STATE_DIR` - Directory for durable client state

use std::sync::Arc;

use maplefront_core::CartItemId;
use maplefront_core::machine::ConfirmOutcome;
use maplefront_storefront::StorefrontConfig;
use maplefront_storefront::persist::FilePersistence;
use maplefront_storefront::remote::StorefrontClient;
use maplefront_storefront::store::{CartStore, CurrencyStore};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn cart_context() -> Result<(CartStore<StorefrontClient>, CurrencyStore), Box<dyn std::error::Error>>
{
    let config = StorefrontConfig::from_env()?;
    let client = StorefrontClient::new(&config)?;
    let preferences = Arc::new(FilePersistence::open(config.preferences_path())?);

    Ok((CartStore::new(client), CurrencyStore::new(preferences)))
}

/// Fetch and print the cart.
pub async fn list() -> CliResult {
    let (store, currency) = cart_context()?;
    store.refresh().await?;
    print_cart(&store, &currency);
    Ok(())
}

/// Remove one item behind the confirmation step.
pub async fn remove(id: &str, yes: bool) -> CliResult {
    let (store, currency) = cart_context()?;

    let flow = store.remove_item(&CartItemId::new(id)).await;
    let Some(request) = flow.request() else {
        tracing::warn!("No removal is awaiting confirmation for {id}");
        return Ok(());
    };

    print_preview(request.summary.as_ref(), &currency);

    if !yes && !confirm_prompt()? {
        flow.cancel();
        tracing::info!("Cancelled; nothing was deleted");
        return Ok(());
    }

    match flow.confirm().await {
        ConfirmOutcome::Committed { error: None } => tracing::info!("Item removed"),
        ConfirmOutcome::Committed { error: Some(e) } => {
            // The flow terminates regardless; report and show the cart.
            tracing::warn!("Delete reported an error: {e}");
        }
        ConfirmOutcome::Ignored => {}
    }

    print_cart(&store, &currency);
    Ok(())
}

/// Clear the cart.
pub async fn checkout() -> CliResult {
    let (store, _currency) = cart_context()?;
    store.checkout().await?;
    tracing::info!("Cart cleared");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(store: &CartStore<StorefrontClient>, currency: &CurrencyStore) {
    let items = store.items();
    if items.is_empty() {
        println!("Cart is empty.");
        return;
    }

    for item in &items {
        println!(
            "{}  {} x{}  {}",
            item.id,
            item.name,
            item.quantity,
            currency.format(item.line_total())
        );
    }
    println!("Subtotal: {}", currency.format(store.subtotal()));
}

#[allow(clippy::print_stdout)]
fn print_preview(summary: Option<&maplefront_storefront::remote::CartItem>, currency: &CurrencyStore) {
    match summary {
        Some(item) => println!(
            "About to delete: {} ({})",
            item.name,
            currency.format(item.line_total())
        ),
        None => println!("About to delete this item (preview unavailable)."),
    }
}

#[allow(clippy::print_stdout)]
fn confirm_prompt() -> Result<bool, std::io::Error> {
    use std::io::Write;

    print!("Delete this item? [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
