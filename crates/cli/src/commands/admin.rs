//! Admin product commands.
//!
//! # Usage
//!
//! ```bash
//! mf-cli admin list
//! mf-cli admin remove --id p-1
//! ```

use maplefront_admin::remote::AdminClient;
use maplefront_admin::{AdminCatalog, AdminConfig};
use maplefront_core::ProductId;
use maplefront_core::machine::ConfirmOutcome;

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn catalog() -> Result<AdminCatalog<AdminClient>, Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let client = AdminClient::new(&config)?;
    Ok(AdminCatalog::new(client))
}

/// Fetch and print the deletable products.
#[allow(clippy::print_stdout)]
pub async fn list() -> CliResult {
    let catalog = catalog()?;
    catalog.refresh().await?;

    let products = catalog.products();
    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }
    for product in &products {
        println!("{}  {}  ${:.2}", product.id, product.name, product.price);
    }
    Ok(())
}

/// Delete one product behind the confirmation step.
#[allow(clippy::print_stdout)]
pub async fn remove(id: &str, yes: bool) -> CliResult {
    let catalog = catalog()?;

    let flow = catalog.remove_product(&ProductId::new(id)).await;
    let Some(request) = flow.request() else {
        tracing::warn!("No deletion is awaiting confirmation for {id}");
        return Ok(());
    };

    match request.summary.as_ref() {
        Some(product) => println!("About to delete: {} (${:.2})", product.name, product.price),
        None => println!("About to delete this product (preview unavailable)."),
    }

    if !yes && !confirm_prompt()? {
        flow.cancel();
        tracing::info!("Cancelled; nothing was deleted");
        return Ok(());
    }

    match flow.confirm().await {
        ConfirmOutcome::Committed { error: None } => tracing::info!("Product deleted"),
        ConfirmOutcome::Committed { error: Some(e) } => {
            tracing::warn!("Delete reported an error: {e}");
        }
        ConfirmOutcome::Ignored => {}
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn confirm_prompt() -> Result<bool, std::io::Error> {
    use std::io::Write;

    print!("Delete this product? [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
