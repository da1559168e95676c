//! Maplefront CLI - drive the state core against a live API.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! mf-cli cart list
//!
//! # Remove a cart item (two-step confirmation)
//! mf-cli cart remove --id item-1
//!
//! # Flip the display currency
//! mf-cli currency toggle
//!
//! # Log in as a vendor and check the session
//! mf-cli vendor login -e vendor@example.com -p secret
//! mf-cli vendor whoami
//!
//! # Verify an email token
//! mf-cli vendor verify <token>
//! ```
//!
//! # Commands
//!
//! - `cart` - List, remove items from, and check out the cart
//! - `admin` - List and delete admin-owned products
//! - `currency` - Show or change the display currency
//! - `vendor` - Vendor session and email verification

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(author, version, about = "Maplefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and mutate the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Admin product deletion
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Show or change the display currency
    Currency {
        #[command(subcommand)]
        action: CurrencyAction,
    },
    /// Vendor session and email verification
    Vendor {
        #[command(subcommand)]
        action: VendorAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Fetch and print the cart
    List,
    /// Remove one item, behind the usual confirmation step
    Remove {
        /// Cart item id
        #[arg(short, long)]
        id: String,

        /// Skip the interactive confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Clear the cart
    Checkout,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Fetch and print the deletable products
    List,
    /// Delete one product, behind the usual confirmation step
    Remove {
        /// Product id
        #[arg(short, long)]
        id: String,

        /// Skip the interactive confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CurrencyAction {
    /// Print the active display currency
    Show,
    /// Set the display currency (`USD`, `CAD`)
    Set {
        /// Currency code
        code: String,
    },
    /// Flip between the two supported currencies
    Toggle,
}

#[derive(Subcommand)]
enum VendorAction {
    /// Log in and persist the vendor session
    Login {
        /// Vendor email address
        #[arg(short, long)]
        email: String,

        /// Vendor password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the vendor session
    Logout,
    /// Print the current session role
    Whoami,
    /// Verify an email token
    Verify {
        /// Token from the verification link
        token: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list().await?,
            CartAction::Remove { id, yes } => commands::cart::remove(&id, yes).await?,
            CartAction::Checkout => commands::cart::checkout().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::List => commands::admin::list().await?,
            AdminAction::Remove { id, yes } => commands::admin::remove(&id, yes).await?,
        },
        Commands::Currency { action } => match action {
            CurrencyAction::Show => commands::currency::show()?,
            CurrencyAction::Set { code } => commands::currency::set(&code)?,
            CurrencyAction::Toggle => commands::currency::toggle()?,
        },
        Commands::Vendor { action } => match action {
            VendorAction::Login { email, password } => {
                commands::vendor::login(&email, password).await?;
            }
            VendorAction::Logout => commands::vendor::logout()?,
            VendorAction::Whoami => commands::vendor::whoami()?,
            VendorAction::Verify { token } => commands::vendor::verify(&token).await?,
        },
    }
    Ok(())
}
