//! Vendor session and verification commands.
//!
//! # Usage
//!
//! ```bash
//! mf-cli vendor login -e vendor@example.com -p secret
//! mf-cli vendor whoami
//! mf-cli vendor logout
//! mf-cli vendor verify <token>
//! ```

use std::sync::Arc;

use secrecy::SecretString;

use maplefront_storefront::StorefrontConfig;
use maplefront_storefront::persist::FilePersistence;
use maplefront_storefront::remote::StorefrontClient;
use maplefront_storefront::services::{VendorSession, VerificationFlow};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn session() -> Result<VendorSession<StorefrontClient>, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let client = StorefrontClient::new(&config)?;
    let store = Arc::new(FilePersistence::open(config.session_path())?);
    Ok(VendorSession::new(client, store))
}

/// Log in and persist the vendor session.
#[allow(clippy::print_stdout)]
pub async fn login(email: &str, password: String) -> CliResult {
    let session = session()?;
    let role = session.login(email, &SecretString::from(password)).await?;
    println!("Logged in with role: {role}");
    Ok(())
}

/// Clear the vendor session.
pub fn logout() -> CliResult {
    session()?.logout();
    tracing::info!("Session cleared");
    Ok(())
}

/// Print the current session role.
#[allow(clippy::print_stdout)]
pub fn whoami() -> CliResult {
    let session = session()?;
    match session.current_role() {
        Some(role) => println!("{role}"),
        None => println!("unauthenticated"),
    }
    Ok(())
}

/// Verify an email token and print the result.
#[allow(clippy::print_stdout)]
pub async fn verify(token: &str) -> CliResult {
    let config = StorefrontConfig::from_env()?;
    let client = StorefrontClient::new(&config)?;

    let flow = VerificationFlow::new(client, Some(token));
    let state = flow.run().await;

    match state.message() {
        Some(message) if state.is_success() => println!("Verified: {message}"),
        Some(message) => println!("Verification failed: {message}"),
        None => println!("Verification still pending."),
    }
    Ok(())
}
