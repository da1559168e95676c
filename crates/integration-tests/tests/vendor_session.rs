//! Integration tests for the vendor session.

use std::sync::Arc;

use secrecy::SecretString;

use maplefront_core::Role;
use maplefront_integration_tests::{
    FakeStorefront, LoginScript, vendor_token, vendor_token_expiring,
};
use maplefront_storefront::StoreError;
use maplefront_storefront::persist::{MemoryPersistence, PersistencePort, keys};
use maplefront_storefront::services::VendorSession;

fn password() -> SecretString {
    SecretString::from("hunter2")
}

#[tokio::test]
async fn test_successful_login_persists_the_session() {
    let remote = FakeStorefront::new();
    remote.script_login(LoginScript::Token(vendor_token("vendor")));

    let persist = Arc::new(MemoryPersistence::new());
    let session = VendorSession::new(remote, persist.clone());

    let role = session
        .login("vendor@shop.example", &password())
        .await
        .expect("login");
    assert_eq!(role, Role::Vendor);

    assert!(persist.get(keys::VENDOR_TOKEN).is_some());
    assert_eq!(session.current_role(), Some(Role::Vendor));
}

#[tokio::test]
async fn test_wrong_role_is_rejected_and_nothing_persisted() {
    let remote = FakeStorefront::new();
    remote.script_login(LoginScript::Token(vendor_token("user")));

    let persist = Arc::new(MemoryPersistence::new());
    let session = VendorSession::new(remote, persist.clone());

    let err = session
        .login("user@shop.example", &password())
        .await
        .expect_err("wrong role must fail");
    assert!(matches!(
        err,
        StoreError::Authorization {
            expected: Role::Vendor,
            ..
        }
    ));

    assert_eq!(persist.get(keys::VENDOR_TOKEN), None);
    assert_eq!(session.current_role(), None);
}

#[tokio::test]
async fn test_failed_login_preserves_an_existing_session() {
    let remote = FakeStorefront::new();
    let persist = Arc::new(MemoryPersistence::new());

    // First login succeeds
    remote.script_login(LoginScript::Token(vendor_token("vendor")));
    let session = VendorSession::new(remote.clone(), persist.clone());
    session
        .login("vendor@shop.example", &password())
        .await
        .expect("login");
    let original = persist.get(keys::VENDOR_TOKEN).expect("persisted");

    // A later bad-credentials attempt must not clobber it
    remote.script_login(LoginScript::Reject(401, Some("Invalid credentials".to_owned())));
    let err = session
        .login("vendor@shop.example", &password())
        .await
        .expect_err("bad credentials must fail");
    assert!(matches!(err, StoreError::Authentication(_)));
    assert_eq!(persist.get(keys::VENDOR_TOKEN), Some(original.clone()));

    // A wrong-role token must not clobber it either
    remote.script_login(LoginScript::Token(vendor_token("user")));
    session
        .login("vendor@shop.example", &password())
        .await
        .expect_err("wrong role must fail");
    assert_eq!(persist.get(keys::VENDOR_TOKEN), Some(original));
    assert_eq!(session.current_role(), Some(Role::Vendor));
}

#[tokio::test]
async fn test_bad_credentials_report_authentication_with_server_message() {
    let remote = FakeStorefront::new();
    remote.script_login(LoginScript::Reject(401, Some("Invalid credentials".to_owned())));

    let session = VendorSession::new(remote, Arc::new(MemoryPersistence::new()));
    let err = session
        .login("vendor@shop.example", &password())
        .await
        .expect_err("bad credentials");

    assert_eq!(
        err,
        StoreError::Authentication("Invalid credentials".to_owned())
    );
}

#[tokio::test]
async fn test_undecodable_token_never_persists() {
    let remote = FakeStorefront::new();
    remote.script_login(LoginScript::Token("not-a-jwt".to_owned()));

    let persist = Arc::new(MemoryPersistence::new());
    let session = VendorSession::new(remote, persist.clone());

    let err = session
        .login("vendor@shop.example", &password())
        .await
        .expect_err("malformed token");
    assert!(matches!(err, StoreError::Authentication(_)));
    assert_eq!(persist.get(keys::VENDOR_TOKEN), None);
}

#[tokio::test]
async fn test_malformed_email_is_rejected_before_any_call() {
    let remote = FakeStorefront::new();
    let session = VendorSession::new(remote, Arc::new(MemoryPersistence::new()));

    let err = session
        .login("not-an-email", &password())
        .await
        .expect_err("invalid email");
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let remote = FakeStorefront::new();
    remote.script_login(LoginScript::Token(vendor_token("vendor")));

    let persist = Arc::new(MemoryPersistence::new());
    let session = VendorSession::new(remote, persist.clone());
    session
        .login("vendor@shop.example", &password())
        .await
        .expect("login");

    session.logout();
    assert_eq!(persist.get(keys::VENDOR_TOKEN), None);
    assert_eq!(session.current_role(), None);
}

#[tokio::test]
async fn test_garbage_or_expired_persisted_tokens_read_as_unauthenticated() {
    let remote = FakeStorefront::new();
    let persist = Arc::new(MemoryPersistence::new());
    let session = VendorSession::new(remote, persist.clone());

    // Garbage never errors, only reports unauthenticated
    persist.set(keys::VENDOR_TOKEN, "garbage").expect("seed");
    assert_eq!(session.current_role(), None);

    // An expired token is unauthenticated too
    persist
        .set(keys::VENDOR_TOKEN, &vendor_token_expiring("vendor", 1))
        .expect("seed");
    assert_eq!(session.current_role(), None);
}
