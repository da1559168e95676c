//! Integration test support for Maplefront.
//!
//! The stores are generic over their collaborator traits, so these tests
//! run the full flows in-process against scriptable doubles instead of a
//! live server. This crate holds the doubles and fixtures; the scenario
//! tests live in `tests/`.
//!
//! # Test Categories
//!
//! - `cart_flow` - Snapshot replacement, coalescing, and ordering
//! - `confirmation` - The two-step delete protocol for carts and admin
//! - `currency` - Preference persistence and validation
//! - `verification` - Email token verification and retry
//! - `vendor_session` - Login role gate and session persistence

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::SecretString;
use tokio::sync::Semaphore;

use maplefront_admin::remote::{AdminApi, AdminApiError, ProductSummary};
use maplefront_core::{CartItemId, Email, ProductId};
use maplefront_storefront::persist::{PersistError, PersistencePort};
use maplefront_storefront::remote::{ApiError, CartItem, StorefrontApi};

// =============================================================================
// Fixtures
// =============================================================================

/// Build an unsigned JWT-shaped token with the given role claim.
#[must_use]
pub fn vendor_token(role: &str) -> String {
    token_with_claims(&format!(r#"{{"role":"{role}"}}"#))
}

/// Build an unsigned JWT-shaped token with a role claim and expiry.
#[must_use]
pub fn vendor_token_expiring(role: &str, exp: i64) -> String {
    token_with_claims(&format!(r#"{{"role":"{role}","exp":{exp}}}"#))
}

fn token_with_claims(claims: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims);
    format!("{header}.{payload}.sig")
}

/// A cart item fixture with the given id, name, and base-unit price.
#[must_use]
pub fn cart_item(id: &str, name: &str, price: &str, quantity: u32) -> CartItem {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "price": price,
        "image": format!("https://cdn.shop.example/{id}.png"),
        "quantity": quantity,
    }))
    .expect("valid cart item fixture")
}

/// A product fixture for the admin catalog.
#[must_use]
pub fn product(id: &str, name: &str, price: &str) -> ProductSummary {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "image": format!("https://cdn.shop.example/{id}.png"),
        "price": price,
    }))
    .expect("valid product fixture")
}

/// Scripted outcome for a verification call.
#[derive(Debug, Clone)]
pub enum VerifyScript {
    /// 2xx with the given (possibly absent) result message.
    Ok(Option<String>),
    /// Non-2xx with the given status and (possibly absent) error message.
    Status(u16, Option<String>),
}

/// Scripted outcome for a login call.
#[derive(Debug, Clone)]
pub enum LoginScript {
    /// 2xx with the given bearer token.
    Token(String),
    /// Non-2xx with the given status and (possibly absent) error message.
    Reject(u16, Option<String>),
}

// =============================================================================
// Storefront collaborator double
// =============================================================================

/// In-memory double for the storefront API.
///
/// Stateful like the real collaborator: `list_cart` reflects earlier
/// deletes and clears. Failure injection and call gating drive the error
/// and interleaving scenarios.
#[derive(Clone, Default)]
pub struct FakeStorefront {
    inner: Arc<FakeStorefrontInner>,
}

struct FakeStorefrontInner {
    items: Mutex<Vec<CartItem>>,
    fail_next_list: Mutex<Option<(u16, Option<String>)>>,
    fail_next_delete: Mutex<Option<(u16, Option<String>)>>,
    fail_next_clear: Mutex<Option<(u16, Option<String>)>>,
    login_script: Mutex<Option<LoginScript>>,
    verify_script: Mutex<VecDeque<VerifyScript>>,
    list_calls: AtomicU32,
    delete_calls: AtomicU32,
    clear_calls: AtomicU32,
    login_calls: AtomicU32,
    verify_calls: AtomicU32,
    list_gated: AtomicBool,
    list_gate: Semaphore,
}

impl Default for FakeStorefrontInner {
    fn default() -> Self {
        Self {
            items: Mutex::default(),
            fail_next_list: Mutex::default(),
            fail_next_delete: Mutex::default(),
            fail_next_clear: Mutex::default(),
            login_script: Mutex::default(),
            verify_script: Mutex::default(),
            list_calls: AtomicU32::new(0),
            delete_calls: AtomicU32::new(0),
            clear_calls: AtomicU32::new(0),
            login_calls: AtomicU32::new(0),
            verify_calls: AtomicU32::new(0),
            list_gated: AtomicBool::new(false),
            list_gate: Semaphore::new(0),
        }
    }
}

impl FakeStorefront {
    /// An empty, ungated double.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the server-side cart contents.
    pub fn seed_items(&self, items: Vec<CartItem>) {
        *lock(&self.inner.items) = items;
    }

    /// Make the next `list_cart` answer with the given status.
    pub fn fail_next_list(&self, status: u16, message: Option<&str>) {
        *lock(&self.inner.fail_next_list) = Some((status, message.map(ToOwned::to_owned)));
    }

    /// Make the next `delete_cart_item` answer with the given status.
    pub fn fail_next_delete(&self, status: u16, message: Option<&str>) {
        *lock(&self.inner.fail_next_delete) = Some((status, message.map(ToOwned::to_owned)));
    }

    /// Make the next `clear_cart` answer with the given status.
    pub fn fail_next_clear(&self, status: u16, message: Option<&str>) {
        *lock(&self.inner.fail_next_clear) = Some((status, message.map(ToOwned::to_owned)));
    }

    /// Script the next login outcome.
    pub fn script_login(&self, script: LoginScript) {
        *lock(&self.inner.login_script) = Some(script);
    }

    /// Queue a verification outcome; calls consume the queue in order.
    pub fn push_verify(&self, script: VerifyScript) {
        lock(&self.inner.verify_script).push_back(script);
    }

    /// Hold every subsequent `list_cart` response until released.
    pub fn hold_lists(&self) {
        self.inner.list_gated.store(true, Ordering::SeqCst);
    }

    /// Release one held `list_cart` response.
    pub fn release_list(&self) {
        self.inner.list_gate.add_permits(1);
    }

    /// Number of `list_cart` calls made so far.
    #[must_use]
    pub fn list_calls(&self) -> u32 {
        self.inner.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete_cart_item` calls made so far.
    #[must_use]
    pub fn delete_calls(&self) -> u32 {
        self.inner.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of `clear_cart` calls made so far.
    #[must_use]
    pub fn clear_calls(&self) -> u32 {
        self.inner.clear_calls.load(Ordering::SeqCst)
    }

    /// Number of `verify_email` calls made so far.
    #[must_use]
    pub fn verify_calls(&self) -> u32 {
        self.inner.verify_calls.load(Ordering::SeqCst)
    }
}

impl StorefrontApi for FakeStorefront {
    async fn list_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((status, message)) = lock(&self.inner.fail_next_list).take() {
            return Err(ApiError::Status { status, message });
        }

        // Capture before gating, like a response already on the wire.
        let items = lock(&self.inner.items).clone();

        if self.inner.list_gated.load(Ordering::SeqCst) {
            let permit = self
                .inner
                .list_gate
                .acquire()
                .await
                .expect("gate never closed");
            permit.forget();
        }

        Ok(items)
    }

    async fn delete_cart_item(&self, id: &CartItemId) -> Result<(), ApiError> {
        self.inner.delete_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((status, message)) = lock(&self.inner.fail_next_delete).take() {
            return Err(ApiError::Status { status, message });
        }

        lock(&self.inner.items).retain(|item| item.id != *id);
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), ApiError> {
        self.inner.clear_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((status, message)) = lock(&self.inner.fail_next_clear).take() {
            return Err(ApiError::Status { status, message });
        }

        lock(&self.inner.items).clear();
        Ok(())
    }

    async fn vendor_login(
        &self,
        _email: &Email,
        _password: &SecretString,
    ) -> Result<String, ApiError> {
        self.inner.login_calls.fetch_add(1, Ordering::SeqCst);

        match lock(&self.inner.login_script).clone() {
            Some(LoginScript::Token(token)) => Ok(token),
            Some(LoginScript::Reject(status, message)) => {
                Err(ApiError::Status { status, message })
            }
            None => Err(ApiError::Status {
                status: 401,
                message: Some("Invalid credentials".to_owned()),
            }),
        }
    }

    async fn verify_email(&self, _token: &str) -> Result<Option<String>, ApiError> {
        self.inner.verify_calls.fetch_add(1, Ordering::SeqCst);

        match lock(&self.inner.verify_script).pop_front() {
            Some(VerifyScript::Ok(message)) => Ok(message),
            Some(VerifyScript::Status(status, message)) => {
                Err(ApiError::Status { status, message })
            }
            None => Err(ApiError::Status {
                status: 500,
                message: None,
            }),
        }
    }
}

// =============================================================================
// Admin collaborator double
// =============================================================================

/// In-memory double for the admin product API.
#[derive(Clone, Default)]
pub struct FakeAdmin {
    inner: Arc<FakeAdminInner>,
}

#[derive(Default)]
struct FakeAdminInner {
    products: Mutex<Vec<ProductSummary>>,
    fail_next_get: Mutex<Option<(u16, Option<String>)>>,
    fail_next_delete: Mutex<Option<(u16, Option<String>)>>,
    delete_calls: AtomicU32,
}

impl FakeAdmin {
    /// An empty double.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the server-side product list.
    pub fn seed_products(&self, products: Vec<ProductSummary>) {
        *lock(&self.inner.products) = products;
    }

    /// Make the next `get_product` answer with the given status.
    pub fn fail_next_get(&self, status: u16, message: Option<&str>) {
        *lock(&self.inner.fail_next_get) = Some((status, message.map(ToOwned::to_owned)));
    }

    /// Make the next `delete_product` answer with the given status.
    pub fn fail_next_delete(&self, status: u16, message: Option<&str>) {
        *lock(&self.inner.fail_next_delete) = Some((status, message.map(ToOwned::to_owned)));
    }

    /// Number of `delete_product` calls made so far.
    #[must_use]
    pub fn delete_calls(&self) -> u32 {
        self.inner.delete_calls.load(Ordering::SeqCst)
    }
}

impl AdminApi for FakeAdmin {
    async fn list_products(&self) -> Result<Vec<ProductSummary>, AdminApiError> {
        Ok(lock(&self.inner.products).clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<ProductSummary, AdminApiError> {
        if let Some((status, message)) = lock(&self.inner.fail_next_get).take() {
            return Err(AdminApiError::Status { status, message });
        }

        lock(&self.inner.products)
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or(AdminApiError::Status {
                status: 404,
                message: Some("product not found".to_owned()),
            })
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), AdminApiError> {
        self.inner.delete_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((status, message)) = lock(&self.inner.fail_next_delete).take() {
            return Err(AdminApiError::Status { status, message });
        }

        lock(&self.inner.products).retain(|p| p.id != *id);
        Ok(())
    }
}

// =============================================================================
// Persistence doubles
// =============================================================================

/// Persistence double whose writes always fail.
///
/// Reads still work, so it exercises the "write is advisory" contract.
#[derive(Debug, Default)]
pub struct ReadOnlyPersistence {
    entries: Mutex<std::collections::HashMap<String, String>>,
}

impl ReadOnlyPersistence {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, bypassing the failing write path.
    pub fn seed(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_owned(), value.to_owned());
    }
}

impl PersistencePort for ReadOnlyPersistence {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "persistence is read-only",
        )))
    }

    fn remove(&self, _key: &str) -> Result<(), PersistError> {
        Err(PersistError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "persistence is read-only",
        )))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
