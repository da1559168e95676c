//! Wire types for the remote storefront API.
//!
//! These types mirror the API's JSON payloads. Domain decisions (currency
//! conversion, confirmation protocol) live in the stores, not here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use maplefront_core::CartItemId;

/// A single line in the cart, as the API returns it.
///
/// Owned exclusively by the cart store and mutated only through collaborator
/// round-trips; a refresh after any mutation is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Opaque, stable, unique identifier.
    pub id: CartItemId,
    /// Display name.
    pub name: String,
    /// Non-negative unit price in the currency-agnostic base unit.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    /// Product image URI.
    #[serde(default)]
    pub image: String,
    /// Positive quantity; the API omits it for single items.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartItem {
    /// Line total in the base unit.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

const fn default_quantity() -> u32 {
    1
}

/// Request body for `POST /vendor/login`.
#[derive(Debug, Serialize)]
pub struct VendorLoginRequest<'a> {
    /// Vendor account email.
    pub email: &'a str,
    /// Vendor account password.
    pub password: &'a str,
}

/// Response body for `POST /vendor/login`.
#[derive(Debug, Deserialize)]
pub struct VendorLoginResponse {
    /// Bearer token carrying the role claim.
    pub token: String,
}

/// Message envelope used by verification responses and error bodies.
#[derive(Debug, Default, Deserialize)]
pub struct ApiMessage {
    /// Human-readable result, when the server provides one.
    #[serde(default)]
    pub msg: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_deserializes_api_shape() {
        let json = r#"{
            "id": "item-1",
            "name": "Shirt",
            "price": "20.00",
            "image": "https://cdn.shop.example/shirt.png",
            "quantity": 2
        }"#;

        let item: CartItem = serde_json::from_str(json).expect("deserialize");
        assert_eq!(item.id.as_str(), "item-1");
        assert_eq!(item.unit_price, Decimal::new(2000, 2));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total(), Decimal::new(4000, 2));
    }

    #[test]
    fn test_cart_item_quantity_defaults_to_one() {
        let json = r#"{"id": "item-2", "name": "Hat", "price": 15}"#;
        let item: CartItem = serde_json::from_str(json).expect("deserialize");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.image, "");
    }

    #[test]
    fn test_api_message_tolerates_missing_msg() {
        let msg: ApiMessage = serde_json::from_str("{}").expect("deserialize");
        assert!(msg.msg.is_none());
    }
}
