// ABOUTME: Wire models for the Cartwise backend REST API
// ABOUTME: Product, Nutriments, CartSnapshot, User, SavedCart, and request/response payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use serde::{Deserialize, Serialize};

/// Per-product nutrient values as delivered by the product database
///
/// Every field is optional on the wire: the upstream food database omits
/// values it does not know. Aggregation treats missing values as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nutriments {
    /// Carbohydrates in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    /// Proteins in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proteins: Option<f64>,
    /// Fat in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    /// Energy in kilocalories (wire name `energy-kcal`)
    #[serde(rename = "energy-kcal", skip_serializing_if = "Option::is_none")]
    pub energy_kcal: Option<f64>,
}

/// A product in the cart, identified by its barcode
///
/// Immutable once fetched: the controller never patches nutrient data in
/// place, it replaces the whole item list from the backend instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique barcode (EAN/UPC), the identity key
    pub code: String,
    /// Product display name; empty when the product database has none
    #[serde(default)]
    pub name: String,
    /// Nutrient values attached to the product
    #[serde(default)]
    pub nutriments: Nutriments,
}

/// Authoritative cart contents as returned by `GET /cart`
///
/// Replaced wholesale after every successful mutation; never locally
/// patched, so it cannot diverge from server-side truth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Number of products in the cart
    #[serde(default)]
    pub total_items: usize,
    /// Products in insertion order
    #[serde(default)]
    pub products: Vec<Product>,
}

impl CartSnapshot {
    /// Find a product by barcode.
    #[must_use]
    pub fn find(&self, barcode: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.code == barcode)
    }
}

/// Envelope around the cart snapshot (`{"cart": {...}}`)
#[derive(Debug, Clone, Deserialize)]
pub struct CartEnvelope {
    /// The wrapped snapshot
    pub cart: CartSnapshot,
}

/// A cart previously saved by the user, as listed under `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCart {
    /// Backend identifier of the saved cart
    pub id: i64,
    /// User-chosen cart name
    pub name: String,
    /// Products the cart contained when it was saved
    #[serde(default)]
    pub cart_data: Vec<Product>,
}

/// Authenticated user as returned by `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address, when one is on file
    #[serde(default)]
    pub email: Option<String>,
    /// Carts the user has saved
    #[serde(default)]
    pub carts: Vec<SavedCart>,
}

/// Payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Email address, also the login username
    pub email: String,
    /// Plain-text password (sent over TLS, hashed server-side)
    pub password: String,
}

/// Response from `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token for the session
    pub access_token: String,
    /// Token type, nominally `bearer`
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Confirmation from `POST /cart/save`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveReceipt {
    /// Backend confirmation message, when one is provided
    #[serde(default)]
    pub msg: Option<String>,
}

/// Payload for `POST /email/send`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}
