// ABOUTME: Main library entry point for the Cartwise client platform
// ABOUTME: REST client, session handling, cart session controller, and CLI support modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

#![deny(unsafe_code)]

//! # Cartwise
//!
//! A typed async client for the Cartwise shopping-cart / nutrition-tracking
//! backend. Users authenticate, add products by barcode, watch aggregate
//! nutrient totals against user-configured limits, and save carts with an
//! optional emailed summary.
//!
//! ## Architecture
//!
//! - **`cartwise-core`**: wire models, nutrient aggregation, limit
//!   evaluation, error taxonomy (pure data, no I/O)
//! - **`client`**: REST plumbing over `reqwest` with bearer-token injection
//! - **`session`**: explicit session object holding the token, with
//!   client-side expiry checking and pluggable persistence
//! - **`controller`**: the cart session controller - owns the item list and
//!   limit configuration, serializes operations through a single-flight
//!   guard, and orchestrates the save-and-notify flow
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cartwise::client::ApiClient;
//! use cartwise::config::ClientConfig;
//! use cartwise::controller::CartController;
//! use cartwise::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env();
//!     let session = Arc::new(Session::in_memory());
//!     let client = ApiClient::new(&config, Arc::clone(&session));
//!
//!     client.login("user@example.com", "password").await?;
//!
//!     let controller = CartController::new(client);
//!     controller.load_cart().await?;
//!     controller.add_product("3017620422003").await?;
//!     println!("{:?}", controller.totals());
//!     Ok(())
//! }
//! ```

/// REST client for the backend API surface
pub mod client;

/// Environment-based client configuration
pub mod config;

/// Cart session controller: state machine, single-flight guard, save flow
pub mod controller;

/// Controller-level error types
pub mod errors;

/// Logging configuration and structured logging setup
pub mod logging;

/// User-facing transient notifications mapped from errors and outcomes
pub mod notifications;

/// Session object: bearer token holding, expiry checking, persistence
pub mod session;

/// HTML summary builder for the save-and-notify email
pub mod summary;

pub use cartwise_core::{errors::ApiError, errors::ApiResult, models, nutrition};
