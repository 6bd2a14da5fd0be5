// ABOUTME: Main library entry point for the cartwise-core foundation crate
// ABOUTME: Wire models, nutrient aggregation, limit evaluation, and error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

//! # Cartwise Core
//!
//! Foundation crate for the Cartwise nutrition-tracking client platform.
//! Everything in this crate is pure data and computation: the wire models
//! exchanged with the backend, the nutrient totals calculator, the limit
//! evaluator that gates the save action, and the shared error taxonomy.
//!
//! No I/O lives here. The REST client, session handling, and the cart
//! session controller are provided by the root `cartwise` crate.

/// Shared error taxonomy for backend API operations
pub mod errors;

/// Wire models exchanged with the backend REST API
pub mod models;

/// Nutrient totals calculator and limit evaluator
pub mod nutrition;

pub use errors::{ApiError, ApiResult};
