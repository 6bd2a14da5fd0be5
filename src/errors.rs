// ABOUTME: Controller-level error types layered over the core API taxonomy
// ABOUTME: Busy guard rejection, limit-gate failures, and post-refresh inconsistencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use cartwise_core::errors::ApiError;
use cartwise_core::nutrition::Nutrient;

/// Result alias for cart session controller operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors produced by the cart session controller
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Another operation is already in flight on this controller
    ///
    /// The controller serializes mutations through a single-flight guard;
    /// overlapping calls are rejected instead of racing each other's
    /// refresh.
    #[error("another cart operation is already in progress")]
    Busy,

    /// Saving was blocked because totals exceed the configured limits
    ///
    /// Raised before any network call is made.
    #[error("nutrition limits exceeded: {}", format_nutrients(.exceeded))]
    LimitsExceeded {
        /// The nutrient dimensions currently over their limit
        exceeded: Vec<Nutrient>,
    },

    /// The product was accepted by the backend but missing from the
    /// refreshed snapshot
    #[error("product {barcode} missing from cart after refresh")]
    MissingAfterRefresh {
        /// Barcode that was just added
        barcode: String,
    },

    /// Underlying API failure
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn format_nutrients(nutrients: &[Nutrient]) -> String {
    let names: Vec<String> = nutrients.iter().map(ToString::to_string).collect();
    names.join(", ")
}
