// ABOUTME: User-facing transient notifications with short title and description
// ABOUTME: Maps the error taxonomy and save outcomes to what the UI surfaces; nothing crashes the session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use cartwise_core::errors::ApiError;
use cartwise_core::models::Product;

use crate::controller::SaveOutcome;
use crate::errors::SessionError;

/// How prominently a notification should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation of a successful action
    Info,
    /// Something went partially wrong; the action still took effect
    Warning,
    /// The action failed
    Error,
}

/// A transient user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title
    pub title: String,
    /// One-line description
    pub description: String,
    /// Rendering severity
    pub severity: Severity,
}

impl Notification {
    fn new(title: &str, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_owned(),
            description: description.into(),
            severity,
        }
    }

    /// Confirmation shown after a product was added.
    #[must_use]
    pub fn product_added(product: &Product) -> Self {
        Self::new(
            "Product added",
            format!("{} was added to your cart", display_name(product)),
            Severity::Info,
        )
    }

    /// Confirmation shown after a product was removed.
    #[must_use]
    pub fn product_removed(product: &Product) -> Self {
        Self::new(
            "Product removed",
            format!("{} was removed from your cart", display_name(product)),
            Severity::Info,
        )
    }

    /// Outcome of a completed save-and-notify flow.
    #[must_use]
    pub fn save_outcome(outcome: &SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::SavedAndEmailed { recipient } => Self::new(
                "Cart saved",
                format!("Cart saved and summary sent to {recipient}"),
                Severity::Info,
            ),
            SaveOutcome::SavedNoEmail => Self::new(
                "Cart saved",
                "Cart saved (no email on file for your account)",
                Severity::Info,
            ),
            SaveOutcome::SavedEmailFailed { reason } => Self::new(
                "Cart saved, email failed",
                format!("Cart was saved, but the summary email failed: {reason}"),
                Severity::Warning,
            ),
        }
    }
}

impl From<&ApiError> for Notification {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::NotFound { resource } => {
                Self::new("Not found", format!("{resource} not found"), Severity::Error)
            }
            ApiError::Unauthorized { .. } => Self::new(
                "Not authenticated",
                "Your session has ended, please log in again",
                Severity::Error,
            ),
            ApiError::Validation { reason } => {
                Self::new("Invalid input", reason.clone(), Severity::Error)
            }
            ApiError::Api { message, .. } => Self::new("Error", message.clone(), Severity::Error),
            ApiError::Network { .. } => Self::new(
                "Connection problem",
                "Could not reach the server, please try again",
                Severity::Error,
            ),
            ApiError::Parse { .. } => Self::new(
                "Unexpected response",
                "The server answered in an unexpected format",
                Severity::Error,
            ),
        }
    }
}

impl From<&SessionError> for Notification {
    fn from(error: &SessionError) -> Self {
        match error {
            SessionError::Busy => Self::new(
                "Please wait",
                "Another cart operation is still in progress",
                Severity::Warning,
            ),
            SessionError::LimitsExceeded { .. } => Self::new(
                "Limits exceeded",
                "Please adjust your cart or limits before saving",
                Severity::Error,
            ),
            SessionError::MissingAfterRefresh { barcode } => Self::new(
                "Not found",
                format!("Product {barcode} was not found in the cart after adding"),
                Severity::Error,
            ),
            SessionError::Api(api) => Self::from(api),
        }
    }
}

fn display_name(product: &Product) -> &str {
    if product.name.is_empty() {
        &product.code
    } else {
        &product.name
    }
}
