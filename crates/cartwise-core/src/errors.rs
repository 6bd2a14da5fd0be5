// ABOUTME: Structured error types for backend API operations
// ABOUTME: Maps transport failures and non-2xx statuses to a small user-facing taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

/// Result alias for backend API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Common error types for backend API operations
///
/// Every REST call maps its failures into this taxonomy before returning.
/// All variants are surfaced to the end user as a transient notification;
/// none of them terminate the session.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource does not exist on the backend
    #[error("{resource} not found")]
    NotFound {
        /// Human-readable name of the missing resource
        resource: String,
    },

    /// The session token is missing, expired, or rejected by the backend
    #[error("not authenticated: {reason}")]
    Unauthorized {
        /// Why the request was not authenticated
        reason: String,
    },

    /// Input was rejected before any network call was made
    #[error("validation failed: {reason}")]
    Validation {
        /// Why the input was rejected
        reason: String,
    },

    /// The backend answered with a non-2xx status not covered above
    #[error("request to {endpoint} failed with status {status}: {message}")]
    Api {
        /// Endpoint that was called
        endpoint: &'static str,
        /// HTTP status code returned
        status: u16,
        /// Message extracted from the response body, or a generic fallback
        message: String,
    },

    /// Transport-level failure (connection refused, timeout, DNS)
    #[error("network error calling {endpoint}: {message}")]
    Network {
        /// Endpoint that was called
        endpoint: &'static str,
        /// Underlying transport error description
        message: String,
    },

    /// The backend answered 2xx but the body did not match the expected shape
    #[error("failed to parse {context} response")]
    Parse {
        /// Response being deserialized when parsing failed
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// True when the error means the current session is no longer usable
    /// and the user must authenticate again.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
