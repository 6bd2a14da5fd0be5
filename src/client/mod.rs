// ABOUTME: REST client for the Cartwise backend API
// ABOUTME: Pooled reqwest client with timeouts, bearer injection, and status-to-error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

//! Backend REST client
//!
//! One `ApiClient` instance wraps a pooled `reqwest::Client` with the
//! configured timeouts and an explicit [`Session`] injected at
//! construction. Endpoint wrappers live in the submodules:
//!
//! - [`auth`]: register, login, current user, logout
//! - [`cart`]: fetch, add, remove, save, clear
//! - [`email`]: summary delivery
//!
//! Every wrapper maps non-2xx statuses into the [`ApiError`] taxonomy
//! before deserializing. A 401 from any authenticated endpoint clears the
//! session (forced logout) and maps to [`ApiError::Unauthorized`].

mod auth;
mod cart;
mod email;

use std::sync::Arc;

use reqwest::Client;

use cartwise_core::errors::{ApiError, ApiResult};

use crate::config::ClientConfig;
use crate::session::Session;

/// Client for the backend REST surface
///
/// Cheap to clone: the underlying HTTP client is pooled and the session is
/// shared behind an `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client from configuration and an explicit session.
    #[must_use]
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: config.base_url.clone(),
            session,
        }
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Bearer token for an authenticated call, or `Unauthorized` when the
    /// session holds no usable token.
    pub(crate) async fn bearer(&self) -> ApiResult<String> {
        self.session
            .bearer_token()
            .await
            .ok_or_else(|| ApiError::Unauthorized {
                reason: "no active session".to_owned(),
            })
    }

    /// Map a backend 401: the session is no longer usable, so it is
    /// cleared before the error is surfaced.
    pub(crate) async fn unauthorized(&self, reason: &str) -> ApiError {
        self.session.clear().await;
        ApiError::Unauthorized {
            reason: reason.to_owned(),
        }
    }
}

/// Message from the backend's `{"detail": ...}` error body, or the
/// endpoint's generic fallback.
pub(crate) fn detail_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| fallback.to_owned())
}

pub(crate) fn network_error(endpoint: &'static str, source: &reqwest::Error) -> ApiError {
    ApiError::Network {
        endpoint,
        message: source.to_string(),
    }
}
