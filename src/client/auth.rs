// ABOUTME: Authentication endpoint wrappers: register, login, current user, logout
// ABOUTME: Login is form-encoded per the backend's OAuth2 password flow; the token lands in the session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use tracing::{debug, info};

use cartwise_core::errors::{ApiError, ApiResult};
use cartwise_core::models::{RegisterRequest, TokenResponse, User};

use super::{detail_message, network_error, ApiClient};

impl ApiClient {
    /// Register a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with the backend's `detail` message (for
    /// example when the email is already registered), or
    /// [`ApiError::Network`] on transport failure.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<User> {
        const ENDPOINT: &str = "/auth/register";

        let request = RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };

        let response = self
            .http
            .post(self.url(ENDPOINT))
            .json(&request)
            .send()
            .await
            .map_err(|e| network_error(ENDPOINT, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: status.as_u16(),
                message: detail_message(&text, "failed to register user"),
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Parse {
            context: "register",
            source: e,
        })
    }

    /// Log in with email and password.
    ///
    /// The backend expects the OAuth2 password form (`username`,
    /// `password`). On success the returned bearer token is installed into
    /// the session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with the backend's `detail` message or a
    /// generic login failure, or [`ApiError::Network`] on transport failure.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<()> {
        const ENDPOINT: &str = "/auth/login";

        let response = self
            .http
            .post(self.url(ENDPOINT))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(|e| network_error(ENDPOINT, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: status.as_u16(),
                message: detail_message(&text, "login failed"),
            });
        }

        let token: TokenResponse = serde_json::from_str(&text).map_err(|e| ApiError::Parse {
            context: "login",
            source: e,
        })?;

        self.session.set_token(&token.access_token).await;
        info!(email, "logged in");
        Ok(())
    }

    /// Fetch the currently authenticated user, including saved carts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when no usable token is held or
    /// the backend rejects it (the session is cleared), otherwise the usual
    /// API/network/parse failures.
    pub async fn current_user(&self) -> ApiResult<User> {
        const ENDPOINT: &str = "/auth/me";

        let token = self.bearer().await?;
        let response = self
            .http
            .get(self.url(ENDPOINT))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| network_error(ENDPOINT, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.as_u16() == 401 {
            return Err(self.unauthorized("session rejected by backend").await);
        }
        if !status.is_success() {
            return Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: status.as_u16(),
                message: detail_message(&text, "failed to fetch current user"),
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Parse {
            context: "current_user",
            source: e,
        })
    }

    /// Log out: drop the session token locally.
    pub async fn logout(&self) {
        self.session.clear().await;
        debug!("session cleared");
    }
}
