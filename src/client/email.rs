// ABOUTME: Email endpoint wrapper for posting the cart summary
// ABOUTME: Unauthenticated per the backend contract; delivery is queued server-side
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use cartwise_core::errors::{ApiError, ApiResult};
use cartwise_core::models::EmailRequest;

use super::{detail_message, network_error, ApiClient};

impl ApiClient {
    /// Post an HTML summary email for delivery.
    ///
    /// Callers in the save flow treat any failure here as non-fatal: the
    /// cart save has already succeeded and is never rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] on any non-2xx status or
    /// [`ApiError::Network`] on transport failure.
    pub async fn send_email(&self, request: &EmailRequest) -> ApiResult<()> {
        const ENDPOINT: &str = "/email/send";

        let response = self
            .http
            .post(self.url(ENDPOINT))
            .json(request)
            .send()
            .await
            .map_err(|e| network_error(ENDPOINT, &e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: status.as_u16(),
                message: detail_message(&text, "failed to send summary email"),
            });
        }
        Ok(())
    }
}
