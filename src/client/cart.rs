// ABOUTME: Cart endpoint wrappers: fetch, add by barcode, remove, save, clear
// ABOUTME: A 404 on fetch means "no cart yet" and maps to an empty snapshot, not an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use tracing::debug;

use cartwise_core::errors::{ApiError, ApiResult};
use cartwise_core::models::{CartEnvelope, CartSnapshot, SaveReceipt};

use super::{detail_message, network_error, ApiClient};

impl ApiClient {
    /// Fetch the current cart.
    ///
    /// Absence of a cart (404) is not an error: the backend has simply not
    /// seen a product yet, so an empty snapshot is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401 (session cleared), or the
    /// usual API/network/parse failures.
    pub async fn fetch_cart(&self) -> ApiResult<CartSnapshot> {
        const ENDPOINT: &str = "/cart";

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

        match status.as_u16() {
            404 => {
                debug!("no cart on backend yet, treating as empty");
                return Ok(CartSnapshot::default());
            }
            401 => return Err(self.unauthorized("session rejected by backend").await),
            s if !status.is_success() => {
                return Err(ApiError::Api {
                    endpoint: ENDPOINT,
                    status: s,
                    message: detail_message(&text, "failed to fetch cart"),
                });
            }
            _ => {}
        }

        let envelope: CartEnvelope = serde_json::from_str(&text).map_err(|e| ApiError::Parse {
            context: "fetch_cart",
            source: e,
        })?;
        Ok(envelope.cart)
    }

    /// Add a product to the cart by barcode.
    ///
    /// The backend looks the barcode up in the product database and
    /// returns an updated cart; callers are expected to re-fetch the
    /// authoritative snapshot afterwards rather than trust this body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the barcode is unknown to the
    /// product database, [`ApiError::Unauthorized`] on 401 (session
    /// cleared), or the usual API/network failures.
    pub async fn add_to_cart(&self, barcode: &str) -> ApiResult<()> {
        const ENDPOINT: &str = "/cart/add";

        let token = self.bearer().await?;
        let response = self
            .http
            .get(self.url(&format!("/cart/add/{barcode}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| network_error(ENDPOINT, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match status.as_u16() {
            404 => Err(ApiError::NotFound {
                resource: "product".to_owned(),
            }),
            401 => Err(self.unauthorized("session rejected by backend").await),
            s if !status.is_success() => Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: s,
                message: detail_message(&text, "failed to add product to cart"),
            }),
            _ => Ok(()),
        }
    }

    /// Remove a product from the cart by barcode.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the barcode is not in the cart,
    /// [`ApiError::Unauthorized`] on 401 (session cleared), or the usual
    /// API/network failures.
    pub async fn remove_from_cart(&self, barcode: &str) -> ApiResult<()> {
        const ENDPOINT: &str = "/cart/remove";

        let token = self.bearer().await?;
        let response = self
            .http
            .get(self.url(&format!("/cart/remove/{barcode}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| network_error(ENDPOINT, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match status.as_u16() {
            404 => Err(ApiError::NotFound {
                resource: "product in cart".to_owned(),
            }),
            401 => Err(self.unauthorized("session rejected by backend").await),
            s if !status.is_success() => Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: s,
                message: detail_message(&text, "failed to remove product from cart"),
            }),
            _ => Ok(()),
        }
    }

    /// Save the current cart under a name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the backend has no cart to save
    /// (empty or missing), [`ApiError::Unauthorized`] on 401 (session
    /// cleared), or the usual API/network failures.
    pub async fn save_cart(&self, cart_name: &str) -> ApiResult<SaveReceipt> {
        const ENDPOINT: &str = "/cart/save";

        let token = self.bearer().await?;
        let response = self
            .http
            .post(self.url(ENDPOINT))
            .query(&[("cart_name", cart_name)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| network_error(ENDPOINT, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match status.as_u16() {
            404 => Err(ApiError::NotFound {
                resource: "cart (empty or missing)".to_owned(),
            }),
            401 => Err(self.unauthorized("session rejected by backend").await),
            s if !status.is_success() => Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: s,
                message: detail_message(&text, "failed to save cart"),
            }),
            _ => Ok(serde_json::from_str(&text).unwrap_or_default()),
        }
    }

    /// Clear the cart on the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when there is no cart to clear,
    /// [`ApiError::Unauthorized`] on 401 (session cleared), or the usual
    /// API/network failures.
    pub async fn delete_cart(&self) -> ApiResult<()> {
        const ENDPOINT: &str = "/cart/delete";

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

        match status.as_u16() {
            404 => Err(ApiError::NotFound {
                resource: "cart".to_owned(),
            }),
            401 => Err(self.unauthorized("session rejected by backend").await),
            s if !status.is_success() => Err(ApiError::Api {
                endpoint: ENDPOINT,
                status: s,
                message: detail_message(&text, "failed to clear cart"),
            }),
            _ => Ok(()),
        }
    }
}
