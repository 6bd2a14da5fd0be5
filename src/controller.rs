// ABOUTME: Cart session controller: owns the item list and limit configuration
// ABOUTME: Serializes mutations through a single-flight guard and orchestrates save-and-notify
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

//! Cart session controller
//!
//! One controller instance per session. The controller treats the backend
//! as the source of truth: after every successful mutation the whole cart
//! is re-fetched, never locally patched. Totals and violation state are
//! derived on every read, never cached.
//!
//! Overlapping operations are rejected through an explicit single-flight
//! guard ([`SessionError::Busy`]) instead of relying on callers to keep
//! their own busy flags.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use cartwise_core::errors::ApiError;
use cartwise_core::models::Product;
use cartwise_core::nutrition::{LimitConfig, Nutrient, NutrientTotals};

use crate::client::ApiClient;
use crate::errors::{SessionError, SessionResult};
use crate::summary::{self, SUMMARY_SUBJECT};

/// Observable lifecycle state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Initial state before the first cart load completes
    Loading,
    /// Idle, item list reflects the last successful fetch
    Ready,
    /// An add/remove/clear round trip is in flight
    Mutating,
    /// A save-and-notify flow is in flight
    Saving,
}

/// Outcome of a successful save
///
/// The save itself failing is a fatal error for the call, not an outcome;
/// everything after the save is non-fatal and reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Cart saved and the summary email was accepted for delivery
    SavedAndEmailed {
        /// Address the summary was sent to
        recipient: String,
    },
    /// Cart saved; the user has no email on file, so none was sent
    SavedNoEmail,
    /// Cart saved; building or sending the summary failed afterwards
    SavedEmailFailed {
        /// Why the email step failed
        reason: String,
    },
}

struct State {
    items: Vec<Product>,
    limits: LimitConfig,
    phase: SessionPhase,
}

/// Cart session controller
pub struct CartController {
    client: ApiClient,
    state: RwLock<State>,
    // Single-flight guard: at most one mutation/save in flight per
    // controller. try_lock, never lock - overlap is an error, not a queue.
    op_guard: Mutex<()>,
}

impl CartController {
    /// Create a controller with default limits. Starts in
    /// [`SessionPhase::Loading`] until the first [`Self::load_cart`] call
    /// completes.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self::with_limits(client, LimitConfig::default())
    }

    /// Create a controller with a previously persisted limit configuration.
    #[must_use]
    pub fn with_limits(client: ApiClient, limits: LimitConfig) -> Self {
        Self {
            client,
            state: RwLock::new(State {
                items: Vec::new(),
                limits,
                phase: SessionPhase::Loading,
            }),
            op_guard: Mutex::new(()),
        }
    }

    /// The API client this controller drives.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // ── Derived read-only state ─────────────────────────────────────────

    /// Current item list (insertion order), as of the last refresh.
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.read().items.clone()
    }

    /// Aggregate nutrient totals, recomputed from the current item list.
    #[must_use]
    pub fn totals(&self) -> NutrientTotals {
        NutrientTotals::from_products(&self.read().items)
    }

    /// Current limit configuration.
    #[must_use]
    pub fn limits(&self) -> LimitConfig {
        self.read().limits
    }

    /// True iff any nutrient total strictly exceeds its limit.
    #[must_use]
    pub fn any_exceeded(&self) -> bool {
        let state = self.read();
        state
            .limits
            .any_exceeded(&NutrientTotals::from_products(&state.items))
    }

    /// The nutrient dimensions currently over their limit.
    #[must_use]
    pub fn exceeded_nutrients(&self) -> Vec<Nutrient> {
        let state = self.read();
        state
            .limits
            .exceeded(&NutrientTotals::from_products(&state.items))
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.read().phase
    }

    /// Set one nutrient limit, clamped to its fixed maximum. Pure local
    /// mutation; violation state is re-derived on the next read.
    pub fn set_limit(&self, nutrient: Nutrient, value: f64) {
        self.write().limits.set(nutrient, value);
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Fetch the cart from the backend and replace the local item list.
    ///
    /// Single attempt, no retry loop. On failure the previous items are
    /// kept and the controller stays usable (degraded); the caller may
    /// re-invoke.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] when another operation is in flight,
    /// or the underlying API failure.
    #[instrument(skip(self))]
    pub async fn load_cart(&self) -> SessionResult<()> {
        let _guard = self.op_guard.try_lock().map_err(|_| SessionError::Busy)?;

        let result = self.refresh().await;
        self.set_phase(SessionPhase::Ready);
        if let Err(e) = &result {
            warn!(error = %e, "cart load failed, keeping previous items");
        }
        result.map_err(SessionError::from)
    }

    /// Add a product by barcode, then re-fetch the authoritative cart.
    ///
    /// Returns the added product (resolved from the refreshed snapshot)
    /// for the confirmation notification.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty barcode (no network call),
    /// [`ApiError::NotFound`] when the product database does not know the
    /// barcode, [`SessionError::Busy`] on overlap, or the underlying API
    /// failure.
    #[instrument(skip(self))]
    pub async fn add_product(&self, barcode: &str) -> SessionResult<Product> {
        let _guard = self.op_guard.try_lock().map_err(|_| SessionError::Busy)?;

        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(SessionError::Api(ApiError::Validation {
                reason: "barcode must not be empty".to_owned(),
            }));
        }

        self.set_phase(SessionPhase::Mutating);
        let result = self.add_product_inner(barcode).await;
        self.set_phase(SessionPhase::Ready);
        result
    }

    async fn add_product_inner(&self, barcode: &str) -> SessionResult<Product> {
        self.client.add_to_cart(barcode).await?;
        self.refresh().await?;

        let added = self
            .read()
            .items
            .iter()
            .find(|p| p.code == barcode)
            .cloned();
        match added {
            Some(product) => {
                info!(barcode, name = %product.name, "product added to cart");
                Ok(product)
            }
            None => Err(SessionError::MissingAfterRefresh {
                barcode: barcode.to_owned(),
            }),
        }
    }

    /// Remove a product by barcode, then re-fetch the authoritative cart.
    ///
    /// The local item list is consulted only to return the product (for
    /// the removal notification); the removal itself is authoritative on
    /// the backend. Failure leaves local state unchanged and triggers no
    /// refresh.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the barcode is not in the cart,
    /// [`SessionError::Busy`] on overlap, or the underlying API failure.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, barcode: &str) -> SessionResult<Option<Product>> {
        let _guard = self.op_guard.try_lock().map_err(|_| SessionError::Busy)?;

        // Name lookup before the round trip; the entry is gone afterwards.
        let removed = self.read().items.iter().find(|p| p.code == barcode).cloned();

        self.set_phase(SessionPhase::Mutating);
        let result = self.remove_product_inner(barcode).await;
        self.set_phase(SessionPhase::Ready);
        result?;

        if let Some(product) = &removed {
            info!(barcode, name = %product.name, "product removed from cart");
        }
        Ok(removed)
    }

    async fn remove_product_inner(&self, barcode: &str) -> SessionResult<()> {
        self.client.remove_from_cart(barcode).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Clear the cart on the backend, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] on overlap or the underlying API
    /// failure.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> SessionResult<()> {
        let _guard = self.op_guard.try_lock().map_err(|_| SessionError::Busy)?;

        self.set_phase(SessionPhase::Mutating);
        let result = async {
            self.client.delete_cart().await?;
            self.refresh().await?;
            Ok(())
        }
        .await;
        self.set_phase(SessionPhase::Ready);
        result
    }

    /// Save the cart and email a summary to the user when possible.
    ///
    /// Precondition: no nutrient limit is exceeded - otherwise the call
    /// fails fast with [`SessionError::LimitsExceeded`] and no network
    /// call is issued. The email step is non-fatal: once the save has
    /// succeeded the result is always `Ok` with the outcome describing
    /// what happened to the summary.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] on overlap (including re-entrant
    /// saves), [`SessionError::LimitsExceeded`] when the limit gate
    /// blocks, or the underlying API failure when the save itself fails.
    #[instrument(skip(self))]
    pub async fn save_and_notify(&self, cart_name: &str) -> SessionResult<SaveOutcome> {
        let _guard = self.op_guard.try_lock().map_err(|_| SessionError::Busy)?;

        let exceeded = self.exceeded_nutrients();
        if !exceeded.is_empty() {
            return Err(SessionError::LimitsExceeded { exceeded });
        }

        self.set_phase(SessionPhase::Saving);
        let result = self.save_and_notify_inner(cart_name).await;
        self.set_phase(SessionPhase::Ready);
        result
    }

    async fn save_and_notify_inner(&self, cart_name: &str) -> SessionResult<SaveOutcome> {
        self.client.save_cart(cart_name).await?;
        info!(cart_name, "cart saved");

        // From here on nothing is allowed to fail the call: the save is
        // durable and is never rolled back.
        let user = match self.client.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "cart saved but user lookup failed, skipping email");
                return Ok(SaveOutcome::SavedEmailFailed {
                    reason: format!("could not fetch user for summary email: {e}"),
                });
            }
        };

        let Some(recipient) = user.email.clone() else {
            info!("cart saved, no email on file");
            return Ok(SaveOutcome::SavedNoEmail);
        };

        let (items, totals) = {
            let state = self.read();
            let totals = NutrientTotals::from_products(&state.items);
            (state.items.clone(), totals)
        };
        let request =
            summary::email_request(&recipient, SUMMARY_SUBJECT, &user.name, &items, &totals);

        match self.client.send_email(&request).await {
            Ok(()) => {
                info!(recipient, "cart saved and summary emailed");
                Ok(SaveOutcome::SavedAndEmailed { recipient })
            }
            Err(e) => {
                warn!(error = %e, "cart saved but summary email failed");
                Ok(SaveOutcome::SavedEmailFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Replace the item list with the authoritative backend snapshot.
    async fn refresh(&self) -> Result<(), ApiError> {
        let snapshot = self.client.fetch_cart().await?;
        self.write().items = snapshot.products;
        Ok(())
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.write().phase = phase;
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
