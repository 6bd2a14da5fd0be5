// ABOUTME: Session object holding the bearer token with client-side expiry checking
// ABOUTME: Pluggable TokenStore persistence (in-memory for tests, file-backed for the CLI)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Persistence seam for the session token
///
/// The browser original kept the token in local storage under a fixed key;
/// here the store is explicit so tests can run fully in memory while the
/// CLI persists across invocations.
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be read.
    fn load(&self) -> io::Result<Option<String>>;

    /// Persist a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be written.
    fn save(&self, token: &str) -> io::Result<()>;

    /// Remove the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be modified.
    fn clear(&self) -> io::Result<()>;
}

/// Token store backed by a single file under the user config directory
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default token location: `<config dir>/cartwise/token`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cartwise")
            .join("token")
    }

    /// Path this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Explicit session state injected into every backend collaborator
///
/// Holds the opaque bearer token for the authenticated session. The token
/// is checked for expiry on every read; an expired token is dropped (and
/// removed from the store), forcing re-authentication.
pub struct Session {
    token: RwLock<Option<String>>,
    store: Option<Box<dyn TokenStore>>,
}

impl Session {
    /// Create a session with no persistence.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            store: None,
        }
    }

    /// Create a session backed by a token store, loading any persisted
    /// token. A persisted token that is already expired is discarded.
    #[must_use]
    pub fn with_store(store: Box<dyn TokenStore>) -> Self {
        let initial = match store.load() {
            Ok(Some(token)) if !is_expired(&token) => Some(token),
            Ok(Some(_)) => {
                debug!("persisted session token has expired, discarding");
                if let Err(e) = store.clear() {
                    warn!(error = %e, "failed to remove expired token from store");
                }
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to load persisted session token");
                None
            }
        };
        Self {
            token: RwLock::new(initial),
            store: Some(store),
        }
    }

    /// Install a new bearer token, persisting it when a store is attached.
    pub async fn set_token(&self, token: &str) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(token) {
                warn!(error = %e, "failed to persist session token");
            }
        }
        *self.token.write().await = Some(token.to_owned());
    }

    /// Current bearer token, or `None` when absent or expired.
    ///
    /// An expired token is cleared as a side effect so every caller sees
    /// the same forced-logout state.
    pub async fn bearer_token(&self) -> Option<String> {
        let current = self.token.read().await.clone();
        match current {
            Some(token) if is_expired(&token) => {
                debug!("session token expired, clearing session");
                self.clear().await;
                None
            }
            other => other,
        }
    }

    /// True when a usable (present, unexpired) token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.bearer_token().await.is_some()
    }

    /// Drop the token and remove it from the store (logout).
    pub async fn clear(&self) {
        *self.token.write().await = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "failed to clear persisted session token");
            }
        }
    }
}

/// Expiry timestamp from the token's `exp` claim, when one can be decoded.
///
/// The client holds no signing key, so this is a plain payload decode, not
/// a verification. Used only to avoid sending requests that the backend
/// would reject anyway.
#[must_use]
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    Utc.timestamp_opt(exp, 0).single()
}

/// True when the token should be treated as unusable.
///
/// A token with a past `exp` claim is expired. A token that does not decode
/// as a JWT at all is also treated as expired: the backend issues JWTs, so
/// anything else in the store is stale or corrupt and should force
/// re-authentication. A decodable token without an `exp` claim is kept.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return true,
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload) else {
        return true;
    };
    let Ok(claims) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return true;
    };
    match claims.get("exp").and_then(serde_json::Value::as_i64) {
        Some(exp) => exp <= Utc::now().timestamp(),
        None => false,
    }
}
