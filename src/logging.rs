// ABOUTME: Logging configuration and structured logging setup
// ABOUTME: tracing-subscriber initialization with RUST_LOG override and quiet test mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize structured logging for binaries.
///
/// Respects `RUST_LOG` when set, defaults to `info` otherwise. Safe to
/// call more than once; only the first call installs a subscriber.
pub fn init() {
    init_with_default("info");
}

/// Initialize structured logging with an explicit default directive.
pub fn init_with_default(default_directive: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    });
}
