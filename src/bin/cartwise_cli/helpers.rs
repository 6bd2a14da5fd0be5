// ABOUTME: CLI helpers: state directory, persisted limit configuration, console rendering
// ABOUTME: Limits live next to the session token under the user config dir
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use tracing::warn;

use cartwise::controller::CartController;
use cartwise::notifications::{Notification, Severity};
use cartwise_core::nutrition::{LimitConfig, Nutrient};

/// Directory holding the session token and the persisted limits.
pub fn state_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cartwise")
}

fn limits_path() -> PathBuf {
    state_dir().join("limits.json")
}

/// Load the persisted limit configuration, falling back to the defaults
/// when none exists or it cannot be parsed.
pub fn load_limits() -> LimitConfig {
    let path = limits_path();
    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "unreadable limits file, using defaults");
            LimitConfig::default()
        }),
        Err(_) => LimitConfig::default(),
    }
}

/// Persist the limit configuration.
pub fn save_limits(limits: &LimitConfig) -> anyhow::Result<()> {
    let path = limits_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(limits)?;
    fs::write(&path, raw).with_context(|| format!("writing {}", path.display()))
}

/// Render a transient notification on the console.
pub fn print_notification(notification: &Notification) {
    let tag = match notification.severity {
        Severity::Info => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
    };
    println!("[{tag}] {}: {}", notification.title, notification.description);
}

/// Render a failure notification and produce the failing exit code.
pub fn fail(notification: &Notification) -> ExitCode {
    print_notification(notification);
    ExitCode::FAILURE
}

/// Render cart contents, totals, and per-nutrient limit status.
pub fn print_cart(controller: &CartController) {
    let items = controller.items();
    if items.is_empty() {
        println!("Your cart is empty. Add any barcode to get started!");
        return;
    }

    println!("Cart ({} item(s)):", items.len());
    for item in &items {
        let name = if item.name.is_empty() {
            item.code.as_str()
        } else {
            item.name.as_str()
        };
        println!(
            "  {:13} {:32} {:>7.0} kcal",
            item.code,
            name,
            item.nutriments.energy_kcal.unwrap_or(0.0)
        );
    }

    let totals = controller.totals();
    let limits = controller.limits();
    println!("Totals:");
    for nutrient in Nutrient::ALL {
        let marker = if limits.exceeded_by(&totals, nutrient) {
            "  EXCEEDED"
        } else {
            ""
        };
        println!(
            "  {:9} {:>8.1} / {:.0} {}{marker}",
            nutrient.to_string(),
            totals.get(nutrient),
            limits.get(nutrient),
            nutrient.unit()
        );
    }

    if controller.any_exceeded() {
        println!("Limits exceeded: adjust your cart or limits before saving.");
    }
}
