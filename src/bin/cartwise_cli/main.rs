// ABOUTME: Cartwise CLI - command-line front-end for the cart session controller
// ABOUTME: Handles authentication, cart mutations, limits, and the save-and-notify flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise
//!
//! Usage:
//! ```bash
//! # Create an account and log in
//! cartwise-cli register --name Ada --email ada@example.com --password secret
//! cartwise-cli login --email ada@example.com --password secret
//!
//! # Work with the cart
//! cartwise-cli cart add 3017620422003
//! cartwise-cli cart show
//! cartwise-cli cart remove 3017620422003
//! cartwise-cli cart save --name "Weekly groceries"
//!
//! # Nutrition limits
//! cartwise-cli limits show
//! cartwise-cli limits set calories 1800
//!
//! # Saved carts
//! cartwise-cli carts
//! ```

mod commands;
mod helpers;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use cartwise::client::ApiClient;
use cartwise::config::ClientConfig;
use cartwise::logging;
use cartwise::session::{FileTokenStore, Session};

#[derive(Parser)]
#[command(
    name = "cartwise-cli",
    about = "Cartwise smart shopping cart CLI",
    long_about = "Command-line front-end for the Cartwise nutrition-tracking cart: authenticate, scan barcodes, watch totals against your limits, and save carts."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL override
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create a new account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address (also the login username)
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Log in and persist the session token
    Login {
        /// Email address
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Drop the persisted session token
    Logout,

    /// Show the authenticated user
    Me,

    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },

    /// Nutrition limit configuration
    Limits {
        #[command(subcommand)]
        action: LimitsCommand,
    },

    /// List previously saved carts
    Carts,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum CartCommand {
    /// Show cart contents, totals, and limit status
    Show,

    /// Add a product by barcode
    Add {
        /// Product barcode (EAN/UPC)
        barcode: String,
    },

    /// Remove a product by barcode
    Remove {
        /// Product barcode (EAN/UPC)
        barcode: String,
    },

    /// Clear the cart
    Clear,

    /// Save the cart and email a summary when possible
    Save {
        /// Name to save the cart under
        #[arg(long, default_value = "My Smart Cart")]
        name: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum LimitsCommand {
    /// Show the configured limits
    Show,

    /// Set one limit (clamped to its fixed maximum)
    Set {
        /// Nutrient: calories, carbs, proteins, or fats
        nutrient: String,

        /// New limit value
        value: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = &cli.api_url {
        config = config.with_base_url(api_url);
    }

    let store = FileTokenStore::new(helpers::state_dir().join("token"));
    let session = Arc::new(Session::with_store(Box::new(store)));
    let client = ApiClient::new(&config, session);

    commands::run(cli.command, client).await
}
