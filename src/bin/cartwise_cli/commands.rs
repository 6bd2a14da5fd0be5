// ABOUTME: Command implementations for the Cartwise CLI
// ABOUTME: Wires parsed arguments to the API client and cart session controller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use std::process::ExitCode;

use cartwise::client::ApiClient;
use cartwise::controller::CartController;
use cartwise::notifications::Notification;
use cartwise_core::nutrition::{LimitConfig, Nutrient, NutrientTotals};

use crate::helpers;
use crate::{CartCommand, Command, LimitsCommand};

/// Dispatch a parsed command. Operation failures are rendered as the same
/// transient notifications a UI would show and reported via the exit code;
/// only unexpected local failures (state file I/O) bubble up as errors.
pub async fn run(command: Command, client: ApiClient) -> anyhow::Result<ExitCode> {
    match command {
        Command::Register {
            name,
            email,
            password,
        } => register(&client, &name, &email, &password).await,
        Command::Login { email, password } => login(&client, &email, &password).await,
        Command::Logout => {
            client.logout().await;
            println!("Logged out.");
            Ok(ExitCode::SUCCESS)
        }
        Command::Me => me(&client).await,
        Command::Carts => carts(&client).await,
        Command::Cart { action } => cart(client, action).await,
        Command::Limits { action } => limits(action),
    }
}

async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<ExitCode> {
    match client.register(name, email, password).await {
        Ok(user) => {
            println!("Registered {} <{}>. You can log in now.", user.name, email);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(helpers::fail(&Notification::from(&e))),
    }
}

async fn login(client: &ApiClient, email: &str, password: &str) -> anyhow::Result<ExitCode> {
    match client.login(email, password).await {
        Ok(()) => {
            println!("Logged in as {email}.");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(helpers::fail(&Notification::from(&e))),
    }
}

async fn me(client: &ApiClient) -> anyhow::Result<ExitCode> {
    match client.current_user().await {
        Ok(user) => {
            let email = user.email.as_deref().unwrap_or("no email on file");
            println!("{} <{}>, {} saved cart(s)", user.name, email, user.carts.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(helpers::fail(&Notification::from(&e))),
    }
}

async fn carts(client: &ApiClient) -> anyhow::Result<ExitCode> {
    let user = match client.current_user().await {
        Ok(user) => user,
        Err(e) => return Ok(helpers::fail(&Notification::from(&e))),
    };

    if user.carts.is_empty() {
        println!("No saved carts.");
        return Ok(ExitCode::SUCCESS);
    }

    for cart in &user.carts {
        let totals = NutrientTotals::from_products(&cart.cart_data);
        println!(
            "#{} {:24} {} item(s), {:.0} kcal",
            cart.id,
            cart.name,
            cart.cart_data.len(),
            totals.calories
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn cart(client: ApiClient, action: CartCommand) -> anyhow::Result<ExitCode> {
    let controller = CartController::with_limits(client, helpers::load_limits());

    // Every cart command starts from the authoritative backend snapshot.
    if let Err(e) = controller.load_cart().await {
        return Ok(helpers::fail(&Notification::from(&e)));
    }

    match action {
        CartCommand::Show => {
            helpers::print_cart(&controller);
            Ok(ExitCode::SUCCESS)
        }
        CartCommand::Add { barcode } => match controller.add_product(&barcode).await {
            Ok(product) => {
                helpers::print_notification(&Notification::product_added(&product));
                helpers::print_cart(&controller);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(helpers::fail(&Notification::from(&e))),
        },
        CartCommand::Remove { barcode } => match controller.remove_product(&barcode).await {
            Ok(Some(product)) => {
                helpers::print_notification(&Notification::product_removed(&product));
                Ok(ExitCode::SUCCESS)
            }
            Ok(None) => {
                println!("Removed {barcode} from your cart.");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(helpers::fail(&Notification::from(&e))),
        },
        CartCommand::Clear => match controller.clear_cart().await {
            Ok(()) => {
                println!("Cart cleared.");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(helpers::fail(&Notification::from(&e))),
        },
        CartCommand::Save { name } => match controller.save_and_notify(&name).await {
            Ok(outcome) => {
                helpers::print_notification(&Notification::save_outcome(&outcome));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(helpers::fail(&Notification::from(&e))),
        },
    }
}

fn limits(action: LimitsCommand) -> anyhow::Result<ExitCode> {
    match action {
        LimitsCommand::Show => {
            let limits = helpers::load_limits();
            for nutrient in Nutrient::ALL {
                println!(
                    "{:9} {:>6.0} {} (max {:.0})",
                    nutrient.to_string(),
                    limits.get(nutrient),
                    nutrient.unit(),
                    LimitConfig::max_for(nutrient)
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        LimitsCommand::Set { nutrient, value } => {
            let Some(nutrient) = Nutrient::from_name(&nutrient) else {
                eprintln!("Unknown nutrient '{nutrient}'. Use calories, carbs, proteins, or fats.");
                return Ok(ExitCode::FAILURE);
            };

            let mut limits = helpers::load_limits();
            limits.set(nutrient, value);
            helpers::save_limits(&limits)?;
            println!(
                "{} limit set to {:.0} {}.",
                nutrient,
                limits.get(nutrient),
                nutrient.unit()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}
