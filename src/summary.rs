// ABOUTME: HTML summary builder for the save-and-notify email
// ABOUTME: Greeting, per-item kcal list, and totals block with escaped user-controlled strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use std::fmt::Write as _;

use cartwise_core::models::{EmailRequest, Product};
use cartwise_core::nutrition::NutrientTotals;

/// Subject line of the summary email
pub const SUMMARY_SUBJECT: &str = "Your Cartwise cart summary";

/// Build the `POST /email/send` payload for a saved cart.
#[must_use]
pub fn email_request(
    to: &str,
    subject: &str,
    user_name: &str,
    items: &[Product],
    totals: &NutrientTotals,
) -> EmailRequest {
    EmailRequest {
        to: to.to_owned(),
        subject: subject.to_owned(),
        html: summary_html(user_name, items, totals),
    }
}

/// Render the HTML body: greeting, item list with calories, totals block.
///
/// Product and user names come from external systems and are escaped
/// before insertion. Calories are rendered with no decimals, grams with
/// one.
#[must_use]
pub fn summary_html(user_name: &str, items: &[Product], totals: &NutrientTotals) -> String {
    let mut item_list = String::new();
    for item in items {
        let kcal = item.nutriments.energy_kcal.unwrap_or(0.0);
        let _ = write!(
            item_list,
            "<li style=\"margin-bottom: 5px;\"><strong>{}</strong>: {kcal:.0} kcal</li>",
            html_escape::encode_text(&item.name),
        );
    }

    format!(
        "<div style=\"font-family: Arial, sans-serif; color: #333;\">\
         <h1>Hello, {name}!</h1>\
         <p>Thanks for using Cartwise. Here is the summary of your saved cart:</p>\
         <h3>Items in your cart:</h3>\
         <ul>{item_list}</ul>\
         <hr style=\"margin: 20px 0; border: 1px solid #eee;\" />\
         <h3>Total nutritional summary:</h3>\
         <p><strong>Calories:</strong> {calories:.0} kcal</p>\
         <p><strong>Carbohydrates:</strong> {carbs:.1}g</p>\
         <p><strong>Proteins:</strong> {proteins:.1}g</p>\
         <p><strong>Fats:</strong> {fats:.1}g</p>\
         <p style=\"font-size: 12px; color: #888; margin-top: 30px;\">\
         This is an automated email from your Cartwise cart.</p>\
         </div>",
        name = html_escape::encode_text(user_name),
        calories = totals.calories,
        carbs = totals.carbs,
        proteins = totals.proteins,
        fats = totals.fats,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cartwise_core::models::Nutriments;

    use super::*;

    fn product(name: &str, kcal: f64) -> Product {
        Product {
            code: "0000".to_owned(),
            name: name.to_owned(),
            nutriments: Nutriments {
                energy_kcal: Some(kcal),
                ..Nutriments::default()
            },
        }
    }

    #[test]
    fn lists_every_item_with_calories() {
        let items = vec![product("Oat flakes", 389.0), product("Milk", 64.0)];
        let totals = NutrientTotals {
            calories: 453.0,
            carbs: 71.0,
            proteins: 16.5,
            fats: 10.2,
        };

        let html = summary_html("Ada", &items, &totals);
        assert!(html.contains("Hello, Ada!"));
        assert!(html.contains("<strong>Oat flakes</strong>: 389 kcal"));
        assert!(html.contains("<strong>Milk</strong>: 64 kcal"));
        assert!(html.contains("<strong>Calories:</strong> 453 kcal"));
        assert!(html.contains("<strong>Proteins:</strong> 16.5g"));
    }

    #[test]
    fn escapes_user_controlled_names() {
        let items = vec![product("<script>alert(1)</script>", 10.0)];
        let totals = NutrientTotals::default();

        let html = summary_html("A & B", &items, &totals);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Hello, A &amp; B!"));
    }

    #[test]
    fn missing_kcal_renders_as_zero() {
        let items = vec![Product {
            code: "1".to_owned(),
            name: "Water".to_owned(),
            nutriments: Nutriments::default(),
        }];

        let html = summary_html("Ada", &items, &NutrientTotals::default());
        assert!(html.contains("<strong>Water</strong>: 0 kcal"));
    }
}
