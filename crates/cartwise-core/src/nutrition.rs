// ABOUTME: Nutrient totals calculator and limit evaluator
// ABOUTME: Reduces the cart item list into aggregate totals and flags per-nutrient violations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use serde::{Deserialize, Serialize};

use crate::models::Product;

/// The four tracked nutrient dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    /// Energy in kilocalories
    Calories,
    /// Carbohydrates in grams
    Carbs,
    /// Proteins in grams
    Proteins,
    /// Fats in grams
    Fats,
}

impl Nutrient {
    /// All tracked nutrients, in display order.
    pub const ALL: [Self; 4] = [Self::Calories, Self::Carbs, Self::Proteins, Self::Fats];

    /// Unit suffix used when rendering values of this nutrient.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Calories => "kcal",
            Self::Carbs | Self::Proteins | Self::Fats => "g",
        }
    }

    /// Parse a nutrient name from user input.
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "calories" | "kcal" | "energy" => Some(Self::Calories),
            "carbs" | "carbohydrates" => Some(Self::Carbs),
            "proteins" | "protein" => Some(Self::Proteins),
            "fats" | "fat" => Some(Self::Fats),
            _ => None,
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calories => write!(f, "calories"),
            Self::Carbs => write!(f, "carbs"),
            Self::Proteins => write!(f, "proteins"),
            Self::Fats => write!(f, "fats"),
        }
    }
}

/// Aggregate nutrient totals over the cart
///
/// Derived data: never stored, recomputed from the item list whenever it
/// changes. Invariant: each field equals the sum of the corresponding
/// nutriment over all items, with missing values counted as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    /// Total carbohydrates in grams
    pub carbs: f64,
    /// Total proteins in grams
    pub proteins: f64,
    /// Total fats in grams
    pub fats: f64,
    /// Total energy in kilocalories
    pub calories: f64,
}

impl NutrientTotals {
    /// Sum nutrient fields across all products.
    ///
    /// Missing nutriment fields count as zero; the empty list yields
    /// all-zero totals. Pure and deterministic.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |acc, item| Self {
            carbs: acc.carbs + item.nutriments.carbohydrates.unwrap_or(0.0),
            proteins: acc.proteins + item.nutriments.proteins.unwrap_or(0.0),
            fats: acc.fats + item.nutriments.fat.unwrap_or(0.0),
            calories: acc.calories + item.nutriments.energy_kcal.unwrap_or(0.0),
        })
    }

    /// Total for a single nutrient dimension.
    #[must_use]
    pub const fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Carbs => self.carbs,
            Nutrient::Proteins => self.proteins,
            Nutrient::Fats => self.fats,
        }
    }
}

/// User-configured per-nutrient ceilings that gate the save action
///
/// Values are bounded to `[0, max_for(nutrient)]`; totals are never capped
/// to limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Calorie ceiling in kilocalories
    pub calories: f64,
    /// Carbohydrate ceiling in grams
    pub carbs: f64,
    /// Protein ceiling in grams
    pub proteins: f64,
    /// Fat ceiling in grams
    pub fats: f64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            carbs: 300.0,
            proteins: 150.0,
            fats: 70.0,
        }
    }
}

impl LimitConfig {
    /// Upper bound a limit may be set to for the given nutrient.
    #[must_use]
    pub const fn max_for(nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => 4000.0,
            Nutrient::Carbs => 500.0,
            Nutrient::Proteins => 300.0,
            Nutrient::Fats => 150.0,
        }
    }

    /// Current limit for a single nutrient dimension.
    #[must_use]
    pub const fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Carbs => self.carbs,
            Nutrient::Proteins => self.proteins,
            Nutrient::Fats => self.fats,
        }
    }

    /// Set a limit, clamped to `[0, max_for(nutrient)]`.
    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        let clamped = value.clamp(0.0, Self::max_for(nutrient));
        match nutrient {
            Nutrient::Calories => self.calories = clamped,
            Nutrient::Carbs => self.carbs = clamped,
            Nutrient::Proteins => self.proteins = clamped,
            Nutrient::Fats => self.fats = clamped,
        }
    }

    /// True iff the totals strictly exceed the limit for this nutrient.
    ///
    /// Equality is not a violation.
    #[must_use]
    pub fn exceeded_by(&self, totals: &NutrientTotals, nutrient: Nutrient) -> bool {
        totals.get(nutrient) > self.get(nutrient)
    }

    /// True iff at least one nutrient dimension is strictly exceeded.
    ///
    /// Gates the save action; re-evaluated on every totals or limits
    /// change, never cached.
    #[must_use]
    pub fn any_exceeded(&self, totals: &NutrientTotals) -> bool {
        Nutrient::ALL
            .iter()
            .any(|&nutrient| self.exceeded_by(totals, nutrient))
    }

    /// The nutrients whose limits the totals strictly exceed, in display order.
    #[must_use]
    pub fn exceeded(&self, totals: &NutrientTotals) -> Vec<Nutrient> {
        Nutrient::ALL
            .iter()
            .copied()
            .filter(|&nutrient| self.exceeded_by(totals, nutrient))
            .collect()
    }
}
