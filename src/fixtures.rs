// Copyright 2023 Remi Bernotavicius

//! Plain values for tests that don't need a database.

use crate::database::models::{Ingredient, IngredientId, Location, RecipeId, Unit};
use crate::recipes::{RecipeIngredient, SavedRecipe};

pub fn date(day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

pub fn stock(id: i32, name: &str, amount: f64, unit: Unit) -> Ingredient {
    let added = date(1).and_hms_opt(9, 0, 0).unwrap();
    Ingredient {
        id: IngredientId(id),
        name: name.into(),
        amount,
        unit,
        location: Location::Fridge,
        added_date: added,
        updated_date: added,
    }
}

pub fn frozen(id: i32, name: &str, amount: f64, unit: Unit) -> Ingredient {
    Ingredient {
        location: Location::Freezer,
        ..stock(id, name, amount, unit)
    }
}

pub fn recipe(id: i32, name: &str, ingredients: &[(&str, f64, Unit)]) -> SavedRecipe {
    SavedRecipe {
        id: RecipeId(id),
        name: name.into(),
        cooking_time: "15 minutes".into(),
        ingredients: ingredients
            .iter()
            .map(|&(n, a, u)| RecipeIngredient::new(n, a, u))
            .collect(),
        instructions: String::new(),
        created_at: chrono::NaiveDateTime::default(),
    }
}
