// Copyright 2023 Remi Bernotavicius

//! A small sample household so a fresh database has something to plan with.

use crate::database;
use crate::database::models::{Location, Unit};
use crate::error::Result;
use crate::inventory;
use crate::recipes::{self, RecipeDraft, RecipeIngredient};

const INGREDIENTS: &[(&str, f64, Unit, Location)] = &[
    ("Eggs", 6.0, Unit::Whole, Location::Fridge),
    ("Milk", 2.0, Unit::Cups, Location::Fridge),
    ("Butter", 200.0, Unit::Grams, Location::Fridge),
    ("Pasta", 500.0, Unit::Grams, Location::Pantry),
    ("Tomatoes", 4.0, Unit::Whole, Location::Fridge),
    ("Garlic", 5.0, Unit::Clove, Location::Pantry),
    ("Olive Oil", 1.0, Unit::Cups, Location::Pantry),
    ("Chicken Breast", 500.0, Unit::Grams, Location::Freezer),
    ("Onion", 2.0, Unit::Whole, Location::Pantry),
    ("Cornstarch", 1.0, Unit::Tablespoons, Location::Pantry),
    ("Lettuce", 1.0, Unit::Head, Location::Fridge),
];

struct SampleRecipe {
    name: &'static str,
    cooking_time: &'static str,
    ingredients: &'static [(&'static str, f64, Unit)],
    instructions: &'static str,
    cooked_days_ago: &'static [u64],
}

const RECIPES: &[SampleRecipe] = &[
    SampleRecipe {
        name: "Scrambled Eggs",
        cooking_time: "10 minutes",
        ingredients: &[
            ("Eggs", 3.0, Unit::Whole),
            ("Milk", 0.25, Unit::Cups),
            ("Butter", 20.0, Unit::Grams),
        ],
        instructions: "1. Whisk eggs and milk together. 2. Melt butter in a pan over low heat. \
                       3. Add egg mixture and stir gently until just set.",
        cooked_days_ago: &[1, 4, 8, 13],
    },
    SampleRecipe {
        name: "Spaghetti Aglio e Olio",
        cooking_time: "20 minutes",
        ingredients: &[
            ("Pasta", 200.0, Unit::Grams),
            ("Garlic", 4.0, Unit::Clove),
            ("Olive Oil", 0.25, Unit::Cups),
        ],
        instructions: "1. Cook pasta in salted boiling water. 2. Slice garlic thinly and saute in \
                       olive oil until golden. 3. Toss drained pasta with garlic oil.",
        cooked_days_ago: &[2, 6, 11],
    },
    SampleRecipe {
        name: "Garlic Butter Chicken",
        cooking_time: "35 minutes",
        ingredients: &[
            ("Chicken Breast", 500.0, Unit::Grams),
            ("Butter", 30.0, Unit::Grams),
            ("Garlic", 3.0, Unit::Clove),
            ("Olive Oil", 2.0, Unit::Tablespoons),
        ],
        instructions: "1. Season chicken with salt and pepper. 2. Heat olive oil in a pan. \
                       3. Cook chicken 6-7 minutes per side. 4. Baste with butter and garlic.",
        cooked_days_ago: &[3, 9],
    },
    SampleRecipe {
        name: "Tomato Pasta",
        cooking_time: "25 minutes",
        ingredients: &[
            ("Pasta", 200.0, Unit::Grams),
            ("Tomatoes", 3.0, Unit::Whole),
            ("Garlic", 2.0, Unit::Clove),
            ("Olive Oil", 3.0, Unit::Tablespoons),
            ("Onion", 1.0, Unit::Whole),
        ],
        instructions: "1. Dice tomatoes and onion. 2. Saute garlic and onion in olive oil. \
                       3. Add tomatoes and simmer 10 minutes. 4. Toss with cooked pasta.",
        cooked_days_ago: &[7],
    },
    SampleRecipe {
        name: "Lemon Herb Salmon",
        cooking_time: "25 minutes",
        ingredients: &[
            ("Salmon", 500.0, Unit::Grams),
            ("Lemon", 2.0, Unit::Whole),
            ("Butter", 30.0, Unit::Grams),
            ("Garlic", 2.0, Unit::Clove),
        ],
        instructions: "1. Season salmon. 2. Melt butter in a pan. 3. Cook salmon 4 minutes each \
                       side. 4. Add garlic and squeeze lemon over the top.",
        cooked_days_ago: &[],
    },
];

/// Fill empty tables with the sample household. Tables that already hold data are left alone.
/// Returns whether anything was written.
pub fn seed(conn: &mut database::Connection) -> Result<bool> {
    let mut wrote = false;

    if inventory::list(conn)?.is_empty() {
        for &(name, amount, unit, location) in INGREDIENTS {
            inventory::add(conn, name, amount, unit, Some(location))?;
        }
        wrote = true;
    }

    if recipes::list(conn)?.is_empty() {
        let now = chrono::Local::now().naive_local();
        for sample in RECIPES {
            let draft = RecipeDraft {
                name: sample.name.into(),
                cooking_time: sample.cooking_time.into(),
                ingredients: sample
                    .ingredients
                    .iter()
                    .map(|&(n, a, u)| RecipeIngredient::new(n, a, u))
                    .collect(),
                instructions: sample.instructions.into(),
            };
            let id = recipes::add(conn, &draft)?;
            for &days in sample.cooked_days_ago {
                let when = now
                    .checked_sub_days(chrono::Days::new(days))
                    .unwrap_or(now);
                recipes::log_cooked_at(conn, id, when)?;
            }
        }
        wrote = true;
    }

    Ok(wrote)
}

#[test]
fn seeds_once() {
    use crate::cookability::{cookable_recipes, forgotten_ingredients};

    let mut conn = database::establish_in_memory();
    assert!(seed(&mut conn).unwrap());
    assert!(!seed(&mut conn).unwrap());

    let inventory = inventory::list(&mut conn).unwrap();
    let recipes = recipes::list(&mut conn).unwrap();
    assert_eq!(inventory.len(), INGREDIENTS.len());
    assert_eq!(recipes.len(), RECIPES.len());

    let forgotten: Vec<_> = forgotten_ingredients(&inventory, &recipes)
        .into_iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(forgotten, vec!["Cornstarch", "Lettuce"]);

    let cookable: Vec<_> = cookable_recipes(&inventory, &recipes)
        .into_iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(
        cookable,
        vec![
            "Garlic Butter Chicken",
            "Scrambled Eggs",
            "Spaghetti Aglio e Olio",
            "Tomato Pasta"
        ]
    );

    assert_eq!(
        recipes::most_cooked(&mut conn, 1).unwrap(),
        vec![("Scrambled Eggs".to_string(), 4)]
    );
}
