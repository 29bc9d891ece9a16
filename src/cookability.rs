// Copyright 2023 Remi Bernotavicius

use crate::database::models::Ingredient;
use crate::inventory::{index_by_name, normalize_name};
use crate::quantity::{has_enough, Sufficiency};
use crate::recipes::SavedRecipe;
use std::collections::{HashMap, HashSet};

fn covers(index: &HashMap<String, &Ingredient>, recipe: &SavedRecipe) -> bool {
    recipe.ingredients.iter().all(|needed| {
        let Some(have) = index.get(&normalize_name(&needed.name)) else {
            return false;
        };
        match has_enough(have.amount, have.unit, needed.amount, needed.unit) {
            Sufficiency::Sufficient => true,
            Sufficiency::Incomparable => true,
            Sufficiency::Insufficient => false,
        }
    })
}

/// Recipes the current inventory can cover in full. Ingredients held in a unit that cannot be
/// compared with the recipe's unit count as covered.
pub fn cookable_recipes<'a>(
    inventory: &[Ingredient],
    recipes: &'a [SavedRecipe],
) -> Vec<&'a SavedRecipe> {
    let index = index_by_name(inventory);
    recipes.iter().filter(|r| covers(&index, r)).collect()
}

/// Inventory records that no saved recipe uses.
pub fn forgotten_ingredients<'a>(
    inventory: &'a [Ingredient],
    recipes: &[SavedRecipe],
) -> Vec<&'a Ingredient> {
    let used: HashSet<String> = recipes
        .iter()
        .flat_map(|r| &r.ingredients)
        .map(|i| normalize_name(&i.name))
        .collect();
    inventory
        .iter()
        .filter(|i| !used.contains(&normalize_name(&i.name)))
        .collect()
}

#[cfg(test)]
use crate::fixtures::{recipe, stock};

#[test]
fn sufficient_stock_is_cookable() {
    use crate::database::models::Unit;

    let inventory = vec![stock(1, "Eggs", 6.0, Unit::Whole)];
    let recipes = vec![recipe(1, "Scrambled Eggs", &[("eggs", 3.0, Unit::Whole)])];
    assert_eq!(cookable_recipes(&inventory, &recipes), vec![&recipes[0]]);
}

#[test]
fn missing_or_short_ingredients_block() {
    use crate::database::models::Unit;

    let inventory = vec![
        stock(1, "Garlic", 2.0, Unit::Clove),
        stock(2, "Pasta", 1.0, Unit::Kilograms),
    ];
    let recipes = vec![
        recipe(1, "Aglio e Olio", &[("Pasta", 200.0, Unit::Grams), ("Garlic", 4.0, Unit::Clove)]),
        recipe(2, "Salmon", &[("Salmon", 500.0, Unit::Grams)]),
        recipe(3, "Plain Pasta", &[("PASTA", 200.0, Unit::Grams)]),
    ];
    let names: Vec<_> = cookable_recipes(&inventory, &recipes)
        .into_iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["Plain Pasta"]);
}

#[test]
fn incomparable_units_do_not_block() {
    use crate::database::models::Unit;

    let inventory = vec![stock(1, "Olive Oil", 1.0, Unit::Jar)];
    let recipes = vec![recipe(1, "Dressing", &[("Olive Oil", 2.0, Unit::Tablespoons)])];
    assert_eq!(cookable_recipes(&inventory, &recipes).len(), 1);
}

#[test]
fn adding_stock_never_makes_a_recipe_uncookable() {
    use crate::database::models::Unit;

    let recipes = vec![recipe(1, "Pasta", &[("Pasta", 200.0, Unit::Grams)])];
    let mut was_cookable = false;
    for amount in [50.0, 150.0, 199.9, 200.0, 300.0, 5_000.0] {
        let inventory = vec![stock(1, "Pasta", amount, Unit::Grams)];
        let cookable = !cookable_recipes(&inventory, &recipes).is_empty();
        assert!(cookable || !was_cookable, "{amount} grams lost cookability");
        was_cookable = cookable;
    }
    assert!(was_cookable);
}

#[test]
fn forgotten() {
    use crate::database::models::Unit;

    let inventory = vec![
        stock(1, "Eggs", 6.0, Unit::Whole),
        stock(2, "Cornstarch", 1.0, Unit::Tablespoons),
        stock(3, "Lettuce", 1.0, Unit::Head),
    ];
    let recipes = vec![recipe(1, "Scrambled Eggs", &[("EGGS", 3.0, Unit::Whole)])];
    let names: Vec<_> = forgotten_ingredients(&inventory, &recipes)
        .into_iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, vec!["Cornstarch", "Lettuce"]);
}
