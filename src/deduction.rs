// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Ingredient, RecipeId, Unit};
use crate::error::{Error, Result};
use crate::inventory::{self, index_by_name, normalize_name};
use crate::recipes;
use crate::units::{from_base, round3, to_base};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum DeductionOutcome {
    Reduced { remaining: f64, unit: Unit },
    Exhausted,
    NotInInventory,
    Incomparable,
}

/// What happened to one recipe ingredient when the recipe was cooked.
#[derive(Debug, Clone, PartialEq)]
pub struct Deduction {
    pub ingredient: String,
    pub outcome: DeductionOutcome,
}

/// Subtract a cooked recipe's ingredients from the inventory.
///
/// Best effort: an unknown recipe, an ingredient nobody has, or an ingredient held in a unit that
/// cannot be compared all leave the inventory alone. Records that reach zero are deleted. Each
/// ingredient is written on its own, so an interruption leaves the rest undeducted rather than
/// corrupt. Run this exactly once per cook.
pub fn deduct_for_recipe(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
) -> Result<Vec<Deduction>> {
    let recipe = match recipes::get(conn, recipe_id) {
        Ok(r) => r,
        Err(Error::NotFound { .. }) => {
            log::warn!("nothing to deduct, recipe #{recipe_id} no longer exists");
            return Ok(vec![]);
        }
        Err(e) => return Err(e),
    };

    let inventory = inventory::list(conn)?;
    let mut on_hand: HashMap<String, Ingredient> = index_by_name(&inventory)
        .into_iter()
        .map(|(k, v)| (k, v.clone()))
        .collect();

    let mut deductions = vec![];
    for needed in &recipe.ingredients {
        let key = normalize_name(&needed.name);
        let outcome = match on_hand.get_mut(&key) {
            None => DeductionOutcome::NotInInventory,
            Some(have) => {
                let (have_base, have_family) = to_base(have.amount, have.unit);
                let (need_base, need_family) = to_base(needed.amount, needed.unit);
                if have_family != need_family {
                    DeductionOutcome::Incomparable
                } else {
                    let remaining = round3(from_base((have_base - need_base).max(0.0), have.unit));
                    if remaining <= 0.0 {
                        inventory::delete(conn, have.id)?;
                        on_hand.remove(&key);
                        DeductionOutcome::Exhausted
                    } else {
                        inventory::set_deducted_amount(conn, have.id, remaining)?;
                        have.amount = remaining;
                        DeductionOutcome::Reduced {
                            remaining,
                            unit: have.unit,
                        }
                    }
                }
            }
        };

        match &outcome {
            DeductionOutcome::NotInInventory | DeductionOutcome::Incomparable => {
                log::debug!("skipped deducting {}: {outcome:?}", needed.name)
            }
            _ => log::info!("deducted {needed} for {}: {outcome:?}", recipe.name),
        }
        deductions.push(Deduction {
            ingredient: needed.name.clone(),
            outcome,
        });
    }
    Ok(deductions)
}

/// Record a cook: one usage event and one deduction.
pub fn cook(conn: &mut database::Connection, recipe_id: RecipeId) -> Result<Vec<Deduction>> {
    recipes::log_cooked(conn, recipe_id)?;
    deduct_for_recipe(conn, recipe_id)
}

#[cfg(test)]
fn amounts(conn: &mut database::Connection) -> Vec<(String, f64, Unit)> {
    inventory::list(conn)
        .unwrap()
        .into_iter()
        .map(|i| (i.name, i.amount, i.unit))
        .collect()
}

#[test]
fn partial_deduction() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Eggs", 6.0, Unit::Whole, None).unwrap();
    let id = recipes::add(
        &mut conn,
        &recipes::draft("Scrambled Eggs", &[("eggs", 3.0, Unit::Whole)]),
    )
    .unwrap();

    let report = deduct_for_recipe(&mut conn, id).unwrap();
    assert_eq!(
        report,
        vec![Deduction {
            ingredient: "eggs".into(),
            outcome: DeductionOutcome::Reduced {
                remaining: 3.0,
                unit: Unit::Whole
            },
        }]
    );
    assert_eq!(amounts(&mut conn), vec![("Eggs".to_string(), 3.0, Unit::Whole)]);
}

#[test]
fn exhausted_records_are_deleted() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Butter", 20.0, Unit::Grams, None).unwrap();
    inventory::add(&mut conn, "Milk", 1.0, Unit::Cups, None).unwrap();
    let id = recipes::add(
        &mut conn,
        &recipes::draft(
            "Roux",
            &[("Butter", 20.0, Unit::Grams), ("Milk", 2.0, Unit::Cups)],
        ),
    )
    .unwrap();

    deduct_for_recipe(&mut conn, id).unwrap();
    assert!(amounts(&mut conn).is_empty());
}

#[test]
fn converts_back_to_the_stored_unit() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Flour", 1.0, Unit::Kilograms, None).unwrap();
    inventory::add(&mut conn, "Milk", 1.0, Unit::Liters, None).unwrap();
    let id = recipes::add(
        &mut conn,
        &recipes::draft(
            "Pancakes",
            &[("Flour", 250.0, Unit::Grams), ("Milk", 1.0, Unit::Cups)],
        ),
    )
    .unwrap();

    deduct_for_recipe(&mut conn, id).unwrap();
    assert_eq!(
        amounts(&mut conn),
        vec![
            ("Flour".to_string(), 0.75, Unit::Kilograms),
            ("Milk".to_string(), 0.76, Unit::Liters)
        ]
    );
}

#[test]
fn skips_missing_and_incomparable() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Olive Oil", 1.0, Unit::Jar, None).unwrap();
    let id = recipes::add(
        &mut conn,
        &recipes::draft(
            "Dressing",
            &[("Olive Oil", 2.0, Unit::Tablespoons), ("Lemon", 1.0, Unit::Whole)],
        ),
    )
    .unwrap();

    let outcomes: Vec<_> = deduct_for_recipe(&mut conn, id)
        .unwrap()
        .into_iter()
        .map(|d| d.outcome)
        .collect();
    assert_eq!(
        outcomes,
        vec![DeductionOutcome::Incomparable, DeductionOutcome::NotInInventory]
    );
    assert_eq!(amounts(&mut conn), vec![("Olive Oil".to_string(), 1.0, Unit::Jar)]);
}

#[test]
fn repeated_ingredient_sees_earlier_deduction() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Garlic", 5.0, Unit::Clove, None).unwrap();
    let id = recipes::add(
        &mut conn,
        &recipes::draft(
            "Double Garlic",
            &[("Garlic", 3.0, Unit::Clove), ("garlic", 3.0, Unit::Clove)],
        ),
    )
    .unwrap();

    let report = deduct_for_recipe(&mut conn, id).unwrap();
    assert_eq!(report[1].outcome, DeductionOutcome::Exhausted);
    assert!(amounts(&mut conn).is_empty());
}

#[test]
fn unknown_recipe_is_a_no_op() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Eggs", 6.0, Unit::Whole, None).unwrap();

    assert!(deduct_for_recipe(&mut conn, RecipeId(7)).unwrap().is_empty());
    assert_eq!(amounts(&mut conn).len(), 1);
}

#[test]
fn cook_logs_and_deducts_once() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Pasta", 500.0, Unit::Grams, None).unwrap();
    let id = recipes::add(
        &mut conn,
        &recipes::draft("Pasta", &[("Pasta", 200.0, Unit::Grams)]),
    )
    .unwrap();

    cook(&mut conn, id).unwrap();
    assert_eq!(recipes::cook_history(&mut conn, id).unwrap().len(), 1);
    assert_eq!(amounts(&mut conn), vec![("Pasta".to_string(), 300.0, Unit::Grams)]);
}
