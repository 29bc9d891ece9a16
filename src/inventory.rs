// Copyright 2023 Remi Bernotavicius

//! What is currently in the house.
//!
//! Records are matched to recipe ingredients by name only, compared case-insensitively. Nothing
//! enforces that names are unique; when two records share a name the one with the lowest id is
//! the one every lookup finds. Renaming a record severs its link to recipes using the old name.

use crate::database;
use crate::database::models::{Ingredient, IngredientId, Location, NewIngredient, Unit};
use crate::error::{validate_amount, validate_name, Error, Result};
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashMap;

/// The key names are compared by.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Index inventory records by normalized name. The lowest id wins when names collide.
pub fn index_by_name(inventory: &[Ingredient]) -> HashMap<String, &Ingredient> {
    let mut index: HashMap<String, &Ingredient> = HashMap::new();
    for ingredient in inventory {
        index
            .entry(normalize_name(&ingredient.name))
            .and_modify(|existing| {
                if ingredient.id < existing.id {
                    *existing = ingredient;
                }
            })
            .or_insert(ingredient);
    }
    index
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn list(conn: &mut database::Connection) -> Result<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    Ok(ingredients
        .select(Ingredient::as_select())
        .order((name.asc(), id.asc()))
        .load(conn)?)
}

pub fn get(conn: &mut database::Connection, ingredient_id: IngredientId) -> Result<Ingredient> {
    use database::schema::ingredients::dsl::*;
    use diesel::prelude::OptionalExtension as _;

    ingredients
        .select(Ingredient::as_select())
        .filter(id.eq(ingredient_id))
        .get_result(conn)
        .optional()?
        .ok_or(Error::NotFound {
            entity: "ingredient",
            id: ingredient_id.0,
        })
}

pub fn find_by_name(
    conn: &mut database::Connection,
    ingredient_name: &str,
) -> Result<Option<Ingredient>> {
    let inventory = list(conn)?;
    Ok(index_by_name(&inventory)
        .get(&normalize_name(ingredient_name))
        .map(|&i| i.clone()))
}

pub fn add(
    conn: &mut database::Connection,
    new_name: &str,
    new_amount: f64,
    new_unit: Unit,
    new_location: Option<Location>,
) -> Result<IngredientId> {
    use database::schema::ingredients::dsl::*;
    use diesel::insert_into;

    validate_name("ingredient", new_name)?;
    validate_amount(new_name, new_amount)?;

    let timestamp = now();
    let new_ingredient = NewIngredient {
        name: new_name.trim(),
        amount: new_amount,
        unit: new_unit,
        location: new_location.unwrap_or_default(),
        added_date: timestamp,
        updated_date: timestamp,
    };
    insert_into(ingredients)
        .values(&new_ingredient)
        .execute(conn)?;
    let new_id = IngredientId(database::last_insert_id(conn)?);

    log::info!(
        "added {} {} of {} to the {} as #{new_id}",
        new_ingredient.amount,
        new_ingredient.unit,
        new_ingredient.name,
        new_ingredient.location
    );
    Ok(new_id)
}

pub fn update_amount(
    conn: &mut database::Connection,
    edit_id: IngredientId,
    new_amount: f64,
    new_location: Option<Location>,
) -> Result<()> {
    use database::schema::ingredients::dsl::*;
    use diesel::update;

    validate_amount(&format!("ingredient #{edit_id}"), new_amount)?;

    let target = update(ingredients).filter(id.eq(edit_id));
    let rows = match new_location {
        Some(l) => target
            .set((amount.eq(new_amount), location.eq(l), updated_date.eq(now())))
            .execute(conn)?,
        None => target
            .set((amount.eq(new_amount), updated_date.eq(now())))
            .execute(conn)?,
    };
    if rows == 0 {
        return Err(Error::NotFound {
            entity: "ingredient",
            id: edit_id.0,
        });
    }

    log::info!("ingredient #{edit_id} now has amount {new_amount}");
    Ok(())
}

/// Write an amount computed by a deduction. Validation happened on the way in.
pub(crate) fn set_deducted_amount(
    conn: &mut database::Connection,
    edit_id: IngredientId,
    new_amount: f64,
) -> Result<()> {
    use database::schema::ingredients::dsl::*;
    use diesel::update;

    update(ingredients)
        .filter(id.eq(edit_id))
        .set((amount.eq(new_amount), updated_date.eq(now())))
        .execute(conn)?;
    Ok(())
}

pub fn delete(conn: &mut database::Connection, delete_id: IngredientId) -> Result<()> {
    use database::schema::ingredients::dsl::*;
    use diesel::delete;

    let rows = delete(ingredients.filter(id.eq(delete_id))).execute(conn)?;
    if rows == 0 {
        return Err(Error::NotFound {
            entity: "ingredient",
            id: delete_id.0,
        });
    }

    log::info!("removed ingredient #{delete_id}");
    Ok(())
}

#[test]
fn add_list_update_delete() {
    let mut conn = database::establish_in_memory();

    let eggs = add(&mut conn, "Eggs", 6.0, Unit::Whole, None).unwrap();
    let peas = add(&mut conn, " Peas ", 400.0, Unit::Grams, Some(Location::Freezer)).unwrap();

    let all = list(&mut conn).unwrap();
    assert_eq!(
        all.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        vec!["Eggs", "Peas"]
    );
    assert_eq!(all[0].location, Location::Fridge);
    assert_eq!(all[1].location, Location::Freezer);
    assert_eq!(all[0].added_date, all[0].updated_date);

    update_amount(&mut conn, eggs, 12.0, Some(Location::Pantry)).unwrap();
    let updated = get(&mut conn, eggs).unwrap();
    assert_eq!(updated.amount, 12.0);
    assert_eq!(updated.location, Location::Pantry);
    assert_eq!(updated.added_date, all[0].added_date);
    assert!(updated.updated_date >= all[0].updated_date);

    update_amount(&mut conn, peas, 250.0, None).unwrap();
    assert_eq!(get(&mut conn, peas).unwrap().location, Location::Freezer);

    delete(&mut conn, eggs).unwrap();
    assert_eq!(list(&mut conn).unwrap().len(), 1);
}

#[test]
fn missing_ids_are_not_found() {
    let mut conn = database::establish_in_memory();

    assert!(matches!(
        update_amount(&mut conn, IngredientId(42), 1.0, None),
        Err(Error::NotFound { id: 42, .. })
    ));
    assert!(matches!(
        delete(&mut conn, IngredientId(42)),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(get(&mut conn, IngredientId(42)), Err(Error::NotFound { .. })));
}

#[test]
fn invalid_input_writes_nothing() {
    let mut conn = database::establish_in_memory();

    for (n, a) in [("", 1.0), ("  ", 1.0), ("Milk", 0.0), ("Milk", -2.0), ("Milk", f64::NAN)] {
        assert!(matches!(
            add(&mut conn, n, a, Unit::Cups, None),
            Err(Error::Validation(_))
        ));
    }
    assert!(list(&mut conn).unwrap().is_empty());

    let milk = add(&mut conn, "Milk", 2.0, Unit::Cups, None).unwrap();
    assert!(matches!(
        update_amount(&mut conn, milk, 0.0, None),
        Err(Error::Validation(_))
    ));
    assert_eq!(get(&mut conn, milk).unwrap().amount, 2.0);
}

#[test]
fn lookup_by_name_is_case_insensitive() {
    let mut conn = database::establish_in_memory();

    let first = add(&mut conn, "olive oil", 1.0, Unit::Jar, None).unwrap();
    add(&mut conn, "Olive Oil", 2.0, Unit::Cups, None).unwrap();

    let found = find_by_name(&mut conn, "OLIVE OIL").unwrap().unwrap();
    assert_eq!(found.id, first);
    assert!(find_by_name(&mut conn, "butter").unwrap().is_none());
}
