// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    IngredientUsage, Recipe, RecipeId, Unit, UsageEvent, UsageEventId,
};
use crate::error::{validate_amount, validate_name, Error, Result};
use crate::inventory::normalize_name;
use diesel::BelongingToDsl as _;
use diesel::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::GroupedBy as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One line of a recipe. Refers to inventory by name only.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: Unit,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: Unit) -> Self {
        Self {
            name: name.into(),
            amount,
            unit,
        }
    }
}

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.amount, self.unit, self.name)
    }
}

/// Parses `"Name=amount unit"`, e.g. `"Olive Oil=2 tablespoons"`.
impl FromStr for RecipeIngredient {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::Validation(format!("expected \"name=amount unit\", got {s:?}"));

        let (name, quantity) = s.split_once('=').ok_or_else(bad)?;
        let (amount, unit) = quantity.trim().split_once(char::is_whitespace).ok_or_else(bad)?;
        let amount: f64 = amount.parse().map_err(|_| bad())?;
        let unit: Unit = unit.parse()?;

        validate_name("ingredient", name)?;
        validate_amount(name, amount)?;
        Ok(Self::new(name.trim(), amount, unit))
    }
}

/// A saved recipe with its ingredient list in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecipe {
    pub id: RecipeId,
    pub name: String,
    pub cooking_time: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: String,
    pub created_at: chrono::NaiveDateTime,
}

impl SavedRecipe {
    fn from_rows(recipe: Recipe, mut usages: Vec<IngredientUsage>) -> Self {
        usages.sort_by_key(|u| u.position);
        Self {
            id: recipe.id,
            name: recipe.name,
            cooking_time: recipe.cooking_time,
            ingredients: usages
                .into_iter()
                .map(|u| RecipeIngredient::new(u.name, u.amount, u.unit))
                .collect(),
            instructions: recipe.instructions,
            created_at: recipe.created_at,
        }
    }
}

/// Everything needed to create or fully replace a recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub cooking_time: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: String,
}

impl RecipeDraft {
    fn validate(&self) -> Result<()> {
        validate_name("recipe", &self.name)?;
        for i in &self.ingredients {
            validate_name("ingredient", &i.name)?;
            validate_amount(&i.name, i.amount)?;
        }
        Ok(())
    }
}

fn not_found(recipe_id: RecipeId) -> Error {
    Error::NotFound {
        entity: "recipe",
        id: recipe_id.0,
    }
}

fn exists(conn: &mut database::Connection, recipe_id: RecipeId) -> Result<bool> {
    use database::schema::recipes::dsl::*;

    let count: i64 = recipes.filter(id.eq(recipe_id)).count().get_result(conn)?;
    Ok(count > 0)
}

pub fn list(conn: &mut database::Connection) -> Result<Vec<SavedRecipe>> {
    use database::schema::ingredient_usages::dsl::*;

    let all_recipes: Vec<Recipe> = database::schema::recipes::table
        .select(Recipe::as_select())
        .order((
            database::schema::recipes::name.asc(),
            database::schema::recipes::id.asc(),
        ))
        .load(conn)?;
    let usages: Vec<IngredientUsage> = IngredientUsage::belonging_to(&all_recipes)
        .select(IngredientUsage::as_select())
        .order(position.asc())
        .load(conn)?;

    Ok(usages
        .grouped_by(&all_recipes)
        .into_iter()
        .zip(all_recipes)
        .map(|(u, r)| SavedRecipe::from_rows(r, u))
        .collect())
}

pub fn get(conn: &mut database::Connection, recipe_id: RecipeId) -> Result<SavedRecipe> {
    use database::schema::recipes::dsl::*;
    use diesel::prelude::OptionalExtension as _;

    let recipe = recipes
        .select(Recipe::as_select())
        .filter(id.eq(recipe_id))
        .get_result(conn)
        .optional()?
        .ok_or_else(|| not_found(recipe_id))?;
    let usages = IngredientUsage::belonging_to(&recipe)
        .select(IngredientUsage::as_select())
        .load(conn)?;
    Ok(SavedRecipe::from_rows(recipe, usages))
}

fn insert_ingredients(
    conn: &mut database::Connection,
    owner: RecipeId,
    new_ingredients: &[RecipeIngredient],
) -> Result<()> {
    use database::schema::ingredient_usages::dsl::*;
    use diesel::insert_into;

    let rows: Vec<_> = new_ingredients
        .iter()
        .enumerate()
        .map(|(i, ingredient)| {
            (
                recipe_id.eq(owner),
                position.eq(i as i32),
                name.eq(ingredient.name.trim()),
                amount.eq(ingredient.amount),
                unit.eq(ingredient.unit),
            )
        })
        .collect();
    if !rows.is_empty() {
        insert_into(ingredient_usages).values(rows).execute(conn)?;
    }
    Ok(())
}

pub fn add(conn: &mut database::Connection, draft: &RecipeDraft) -> Result<RecipeId> {
    use database::schema::recipes::dsl::*;
    use diesel::insert_into;

    draft.validate()?;

    let new_id = conn.transaction::<_, Error, _>(|conn| {
        insert_into(recipes)
            .values((
                name.eq(draft.name.trim()),
                cooking_time.eq(&draft.cooking_time),
                instructions.eq(&draft.instructions),
                created_at.eq(chrono::Local::now().naive_local()),
            ))
            .execute(conn)?;
        let new_id = RecipeId(database::last_insert_id(conn)?);
        insert_ingredients(conn, new_id, &draft.ingredients)?;
        Ok(new_id)
    })?;

    log::info!(
        "saved recipe {:?} as #{new_id} with {} ingredients",
        draft.name,
        draft.ingredients.len()
    );
    Ok(new_id)
}

/// Replace name, cooking time, ingredients and instructions of a saved recipe.
pub fn update(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
    draft: &RecipeDraft,
) -> Result<()> {
    draft.validate()?;

    conn.transaction::<_, Error, _>(|conn| {
        {
            use database::schema::recipes::dsl::*;
            use diesel::update;

            let rows = update(recipes)
                .filter(id.eq(recipe_id))
                .set((
                    name.eq(draft.name.trim()),
                    cooking_time.eq(&draft.cooking_time),
                    instructions.eq(&draft.instructions),
                ))
                .execute(conn)?;
            if rows == 0 {
                return Err(not_found(recipe_id));
            }
        }
        {
            use database::schema::ingredient_usages::dsl;
            use diesel::delete;

            delete(dsl::ingredient_usages.filter(dsl::recipe_id.eq(recipe_id))).execute(conn)?;
        }
        insert_ingredients(conn, recipe_id, &draft.ingredients)
    })?;

    log::info!("updated recipe #{recipe_id}");
    Ok(())
}

/// Delete a recipe together with its ingredient list and cook history.
pub fn delete(conn: &mut database::Connection, delete_id: RecipeId) -> Result<()> {
    use diesel::delete;

    conn.transaction::<_, Error, _>(|conn| {
        if !exists(conn, delete_id)? {
            return Err(not_found(delete_id));
        }
        {
            use database::schema::usage_events::dsl::*;
            delete(usage_events.filter(recipe_id.eq(delete_id))).execute(conn)?;
        }
        {
            use database::schema::ingredient_usages::dsl::*;
            delete(ingredient_usages.filter(recipe_id.eq(delete_id))).execute(conn)?;
        }
        {
            use database::schema::recipes::dsl::*;
            delete(recipes.filter(id.eq(delete_id))).execute(conn)?;
        }
        Ok(())
    })?;

    log::info!("deleted recipe #{delete_id}");
    Ok(())
}

/// Append one entry to the cook history. Does not touch inventory; see
/// [`crate::deduction::deduct_for_recipe`].
pub fn log_cooked(conn: &mut database::Connection, cooked_id: RecipeId) -> Result<UsageEventId> {
    log_cooked_at(conn, cooked_id, chrono::Local::now().naive_local())
}

pub fn log_cooked_at(
    conn: &mut database::Connection,
    cooked_id: RecipeId,
    when: chrono::NaiveDateTime,
) -> Result<UsageEventId> {
    use database::schema::usage_events::dsl::*;
    use diesel::insert_into;

    if !exists(conn, cooked_id)? {
        return Err(not_found(cooked_id));
    }
    insert_into(usage_events)
        .values((recipe_id.eq(cooked_id), cooked_at.eq(when)))
        .execute(conn)?;
    let event_id = UsageEventId(database::last_insert_id(conn)?);

    log::info!("recipe #{cooked_id} cooked at {when}");
    Ok(event_id)
}

pub fn cook_history(conn: &mut database::Connection, of: RecipeId) -> Result<Vec<UsageEvent>> {
    use database::schema::usage_events::dsl::*;

    Ok(usage_events
        .select(UsageEvent::as_select())
        .filter(recipe_id.eq(of))
        .order((cooked_at.desc(), id.desc()))
        .load(conn)?)
}

fn cook_counts(conn: &mut database::Connection) -> Result<HashMap<RecipeId, i64>> {
    use database::schema::usage_events::dsl::*;

    let mut counts = HashMap::new();
    for cooked in usage_events.select(recipe_id).load::<RecipeId>(conn)? {
        *counts.entry(cooked).or_default() += 1;
    }
    Ok(counts)
}

fn top(mut tally: Vec<(String, i64)>, limit: usize) -> Vec<(String, i64)> {
    tally.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tally.truncate(limit);
    tally
}

/// Recipes with at least one cook, most cooked first.
pub fn most_cooked(conn: &mut database::Connection, limit: usize) -> Result<Vec<(String, i64)>> {
    let counts = cook_counts(conn)?;
    let tally = list(conn)?
        .into_iter()
        .filter_map(|r| counts.get(&r.id).map(|&c| (r.name, c)))
        .collect();
    Ok(top(tally, limit))
}

/// Ingredient names weighted by how often the recipes using them were cooked.
pub fn most_used_ingredients(
    conn: &mut database::Connection,
    limit: usize,
) -> Result<Vec<(String, i64)>> {
    let counts = cook_counts(conn)?;

    let mut by_name: HashMap<String, (String, i64)> = HashMap::new();
    for recipe in list(conn)? {
        let Some(&cooked) = counts.get(&recipe.id) else {
            continue;
        };
        for ingredient in &recipe.ingredients {
            by_name
                .entry(normalize_name(&ingredient.name))
                .or_insert_with(|| (ingredient.name.clone(), 0))
                .1 += cooked;
        }
    }
    Ok(top(by_name.into_values().collect(), limit))
}

#[cfg(test)]
pub fn draft(recipe_name: &str, ingredients: &[(&str, f64, Unit)]) -> RecipeDraft {
    RecipeDraft {
        name: recipe_name.into(),
        cooking_time: "20 minutes".into(),
        ingredients: ingredients
            .iter()
            .map(|&(n, a, u)| RecipeIngredient::new(n, a, u))
            .collect(),
        instructions: "Cook it.".into(),
    }
}

#[test]
fn parse_recipe_ingredient() {
    assert_eq!(
        "Olive Oil=2 tablespoons".parse::<RecipeIngredient>().unwrap(),
        RecipeIngredient::new("Olive Oil", 2.0, Unit::Tablespoons)
    );
    assert_eq!(
        " Garlic = 4 cloves".parse::<RecipeIngredient>().unwrap(),
        RecipeIngredient::new("Garlic", 4.0, Unit::Clove)
    );
    for bad in ["Garlic", "Garlic=4", "Garlic=four cloves", "=4 cloves", "Garlic=0 cloves"] {
        assert!(bad.parse::<RecipeIngredient>().is_err(), "{bad}");
    }
}

#[test]
fn add_preserves_ingredient_order() {
    let mut conn = database::establish_in_memory();

    let new_id = add(
        &mut conn,
        &draft(
            "Tomato Pasta",
            &[
                ("Pasta", 200.0, Unit::Grams),
                ("Tomatoes", 3.0, Unit::Whole),
                ("Garlic", 2.0, Unit::Clove),
                ("Olive Oil", 3.0, Unit::Tablespoons),
            ],
        ),
    )
    .unwrap();

    let saved = get(&mut conn, new_id).unwrap();
    assert_eq!(saved.name, "Tomato Pasta");
    assert_eq!(
        saved.ingredients.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        vec!["Pasta", "Tomatoes", "Garlic", "Olive Oil"]
    );
    assert_eq!(list(&mut conn).unwrap(), vec![saved]);
}

#[test]
fn update_replaces_everything() {
    let mut conn = database::establish_in_memory();

    let new_id = add(&mut conn, &draft("Toast", &[("Bread", 2.0, Unit::Slice)])).unwrap();
    let mut replacement = draft("Cheese Toast", &[("Cheese", 1.0, Unit::Slice)]);
    replacement.cooking_time = "5 minutes".into();
    update(&mut conn, new_id, &replacement).unwrap();

    let saved = get(&mut conn, new_id).unwrap();
    assert_eq!(saved.name, "Cheese Toast");
    assert_eq!(saved.cooking_time, "5 minutes");
    assert_eq!(
        saved.ingredients,
        vec![RecipeIngredient::new("Cheese", 1.0, Unit::Slice)]
    );

    assert!(matches!(
        update(&mut conn, RecipeId(99), &replacement),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn invalid_drafts_are_rejected() {
    let mut conn = database::establish_in_memory();

    assert!(matches!(
        add(&mut conn, &draft("", &[])),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        add(&mut conn, &draft("Soup", &[("Water", -1.0, Unit::Cups)])),
        Err(Error::Validation(_))
    ));
    assert!(list(&mut conn).unwrap().is_empty());
}

#[test]
fn delete_purges_history() {
    let mut conn = database::establish_in_memory();

    let eggs = add(&mut conn, &draft("Eggs", &[("Eggs", 3.0, Unit::Whole)])).unwrap();
    let toast = add(&mut conn, &draft("Toast", &[("Bread", 2.0, Unit::Slice)])).unwrap();
    log_cooked(&mut conn, eggs).unwrap();
    log_cooked(&mut conn, eggs).unwrap();
    log_cooked(&mut conn, toast).unwrap();

    delete(&mut conn, eggs).unwrap();

    assert!(matches!(get(&mut conn, eggs), Err(Error::NotFound { .. })));
    assert!(cook_history(&mut conn, eggs).unwrap().is_empty());
    assert_eq!(cook_history(&mut conn, toast).unwrap().len(), 1);
    assert!(matches!(delete(&mut conn, eggs), Err(Error::NotFound { .. })));
    assert!(matches!(log_cooked(&mut conn, eggs), Err(Error::NotFound { .. })));
}

#[test]
fn usage_statistics() {
    let mut conn = database::establish_in_memory();

    let scrambled = add(
        &mut conn,
        &draft(
            "Scrambled Eggs",
            &[("Eggs", 3.0, Unit::Whole), ("Butter", 20.0, Unit::Grams)],
        ),
    )
    .unwrap();
    let chicken = add(
        &mut conn,
        &draft(
            "Garlic Butter Chicken",
            &[("Chicken", 500.0, Unit::Grams), ("butter", 30.0, Unit::Grams)],
        ),
    )
    .unwrap();
    add(&mut conn, &draft("Never Cooked", &[("Salmon", 1.0, Unit::Whole)])).unwrap();

    for _ in 0..3 {
        log_cooked(&mut conn, scrambled).unwrap();
    }
    log_cooked(&mut conn, chicken).unwrap();

    assert_eq!(
        most_cooked(&mut conn, 5).unwrap(),
        vec![
            ("Scrambled Eggs".to_string(), 3),
            ("Garlic Butter Chicken".to_string(), 1)
        ]
    );
    assert_eq!(
        most_used_ingredients(&mut conn, 2).unwrap(),
        vec![("butter".to_string(), 4), ("Eggs".to_string(), 3)]
    );
}
