// Copyright 2023 Remi Bernotavicius

//! Walks a meal plan day by day against a scratch copy of the inventory to find when
//! something will run out. Nothing here writes to the store; cooking is the only thing that
//! changes inventory (see [`crate::deduction`]).

use crate::database;
use crate::database::models::{Ingredient, MealSlot, Unit};
use crate::error::Result;
use crate::inventory::{self, index_by_name, normalize_name};
use crate::recipes::{self, SavedRecipe};
use crate::units::{from_base, round3, to_base, BaseUnit};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Copy, Clone)]
pub struct MealKey {
    pub date: chrono::NaiveDate,
    pub slot: MealSlot,
}

impl MealKey {
    pub fn new(date: chrono::NaiveDate, slot: MealSlot) -> Self {
        Self { date, slot }
    }
}

/// Planned home meals: recipe name by day and slot. Special markers are never in here.
pub type MealPlan = BTreeMap<MealKey, String>;

/// One planned use of an ingredient the projected inventory can't cover.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortageItem {
    pub name: String,
    pub need_amount: f64,
    pub need_unit: Unit,
    pub have_amount: f64,
    pub have_unit: Unit,
    pub runs_out_on: chrono::NaiveDate,
    pub recipe: String,
}

impl fmt::Display for ShortageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: need {} {} (have {} {}) for {} on {}",
            self.name,
            self.need_amount,
            self.need_unit,
            self.have_amount,
            self.have_unit,
            self.recipe,
            self.runs_out_on.format("%a %b %-d")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingPlan {
    pub fully_covered: bool,
    pub shop_by: Option<chrono::NaiveDate>,
    pub items: Vec<ShortageItem>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShopUrgency {
    Today,
    Tomorrow,
    By(chrono::NaiveDate),
}

impl ShoppingPlan {
    fn covered() -> Self {
        Self {
            fully_covered: true,
            shop_by: None,
            items: vec![],
        }
    }

    /// How soon shopping has to happen, seen from `today`. `None` when nothing is short.
    pub fn urgency(&self, today: chrono::NaiveDate) -> Option<ShopUrgency> {
        let shop_by = self.shop_by?;
        Some(match (shop_by - today).num_days() {
            i64::MIN..=0 => ShopUrgency::Today,
            1 => ShopUrgency::Tomorrow,
            _ => ShopUrgency::By(shop_by),
        })
    }
}

impl fmt::Display for ShoppingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(shop_by) = self.shop_by else {
            return write!(f, "The pantry covers every planned meal, nothing to buy.");
        };
        write!(f, "Shopping list, shop by {}", shop_by.format("%A, %b %-d"))?;
        for item in &self.items {
            write!(f, "\n- {item}")?;
        }
        Ok(())
    }
}

/// An inventory record as the projection sees it, in base units.
struct Stock {
    base_amount: f64,
    base: BaseUnit,
    unit: Unit,
    display_name: String,
}

fn snapshot(inventory: &[Ingredient]) -> HashMap<String, Stock> {
    index_by_name(inventory)
        .into_iter()
        .map(|(key, i)| {
            let (base_amount, base) = to_base(i.amount, i.unit);
            let stock = Stock {
                base_amount,
                base,
                unit: i.unit,
                display_name: i.name.clone(),
            };
            (key, stock)
        })
        .collect()
}

/// Project the plan against `inventory` and report every use that comes up short.
///
/// Meals are taken in date order. A use that an ingredient can't cover emits one item, so an
/// ingredient that is already gone shows up again each later time it is needed. Ingredients
/// held in a unit that can't be compared with the recipe's are assumed to be enough.
pub fn project_shopping_plan(
    inventory: &[Ingredient],
    plan: &MealPlan,
    recipes: &[SavedRecipe],
) -> ShoppingPlan {
    let mut by_name: HashMap<&str, &SavedRecipe> = HashMap::new();
    for r in recipes {
        by_name.entry(r.name.as_str()).or_insert(r);
    }

    let mut working = snapshot(inventory);
    let mut items = vec![];

    for (key, recipe_name) in plan {
        let Some(recipe) = by_name.get(recipe_name.as_str()) else {
            log::debug!("no recipe named {recipe_name:?}, skipping {key:?}");
            continue;
        };
        for needed in &recipe.ingredients {
            let (need_base, need_family) = to_base(needed.amount, needed.unit);

            let Some(stock) = working.get_mut(&normalize_name(&needed.name)) else {
                items.push(ShortageItem {
                    name: needed.name.clone(),
                    need_amount: needed.amount,
                    need_unit: needed.unit,
                    have_amount: 0.0,
                    have_unit: needed.unit,
                    runs_out_on: key.date,
                    recipe: recipe.name.clone(),
                });
                continue;
            };
            if stock.base != need_family {
                continue;
            }

            let before = stock.base_amount;
            stock.base_amount = (before - need_base).max(0.0);
            if before < need_base {
                items.push(ShortageItem {
                    name: stock.display_name.clone(),
                    need_amount: needed.amount,
                    need_unit: needed.unit,
                    have_amount: round3(from_base(before, stock.unit)),
                    have_unit: stock.unit,
                    runs_out_on: key.date,
                    recipe: recipe.name.clone(),
                });
            }
        }
    }

    let Some(earliest) = items.iter().map(|i| i.runs_out_on).min() else {
        return ShoppingPlan::covered();
    };
    for item in &items {
        log::debug!("short: {item}");
    }
    ShoppingPlan {
        fully_covered: false,
        shop_by: Some(earliest.pred_opt().unwrap_or(earliest)),
        items,
    }
}

/// Project the plan against what is in the store right now.
pub fn project(conn: &mut database::Connection, plan: &MealPlan) -> Result<ShoppingPlan> {
    let inventory = inventory::list(conn)?;
    let recipes = recipes::list(conn)?;
    Ok(project_shopping_plan(&inventory, plan, &recipes))
}

#[cfg(test)]
use crate::fixtures::{date, recipe, stock};

#[cfg(test)]
fn dinners(meals: &[(u32, &str)]) -> MealPlan {
    meals
        .iter()
        .map(|&(day, name)| (MealKey::new(date(day), MealSlot::Dinner), name.to_string()))
        .collect()
}

#[test]
fn sufficient_stock_is_covered() {
    let inventory = vec![stock(1, "Eggs", 6.0, Unit::Whole)];
    let recipes = vec![recipe(1, "Scrambled Eggs", &[("Eggs", 3.0, Unit::Whole)])];

    let plan = project_shopping_plan(&inventory, &dinners(&[(1, "Scrambled Eggs")]), &recipes);
    assert_eq!(plan, ShoppingPlan::covered());
    assert_eq!(plan.urgency(date(1)), None);
}

#[test]
fn immediate_shortage() {
    let inventory = vec![stock(1, "Garlic", 2.0, Unit::Clove)];
    let recipes = vec![recipe(1, "Aglio e Olio", &[("garlic", 4.0, Unit::Clove)])];

    let plan = project_shopping_plan(&inventory, &dinners(&[(1, "Aglio e Olio")]), &recipes);
    assert_eq!(
        plan,
        ShoppingPlan {
            fully_covered: false,
            shop_by: Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 30).unwrap()),
            items: vec![ShortageItem {
                name: "Garlic".into(),
                need_amount: 4.0,
                need_unit: Unit::Clove,
                have_amount: 2.0,
                have_unit: Unit::Clove,
                runs_out_on: date(1),
                recipe: "Aglio e Olio".into(),
            }],
        }
    );
    assert_eq!(plan.urgency(date(1)), Some(ShopUrgency::Today));
}

#[test]
fn incomparable_units_never_short() {
    let inventory = vec![stock(1, "Olive Oil", 1.0, Unit::Jar)];
    let recipes = vec![recipe(1, "Dressing", &[("Olive Oil", 2.0, Unit::Tablespoons)])];

    let plan = project_shopping_plan(
        &inventory,
        &dinners(&[(1, "Dressing"), (2, "Dressing"), (3, "Dressing")]),
        &recipes,
    );
    assert!(plan.fully_covered);
}

#[test]
fn depletion_across_days() {
    let inventory = vec![stock(1, "Pasta", 300.0, Unit::Grams)];
    let recipes = vec![
        recipe(1, "Aglio e Olio", &[("Pasta", 200.0, Unit::Grams)]),
        recipe(2, "Tomato Pasta", &[("Pasta", 200.0, Unit::Grams)]),
    ];

    let plan = project_shopping_plan(
        &inventory,
        &dinners(&[(3, "Tomato Pasta"), (1, "Aglio e Olio")]),
        &recipes,
    );
    assert!(!plan.fully_covered);
    assert_eq!(plan.shop_by, Some(date(2)));
    assert_eq!(plan.items.len(), 1);
    let item = &plan.items[0];
    assert_eq!((item.have_amount, item.have_unit), (100.0, Unit::Grams));
    assert_eq!((item.need_amount, item.need_unit), (200.0, Unit::Grams));
    assert_eq!(item.runs_out_on, date(3));
    assert_eq!(item.recipe, "Tomato Pasta");

    assert_eq!(plan.urgency(date(1)), Some(ShopUrgency::Tomorrow));
    assert_eq!(plan.urgency(date(2)), Some(ShopUrgency::Today));
    let sept_30 = chrono::NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
    assert_eq!(plan.urgency(sept_30), Some(ShopUrgency::By(date(2))));

    // The inventory handed in is untouched.
    assert_eq!(inventory[0].amount, 300.0);
}

#[test]
fn have_amount_is_reported_in_the_stored_unit() {
    let inventory = vec![stock(1, "Milk", 1.0, Unit::Liters)];
    let recipes = vec![recipe(1, "Bechamel", &[("Milk", 3.0, Unit::Cups)])];

    let plan = project_shopping_plan(
        &inventory,
        &dinners(&[(1, "Bechamel"), (2, "Bechamel")]),
        &recipes,
    );
    assert_eq!(plan.items.len(), 1);
    assert_eq!(plan.items[0].have_amount, 0.28);
    assert_eq!(plan.items[0].have_unit, Unit::Liters);
    assert_eq!(plan.items[0].runs_out_on, date(2));
}

#[test]
fn missing_ingredient_is_short_every_time() {
    let inventory: Vec<Ingredient> = vec![];
    let recipes = vec![recipe(1, "Salmon", &[("Salmon", 500.0, Unit::Grams)])];

    let plan = project_shopping_plan(
        &inventory,
        &dinners(&[(2, "Salmon"), (4, "Salmon")]),
        &recipes,
    );
    let dates: Vec<_> = plan.items.iter().map(|i| i.runs_out_on).collect();
    assert_eq!(dates, vec![date(2), date(4)]);
    assert!(plan.items.iter().all(|i| i.have_amount == 0.0 && i.have_unit == Unit::Grams));
    assert_eq!(plan.shop_by, Some(date(1)));
}

#[test]
fn exhausted_ingredient_is_reported_per_use() {
    let inventory = vec![stock(1, "Garlic", 2.0, Unit::Clove)];
    let recipes = vec![
        recipe(1, "Aglio e Olio", &[("Garlic", 4.0, Unit::Clove)]),
        recipe(2, "Garlic Bread", &[("Garlic", 1.0, Unit::Clove)]),
    ];

    let plan = project_shopping_plan(
        &inventory,
        &dinners(&[(5, "Aglio e Olio"), (6, "Garlic Bread")]),
        &recipes,
    );
    let seen: Vec<_> = plan
        .items
        .iter()
        .map(|i| (i.recipe.as_str(), i.have_amount, i.runs_out_on))
        .collect();
    assert_eq!(
        seen,
        vec![("Aglio e Olio", 2.0, date(5)), ("Garlic Bread", 0.0, date(6))]
    );
    assert_eq!(plan.shop_by, Some(date(4)));
}

#[test]
fn slots_on_the_same_day_share_the_date() {
    let inventory = vec![stock(1, "Eggs", 4.0, Unit::Whole)];
    let recipes = vec![recipe(1, "Omelette", &[("Eggs", 3.0, Unit::Whole)])];

    let mut plan = MealPlan::new();
    plan.insert(MealKey::new(date(8), MealSlot::Breakfast), "Omelette".into());
    plan.insert(MealKey::new(date(8), MealSlot::Dinner), "Omelette".into());

    let plan = project_shopping_plan(&inventory, &plan, &recipes);
    assert_eq!(plan.items.len(), 1);
    assert_eq!(plan.items[0].runs_out_on, date(8));
    assert_eq!(plan.shop_by, Some(date(7)));
}

#[test]
fn no_op_plans_are_covered() {
    let inventory = vec![stock(1, "Eggs", 1.0, Unit::Whole)];
    let recipes = vec![recipe(1, "Scrambled Eggs", &[("Eggs", 3.0, Unit::Whole)])];

    assert_eq!(
        project_shopping_plan(&inventory, &MealPlan::new(), &recipes),
        ShoppingPlan::covered()
    );
    assert_eq!(
        project_shopping_plan(&inventory, &dinners(&[(1, "Deleted Recipe")]), &recipes),
        ShoppingPlan::covered()
    );
}

#[test]
fn shop_by_is_day_before_earliest_shortage() {
    let inventory = vec![
        stock(1, "Pasta", 250.0, Unit::Grams),
        stock(2, "Tomatoes", 4.0, Unit::Whole),
    ];
    let recipes = vec![
        recipe(1, "Tomato Pasta", &[("Pasta", 200.0, Unit::Grams), ("Tomatoes", 3.0, Unit::Whole)]),
        recipe(2, "Salad", &[("Tomatoes", 2.0, Unit::Whole), ("Lettuce", 1.0, Unit::Head)]),
    ];

    let plan = project_shopping_plan(
        &inventory,
        &dinners(&[(3, "Salad"), (9, "Tomato Pasta"), (12, "Tomato Pasta")]),
        &recipes,
    );
    let seen: Vec<_> = plan
        .items
        .iter()
        .map(|i| (i.name.as_str(), i.runs_out_on))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("Lettuce", date(3)),
            ("Tomatoes", date(9)),
            ("Pasta", date(12)),
            ("Tomatoes", date(12)),
        ]
    );
    let earliest = plan.items.iter().map(|i| i.runs_out_on).min().unwrap();
    assert_eq!(plan.shop_by, earliest.pred_opt());
}

#[test]
fn rendering() {
    let inventory = vec![stock(1, "Garlic", 2.0, Unit::Clove)];
    let recipes = vec![recipe(1, "Aglio e Olio", &[("Garlic", 4.0, Unit::Clove)])];

    let plan = project_shopping_plan(&inventory, &dinners(&[(2, "Aglio e Olio")]), &recipes);
    assert_eq!(
        plan.to_string(),
        "Shopping list, shop by Thursday, Oct 1\n\
         - Garlic: need 4 clove (have 2 clove) for Aglio e Olio on Fri Oct 2"
    );
    assert_eq!(
        ShoppingPlan::covered().to_string(),
        "The pantry covers every planned meal, nothing to buy."
    );
}

#[test]
fn projects_from_the_store_without_writing() {
    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Pasta", 300.0, Unit::Grams, None).unwrap();
    recipes::add(
        &mut conn,
        &recipes::draft("Pasta", &[("Pasta", 200.0, Unit::Grams)]),
    )
    .unwrap();

    let plan = project(&mut conn, &dinners(&[(1, "Pasta"), (3, "Pasta")])).unwrap();
    assert_eq!(plan.shop_by, Some(date(2)));
    assert_eq!(inventory::list(&mut conn).unwrap()[0].amount, 300.0);
}
