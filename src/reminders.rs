// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Ingredient, Location, MealSlot};
use crate::error::Result;
use crate::inventory::{self, normalize_name};
use crate::meal_plan::{self, DayMeals};
use crate::recipes::{self, SavedRecipe};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// How many days ahead frozen ingredients are looked for.
const THAW_LOOKAHEAD_DAYS: u64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ThawReminder {
    pub ingredient: String,
    pub recipe: String,
    pub slot: MealSlot,
    pub needed_on: chrono::NaiveDate,
    pub take_out_on: chrono::NaiveDate,
}

impl fmt::Display for ThawReminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Take {} out of the freezer on {}, needed for {} ({}) on {}",
            self.ingredient,
            self.take_out_on.format("%A"),
            self.recipe,
            self.slot,
            self.needed_on.format("%A")
        )
    }
}

/// Frozen ingredients that planned meals in the next couple of days will need, each to be
/// taken out the day before the meal.
pub fn thaw_reminders(
    inventory: &[Ingredient],
    recipes: &[SavedRecipe],
    planned: &BTreeMap<chrono::NaiveDate, DayMeals>,
    today: chrono::NaiveDate,
) -> Vec<ThawReminder> {
    let frozen: HashMap<String, &str> = inventory
        .iter()
        .filter(|i| i.location == Location::Freezer)
        .map(|i| (normalize_name(&i.name), i.name.as_str()))
        .collect();
    if frozen.is_empty() {
        return vec![];
    }

    let mut by_name: HashMap<&str, &SavedRecipe> = HashMap::new();
    for r in recipes {
        by_name.entry(r.name.as_str()).or_insert(r);
    }

    let mut reminders = vec![];
    for days_ahead in 1..=THAW_LOOKAHEAD_DAYS {
        let Some(needed_on) = today.checked_add_days(chrono::Days::new(days_ahead)) else {
            continue;
        };
        let Some(meals) = planned.get(&needed_on) else {
            continue;
        };
        for (slot, choice) in meals {
            let Some(recipe) = choice.recipe_name().and_then(|n| by_name.get(n)) else {
                continue;
            };
            for needed in &recipe.ingredients {
                if let Some(&display_name) = frozen.get(&normalize_name(&needed.name)) {
                    reminders.push(ThawReminder {
                        ingredient: display_name.into(),
                        recipe: recipe.name.clone(),
                        slot: *slot,
                        needed_on,
                        take_out_on: needed_on.pred_opt().unwrap_or(today),
                    });
                }
            }
        }
    }
    reminders
}

pub fn upcoming_thaw_reminders(
    conn: &mut database::Connection,
    today: chrono::NaiveDate,
) -> Result<Vec<ThawReminder>> {
    let last = today
        .checked_add_days(chrono::Days::new(THAW_LOOKAHEAD_DAYS))
        .unwrap_or(today);
    let planned = meal_plan::entries_between(conn, today, last)?;
    let inventory = inventory::list(conn)?;
    let recipes = recipes::list(conn)?;
    Ok(thaw_reminders(&inventory, &recipes, &planned, today))
}

#[test]
fn frozen_ingredients_for_the_next_two_days() {
    use crate::database::models::Unit;
    use crate::fixtures::{date, frozen, recipe, stock};
    use crate::meal_plan::MealChoice;
    use maplit::btreemap;

    let inventory = vec![
        frozen(1, "Chicken Breast", 500.0, Unit::Grams),
        stock(2, "Garlic", 5.0, Unit::Clove),
        frozen(3, "Peas", 300.0, Unit::Grams),
    ];
    let recipes = vec![
        recipe(1, "Garlic Chicken", &[("chicken breast", 500.0, Unit::Grams), ("Garlic", 3.0, Unit::Clove)]),
        recipe(2, "Pea Soup", &[("Peas", 300.0, Unit::Grams)]),
    ];
    let chicken = MealChoice::Recipe("Garlic Chicken".into());
    let planned = btreemap! {
        date(10) => btreemap! { MealSlot::Dinner => chicken.clone() },
        date(11) => btreemap! {
            MealSlot::Lunch => MealChoice::Recipe("Pea Soup".into()),
            MealSlot::Dinner => MealChoice::EatingOut,
        },
        date(12) => btreemap! { MealSlot::Dinner => chicken.clone() },
        date(13) => btreemap! { MealSlot::Dinner => chicken },
    };

    let reminders = thaw_reminders(&inventory, &recipes, &planned, date(10));
    assert_eq!(
        reminders,
        vec![
            ThawReminder {
                ingredient: "Peas".into(),
                recipe: "Pea Soup".into(),
                slot: MealSlot::Lunch,
                needed_on: date(11),
                take_out_on: date(10),
            },
            ThawReminder {
                ingredient: "Chicken Breast".into(),
                recipe: "Garlic Chicken".into(),
                slot: MealSlot::Dinner,
                needed_on: date(12),
                take_out_on: date(11),
            },
        ]
    );
    assert_eq!(
        reminders[0].to_string(),
        "Take Peas out of the freezer on Saturday, needed for Pea Soup (Lunch) on Sunday"
    );
}

#[test]
fn nothing_frozen_nothing_to_thaw() {
    use crate::database::models::Unit;

    let mut conn = database::establish_in_memory();
    inventory::add(&mut conn, "Chicken", 500.0, Unit::Grams, None).unwrap();
    recipes::add(
        &mut conn,
        &recipes::draft("Roast Chicken", &[("Chicken", 500.0, Unit::Grams)]),
    )
    .unwrap();
    let today = crate::fixtures::date(1);
    let tomorrow = crate::fixtures::date(2);
    meal_plan::save_entry(
        &mut conn,
        tomorrow,
        MealSlot::Dinner,
        &meal_plan::MealChoice::Recipe("Roast Chicken".into()),
    )
    .unwrap();

    assert!(upcoming_thaw_reminders(&mut conn, today).unwrap().is_empty());

    let chicken = inventory::find_by_name(&mut conn, "chicken").unwrap().unwrap();
    inventory::update_amount(&mut conn, chicken.id, 500.0, Some(Location::Freezer)).unwrap();
    let reminders = upcoming_thaw_reminders(&mut conn, today).unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].take_out_on, today);
}
