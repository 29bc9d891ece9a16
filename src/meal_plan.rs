// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{MealKind, MealPlanRow, MealSlot};
use crate::error::{Error, Result};
use crate::projection::{MealKey, MealPlan};
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What is planned for one slot of one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealChoice {
    Recipe(String),
    Unplanned,
    EatingOut,
    VacationSkip,
}

impl MealChoice {
    pub fn recipe_name(&self) -> Option<&str> {
        match self {
            Self::Recipe(name) => Some(name),
            Self::Unplanned | Self::EatingOut | Self::VacationSkip => None,
        }
    }

    fn from_row(row: MealPlanRow) -> Self {
        match (row.kind, row.recipe_name) {
            (MealKind::Recipe, Some(name)) => Self::Recipe(name),
            (MealKind::Recipe, None) | (MealKind::Unplanned, _) => Self::Unplanned,
            (MealKind::EatingOut, _) => Self::EatingOut,
            (MealKind::VacationSkip, _) => Self::VacationSkip,
        }
    }

    fn kind(&self) -> MealKind {
        match self {
            Self::Recipe(_) => MealKind::Recipe,
            Self::Unplanned => MealKind::Unplanned,
            Self::EatingOut => MealKind::EatingOut,
            Self::VacationSkip => MealKind::VacationSkip,
        }
    }
}

impl fmt::Display for MealChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recipe(name) => write!(f, "{name}"),
            Self::Unplanned => write!(f, "unplanned"),
            Self::EatingOut => write!(f, "eating out"),
            Self::VacationSkip => write!(f, "vacation / skip"),
        }
    }
}

/// The markers are matched by keyword; anything else is taken as a recipe name.
impl FromStr for MealChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Ok(match s.to_lowercase().as_str() {
            "" => return Err(Error::Validation("meal must not be empty".into())),
            "unplanned" | "none" => Self::Unplanned,
            "eating-out" | "eating out" | "out" => Self::EatingOut,
            "vacation" | "skip" | "vacation-skip" => Self::VacationSkip,
            _ => Self::Recipe(s.into()),
        })
    }
}

pub type DayMeals = BTreeMap<MealSlot, MealChoice>;

fn recipe_exists(conn: &mut database::Connection, recipe_name: &str) -> Result<bool> {
    use database::schema::recipes::dsl::*;

    let count: i64 = recipes
        .filter(name.eq(recipe_name))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Set what is planned for a day and slot, replacing whatever was there.
pub fn save_entry(
    conn: &mut database::Connection,
    edit_day: chrono::NaiveDate,
    edit_slot: MealSlot,
    choice: &MealChoice,
) -> Result<()> {
    use database::schema::meal_plan::dsl::*;
    use diesel::insert_into;

    if let Some(n) = choice.recipe_name() {
        if !recipe_exists(conn, n)? {
            return Err(Error::Validation(format!("there is no recipe named {n:?}")));
        }
    }

    let row = MealPlanRow {
        day: edit_day,
        slot: edit_slot,
        kind: choice.kind(),
        recipe_name: choice.recipe_name().map(Into::into),
    };
    insert_into(meal_plan)
        .values(&row)
        .on_conflict((day, slot))
        .do_update()
        .set((kind.eq(row.kind), recipe_name.eq(&row.recipe_name)))
        .execute(conn)?;

    log::info!("{edit_day} {edit_slot}: {choice}");
    Ok(())
}

/// Saved entries from `from` through `to`, inclusive. Days and slots never saved are absent.
pub fn entries_between(
    conn: &mut database::Connection,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
) -> Result<BTreeMap<chrono::NaiveDate, DayMeals>> {
    use database::schema::meal_plan::dsl::*;
    use diesel::BoolExpressionMethods as _;

    let rows = meal_plan
        .select(MealPlanRow::as_select())
        .filter(day.ge(from).and(day.le(to)))
        .load(conn)?;

    let mut days: BTreeMap<_, DayMeals> = BTreeMap::new();
    for row in rows {
        let (d, s) = (row.day, row.slot);
        days.entry(d).or_default().insert(s, MealChoice::from_row(row));
    }
    Ok(days)
}

/// Every slot of one day; slots never saved are unplanned.
pub fn meals_for_date(conn: &mut database::Connection, on: chrono::NaiveDate) -> Result<DayMeals> {
    let mut saved = entries_between(conn, on, on)?.remove(&on).unwrap_or_default();
    Ok(MealSlot::iter()
        .map(|s| (s, saved.remove(&s).unwrap_or(MealChoice::Unplanned)))
        .collect())
}

/// Keep only the meals cooked at home, keyed the way the projection wants them.
pub fn home_meals(days: &BTreeMap<chrono::NaiveDate, DayMeals>) -> MealPlan {
    days.iter()
        .flat_map(|(d, meals)| {
            meals
                .iter()
                .filter_map(move |(s, choice)| {
                    choice.recipe_name().map(|n| (MealKey::new(*d, *s), n.to_string()))
                })
        })
        .collect()
}

/// Home meals planned for `days` days starting at `today`.
pub fn upcoming_home_meals(
    conn: &mut database::Connection,
    today: chrono::NaiveDate,
    days: u64,
) -> Result<MealPlan> {
    let last = today
        .checked_add_days(chrono::Days::new(days.saturating_sub(1)))
        .unwrap_or(today);
    Ok(home_meals(&entries_between(conn, today, last)?))
}

#[cfg(test)]
use crate::fixtures::date;

#[test]
fn parse_choice() {
    assert_eq!("Eating Out".parse::<MealChoice>().unwrap(), MealChoice::EatingOut);
    assert_eq!("skip".parse::<MealChoice>().unwrap(), MealChoice::VacationSkip);
    assert_eq!("unplanned".parse::<MealChoice>().unwrap(), MealChoice::Unplanned);
    assert_eq!(
        " Tomato Pasta ".parse::<MealChoice>().unwrap(),
        MealChoice::Recipe("Tomato Pasta".into())
    );
    assert!("  ".parse::<MealChoice>().is_err());
}

#[test]
fn save_is_an_upsert() {
    use crate::database::models::Unit;
    use crate::recipes;

    let mut conn = database::establish_in_memory();
    recipes::add(&mut conn, &recipes::draft("Omelette", &[("Eggs", 3.0, Unit::Whole)])).unwrap();

    save_entry(&mut conn, date(5), MealSlot::Dinner, &MealChoice::EatingOut).unwrap();
    save_entry(
        &mut conn,
        date(5),
        MealSlot::Dinner,
        &MealChoice::Recipe("Omelette".into()),
    )
    .unwrap();
    save_entry(&mut conn, date(5), MealSlot::Lunch, &MealChoice::VacationSkip).unwrap();

    assert_eq!(
        meals_for_date(&mut conn, date(5)).unwrap(),
        maplit::btreemap! {
            MealSlot::Breakfast => MealChoice::Unplanned,
            MealSlot::Lunch => MealChoice::VacationSkip,
            MealSlot::Dinner => MealChoice::Recipe("Omelette".into()),
        }
    );
}

#[test]
fn unknown_recipe_is_rejected() {
    let mut conn = database::establish_in_memory();

    assert!(matches!(
        save_entry(
            &mut conn,
            date(5),
            MealSlot::Dinner,
            &MealChoice::Recipe("Ghost Stew".into())
        ),
        Err(Error::Validation(_))
    ));
    assert!(entries_between(&mut conn, date(1), date(30)).unwrap().is_empty());
}

#[test]
fn upcoming_meals_skip_markers_and_other_weeks() {
    use crate::database::models::Unit;
    use crate::recipes;

    let mut conn = database::establish_in_memory();
    for n in ["Omelette", "Pasta"] {
        recipes::add(&mut conn, &recipes::draft(n, &[("Eggs", 1.0, Unit::Whole)])).unwrap();
    }
    let pasta = MealChoice::Recipe("Pasta".into());
    save_entry(&mut conn, date(1), MealSlot::Breakfast, &MealChoice::Recipe("Omelette".into()))
        .unwrap();
    save_entry(&mut conn, date(1), MealSlot::Dinner, &MealChoice::EatingOut).unwrap();
    save_entry(&mut conn, date(3), MealSlot::Lunch, &pasta).unwrap();
    save_entry(&mut conn, date(4), MealSlot::Dinner, &MealChoice::Unplanned).unwrap();
    save_entry(&mut conn, date(7), MealSlot::Dinner, &pasta).unwrap();
    save_entry(&mut conn, date(8), MealSlot::Dinner, &pasta).unwrap();

    assert_eq!(
        upcoming_home_meals(&mut conn, date(1), 7).unwrap(),
        maplit::btreemap! {
            MealKey::new(date(1), MealSlot::Breakfast) => "Omelette".to_string(),
            MealKey::new(date(3), MealSlot::Lunch) => "Pasta".to_string(),
            MealKey::new(date(7), MealSlot::Dinner) => "Pasta".to_string(),
        }
    );
}
