// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_enum::DbEnum;
use diesel_derive_newtype::DieselNewType;
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, EnumString};

use crate::error::Error;

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct IngredientId(pub i32);

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct RecipeId(pub i32);

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct IngredientUsageId(pub i32);

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct UsageEventId(pub i32);

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct ShoppingItemId(pub i32);

/// Every unit an amount can be recorded in. There is no free-text unit.
#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, EnumIter, DbEnum)]
pub enum Unit {
    Whole,
    Half,
    Quarter,
    Slice,
    Clove,
    Head,
    Bunch,
    Stalk,
    Sprig,
    Leaf,
    Grams,
    Kilograms,
    Ounces,
    Pounds,
    Milliliters,
    Liters,
    Cups,
    Tablespoons,
    Teaspoons,
    Can,
    Jar,
    Bag,
    Box,
    Package,
    Piece,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whole => "whole",
            Self::Half => "half",
            Self::Quarter => "quarter",
            Self::Slice => "slice",
            Self::Clove => "clove",
            Self::Head => "head",
            Self::Bunch => "bunch",
            Self::Stalk => "stalk",
            Self::Sprig => "sprig",
            Self::Leaf => "leaf",
            Self::Grams => "grams",
            Self::Kilograms => "kg",
            Self::Ounces => "oz",
            Self::Pounds => "lbs",
            Self::Milliliters => "ml",
            Self::Liters => "liters",
            Self::Cups => "cups",
            Self::Tablespoons => "tablespoons",
            Self::Teaspoons => "teaspoons",
            Self::Can => "can",
            Self::Jar => "jar",
            Self::Bag => "bag",
            Self::Box => "box",
            Self::Package => "package",
            Self::Piece => "piece",
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s.trim().to_lowercase().as_str() {
            "whole" => Self::Whole,
            "half" | "halves" => Self::Half,
            "quarter" | "quarters" => Self::Quarter,
            "slice" | "slices" => Self::Slice,
            "clove" | "cloves" => Self::Clove,
            "head" | "heads" => Self::Head,
            "bunch" | "bunches" => Self::Bunch,
            "stalk" | "stalks" => Self::Stalk,
            "sprig" | "sprigs" => Self::Sprig,
            "leaf" | "leaves" => Self::Leaf,
            "g" | "gram" | "grams" => Self::Grams,
            "kg" | "kilogram" | "kilograms" => Self::Kilograms,
            "oz" | "ounce" | "ounces" => Self::Ounces,
            "lb" | "lbs" | "pound" | "pounds" => Self::Pounds,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Self::Milliliters
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Self::Liters,
            "cup" | "cups" => Self::Cups,
            "tbsp" | "tablespoon" | "tablespoons" => Self::Tablespoons,
            "tsp" | "teaspoon" | "teaspoons" => Self::Teaspoons,
            "can" | "cans" => Self::Can,
            "jar" | "jars" => Self::Jar,
            "bag" | "bags" => Self::Bag,
            "box" | "boxes" => Self::Box,
            "package" | "packages" => Self::Package,
            "piece" | "pieces" => Self::Piece,
            _ => {
                let known: Vec<_> = Self::iter().map(|u| u.as_str()).collect();
                return Err(Error::Validation(format!(
                    "unknown unit {s:?}, expected one of {}",
                    known.join(", ")
                )));
            }
        })
    }
}

#[derive(Debug, Display, Default, EnumIter, EnumString, Hash, Copy, Clone, PartialEq, Eq, DbEnum)]
#[strum(ascii_case_insensitive)]
pub enum Location {
    #[default]
    Fridge,
    Freezer,
    Pantry,
    Other,
}

#[derive(
    Debug, Display, EnumIter, EnumString, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, DbEnum,
)]
#[strum(ascii_case_insensitive)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, DbEnum)]
pub enum MealKind {
    Recipe,
    Unplanned,
    EatingOut,
    VacationSkip,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub amount: f64,
    pub unit: Unit,
    pub location: Location,
    pub added_date: chrono::NaiveDateTime,
    pub updated_date: chrono::NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub amount: f64,
    pub unit: Unit,
    pub location: Location,
    pub added_date: chrono::NaiveDateTime,
    pub updated_date: chrono::NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub cooking_time: String,
    pub instructions: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::ingredient_usages)]
pub struct IngredientUsage {
    pub id: IngredientUsageId,
    pub recipe_id: RecipeId,
    pub position: i32,
    pub name: String,
    pub amount: f64,
    pub unit: Unit,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::usage_events)]
pub struct UsageEvent {
    pub id: UsageEventId,
    pub recipe_id: RecipeId,
    pub cooked_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::database::schema::meal_plan)]
pub struct MealPlanRow {
    pub day: chrono::NaiveDate,
    pub slot: MealSlot,
    pub kind: MealKind,
    pub recipe_name: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::database::schema::shopping_list_items)]
pub struct ShoppingListItem {
    pub id: ShoppingItemId,
    pub name: String,
    pub checked: bool,
    pub added_at: chrono::NaiveDateTime,
}

#[test]
fn unit_parsing_accepts_aliases() {
    assert_eq!("cloves".parse::<Unit>().unwrap(), Unit::Clove);
    assert_eq!(" Grams ".parse::<Unit>().unwrap(), Unit::Grams);
    assert_eq!("tbsp".parse::<Unit>().unwrap(), Unit::Tablespoons);
    assert_eq!("lb".parse::<Unit>().unwrap(), Unit::Pounds);
    assert_eq!("L".parse::<Unit>().unwrap(), Unit::Liters);

    for unit in Unit::iter() {
        assert_eq!(unit.as_str().parse::<Unit>().unwrap(), unit);
    }
}

#[test]
fn unit_parsing_rejects_free_text() {
    assert!(matches!(
        "handful".parse::<Unit>(),
        Err(Error::Validation(_))
    ));
}

#[test]
fn location_defaults_to_fridge() {
    assert_eq!(Location::default(), Location::Fridge);
    assert_eq!("freezer".parse::<Location>().unwrap(), Location::Freezer);
}
