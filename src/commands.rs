// Copyright 2023 Remi Bernotavicius

use crate::cookability::{cookable_recipes, forgotten_ingredients};
use crate::database;
use crate::database::models::{
    IngredientId, Location, MealSlot, RecipeId, ShoppingItemId, Unit,
};
use crate::deduction::{self, DeductionOutcome};
use crate::inventory;
use crate::meal_plan::{self, MealChoice};
use crate::projection::{self, ShopUrgency};
use crate::recipes::{self, RecipeDraft, RecipeIngredient};
use crate::reminders;
use crate::seed;
use crate::shopping_list;
use crate::Result;
use clap::Subcommand;

/// How far ahead the shopping projection looks unless told otherwise.
const DEFAULT_PLAN_DAYS: u64 = 7;

pub struct Context {
    pub conn: database::Connection,
    pub today: chrono::NaiveDate,
}

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// Everything in the house.
    List,
    Add {
        name: String,
        amount: f64,
        unit: Unit,
        #[arg(long)]
        location: Option<Location>,
    },
    /// Set a new amount, and optionally move it.
    Update {
        id: i32,
        amount: f64,
        #[arg(long)]
        location: Option<Location>,
    },
    Remove {
        id: i32,
    },
    /// Ingredients no saved recipe uses.
    Forgotten,
}

#[derive(Debug, clap::Args)]
pub struct RecipeArgs {
    name: String,
    #[arg(long, default_value = "")]
    time: String,
    #[arg(long, default_value = "")]
    instructions: String,
    /// An ingredient as "name=amount unit"; repeat for each.
    #[arg(short, long = "ingredient")]
    ingredients: Vec<RecipeIngredient>,
}

impl From<RecipeArgs> for RecipeDraft {
    fn from(args: RecipeArgs) -> Self {
        Self {
            name: args.name,
            cooking_time: args.time,
            ingredients: args.ingredients,
            instructions: args.instructions,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum RecipeCommand {
    List,
    Show {
        id: i32,
    },
    Add(RecipeArgs),
    /// Replace a recipe entirely.
    Update {
        id: i32,
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    Remove {
        id: i32,
    },
    /// Log that a recipe was cooked and take its ingredients out of the inventory.
    Cook {
        id: i32,
    },
    /// Recipes the inventory covers right now.
    Cookable,
    Stats {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Plan a meal: a recipe name, or one of unplanned, eating-out, vacation.
    Set {
        date: chrono::NaiveDate,
        slot: MealSlot,
        meal: MealChoice,
    },
    Show {
        #[arg(long)]
        from: Option<chrono::NaiveDate>,
        #[arg(long, default_value_t = DEFAULT_PLAN_DAYS)]
        days: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ShopCommand {
    /// When to shop, and for what, to cook the planned meals.
    Plan {
        #[arg(long, default_value_t = DEFAULT_PLAN_DAYS)]
        days: u64,
    },
    /// The manual shopping list.
    List,
    Add {
        name: String,
    },
    Check {
        id: i32,
    },
    Uncheck {
        id: i32,
    },
    Remove {
        id: i32,
    },
    /// Remove every checked item.
    Clear,
}

pub fn seed(ctx: &mut Context) -> Result<()> {
    if seed::seed(&mut ctx.conn)? {
        println!("added sample data");
    } else {
        println!("database already has data, nothing added");
    }
    Ok(())
}

pub fn inventory(ctx: &mut Context, cmd: InventoryCommand) -> Result<()> {
    let conn = &mut ctx.conn;
    match cmd {
        InventoryCommand::List => {
            for i in inventory::list(conn)? {
                println!(
                    "#{} {}: {} {} ({}), added {}",
                    i.id,
                    i.name,
                    i.amount,
                    i.unit,
                    i.location,
                    i.added_date.format("%Y-%m-%d")
                );
            }
        }
        InventoryCommand::Add {
            name,
            amount,
            unit,
            location,
        } => {
            let id = inventory::add(conn, &name, amount, unit, location)?;
            println!("added #{id}");
        }
        InventoryCommand::Update {
            id,
            amount,
            location,
        } => inventory::update_amount(conn, IngredientId(id), amount, location)?,
        InventoryCommand::Remove { id } => inventory::delete(conn, IngredientId(id))?,
        InventoryCommand::Forgotten => {
            let all = inventory::list(conn)?;
            let recipes = recipes::list(conn)?;
            for i in forgotten_ingredients(&all, &recipes) {
                println!("{} ({} {}, {})", i.name, i.amount, i.unit, i.location);
            }
        }
    }
    Ok(())
}

pub fn recipe(ctx: &mut Context, cmd: RecipeCommand) -> Result<()> {
    let conn = &mut ctx.conn;
    match cmd {
        RecipeCommand::List => {
            for r in recipes::list(conn)? {
                println!("#{} {} ({})", r.id, r.name, r.cooking_time);
            }
        }
        RecipeCommand::Show { id } => {
            let r = recipes::get(conn, RecipeId(id))?;
            let cooked = recipes::cook_history(conn, r.id)?;
            println!("{} ({})", r.name, r.cooking_time);
            for i in &r.ingredients {
                println!("  - {i}");
            }
            println!("{}", r.instructions);
            match cooked.first() {
                Some(last) => println!(
                    "cooked {} times, last on {}",
                    cooked.len(),
                    last.cooked_at.format("%Y-%m-%d")
                ),
                None => println!("never cooked"),
            }
        }
        RecipeCommand::Add(args) => {
            let id = recipes::add(conn, &args.into())?;
            println!("added #{id}");
        }
        RecipeCommand::Update { id, recipe } => {
            recipes::update(conn, RecipeId(id), &recipe.into())?
        }
        RecipeCommand::Remove { id } => recipes::delete(conn, RecipeId(id))?,
        RecipeCommand::Cook { id } => {
            for d in deduction::cook(conn, RecipeId(id))? {
                match d.outcome {
                    DeductionOutcome::Reduced { remaining, unit } => {
                        println!("{}: {remaining} {unit} left", d.ingredient)
                    }
                    DeductionOutcome::Exhausted => println!("{}: used up", d.ingredient),
                    DeductionOutcome::NotInInventory => {
                        println!("{}: not in inventory", d.ingredient)
                    }
                    DeductionOutcome::Incomparable => {
                        println!("{}: units don't compare, left as is", d.ingredient)
                    }
                }
            }
        }
        RecipeCommand::Cookable => {
            let all = inventory::list(conn)?;
            let recipes = recipes::list(conn)?;
            for r in cookable_recipes(&all, &recipes) {
                println!("#{} {}", r.id, r.name);
            }
        }
        RecipeCommand::Stats { limit } => {
            println!("Most cooked:");
            for (name, count) in recipes::most_cooked(conn, limit)? {
                println!("  {name}: {count}");
            }
            println!("Most used ingredients:");
            for (name, count) in recipes::most_used_ingredients(conn, limit)? {
                println!("  {name}: {count}");
            }
        }
    }
    Ok(())
}

pub fn plan(ctx: &mut Context, cmd: PlanCommand) -> Result<()> {
    match cmd {
        PlanCommand::Set { date, slot, meal } => {
            meal_plan::save_entry(&mut ctx.conn, date, slot, &meal)?
        }
        PlanCommand::Show { from, days } => {
            let from = from.unwrap_or(ctx.today);
            for offset in 0..days {
                let Some(day) = from.checked_add_days(chrono::Days::new(offset)) else {
                    break;
                };
                println!("{}", day.format("%a %b %-d"));
                for (slot, choice) in meal_plan::meals_for_date(&mut ctx.conn, day)? {
                    println!("  {slot}: {choice}");
                }
            }
        }
    }
    Ok(())
}

pub fn shop(ctx: &mut Context, cmd: ShopCommand) -> Result<()> {
    let conn = &mut ctx.conn;
    match cmd {
        ShopCommand::Plan { days } => {
            let planned = meal_plan::upcoming_home_meals(conn, ctx.today, days)?;
            if planned.is_empty() {
                println!("no home meals planned for the next {days} days");
                return Ok(());
            }
            println!("{}", projection::project(conn, &planned)?);
        }
        ShopCommand::List => {
            for item in shopping_list::list_items(conn)? {
                let mark = if item.checked { "x" } else { " " };
                println!("[{mark}] #{} {}", item.id, item.name);
            }
        }
        ShopCommand::Add { name } => {
            let id = shopping_list::add_item(conn, &name)?;
            println!("added #{id}");
        }
        ShopCommand::Check { id } => shopping_list::set_checked(conn, ShoppingItemId(id), true)?,
        ShopCommand::Uncheck { id } => {
            shopping_list::set_checked(conn, ShoppingItemId(id), false)?
        }
        ShopCommand::Remove { id } => shopping_list::remove_item(conn, ShoppingItemId(id))?,
        ShopCommand::Clear => {
            let removed = shopping_list::clear_checked(conn)?;
            println!("removed {removed} items");
        }
    }
    Ok(())
}

pub fn today(ctx: &mut Context) -> Result<()> {
    let today = ctx.today;
    let conn = &mut ctx.conn;

    println!("Today, {}", today.format("%A, %B %-d"));
    for (slot, choice) in meal_plan::meals_for_date(conn, today)? {
        println!("  {slot}: {choice}");
    }

    for reminder in reminders::upcoming_thaw_reminders(conn, today)? {
        println!("{reminder}");
    }

    let planned = meal_plan::upcoming_home_meals(conn, today, DEFAULT_PLAN_DAYS)?;
    let plan = projection::project(conn, &planned)?;
    let short: Vec<_> = plan.items.iter().take(3).map(|i| i.name.as_str()).collect();
    match plan.urgency(today) {
        None => {}
        Some(ShopUrgency::Today) => {
            println!("Go shopping today, running short on {}", short.join(", "))
        }
        Some(ShopUrgency::Tomorrow) => {
            println!("Shop tomorrow before you run out of {}", short.join(", "))
        }
        Some(ShopUrgency::By(day)) => println!(
            "Plan to shop by {}, {} item(s) needed",
            day.format("%A"),
            plan.items.len()
        ),
    }
    Ok(())
}
