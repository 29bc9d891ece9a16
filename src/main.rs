// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

mod commands;
mod cookability;
mod database;
mod deduction;
mod error;
mod inventory;
mod meal_plan;
mod projection;
mod quantity;
mod recipes;
mod reminders;
mod seed;
mod shopping_list;
mod units;

#[cfg(test)]
mod fixtures;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

/// Track what is in the house and find out when the meal plan will run it out.
#[derive(Parser, Debug)]
struct Args {
    /// Database file to use instead of the one in the user data directory.
    #[arg(long, env = "PANTRY_DATABASE", global = true)]
    database: Option<PathBuf>,

    /// Plan as if today were this date (YYYY-MM-DD).
    #[arg(long, global = true)]
    today: Option<chrono::NaiveDate>,

    /// Log more; repeat for debug output.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fill an empty database with a sample household.
    Seed,
    #[command(subcommand)]
    Inventory(commands::InventoryCommand),
    #[command(subcommand)]
    Recipe(commands::RecipeCommand),
    #[command(subcommand)]
    Plan(commands::PlanCommand),
    #[command(subcommand)]
    Shop(commands::ShopCommand),
    /// Today's meals, what to take out of the freezer, and when to shop.
    Today,
}

/// This is where the database lives on-disk. On Linux it should be like:
/// `~/.local/share/pantry_planner/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    let path = dirs.data_dir().join("pantry_planner");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .env()
        .init()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let database_path = match args.database {
        Some(path) => path,
        None => data_path()?.join("data.sqlite"),
    };
    let conn = database::establish_connection(database_path)?;
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut ctx = commands::Context { conn, today };

    match args.commands {
        Commands::Seed => commands::seed(&mut ctx)?,
        Commands::Inventory(cmd) => commands::inventory(&mut ctx, cmd)?,
        Commands::Recipe(cmd) => commands::recipe(&mut ctx, cmd)?,
        Commands::Plan(cmd) => commands::plan(&mut ctx, cmd)?,
        Commands::Shop(cmd) => commands::shop(&mut ctx, cmd)?,
        Commands::Today => commands::today(&mut ctx)?,
    }
    Ok(())
}
