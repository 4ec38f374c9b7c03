use std::{error::Error, path::PathBuf};

use clap::Parser;

use expense_tracker::Database;

/// Check that the expense tracker database can be opened and list its tables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long, env = "EXPENSES_DB_PATH", default_value = "expenses.db")]
    db_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(error.into());
        }
    }

    let args = Args::parse();

    let info = Database::open_existing(&args.db_path)?.check()?;

    println!("Connected to {:#?}", info.path);
    println!("SQLite version: {}", info.sqlite_version);
    println!("Tables:");
    for table in &info.tables {
        println!("  {table}");
    }

    Ok(())
}
