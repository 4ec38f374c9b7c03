use std::{error::Error, path::PathBuf};

use clap::Parser;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    Database, Expense, fetch_expenses_for_date, get_local_offset, insert_expense,
};

/// Create the expense tracker database and fill it with a few sample expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database, created if it does not exist.
    #[arg(long, env = "EXPENSES_DB_PATH", default_value = "expenses.db")]
    db_path: PathBuf,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, env = "EXPENSES_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// Only create the tables, do not insert the sample expenses.
    #[arg(long)]
    no_sample_data: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(error.into());
        }
    }

    let args = Args::parse();

    let local_offset = get_local_offset(&args.timezone)
        .ok_or_else(|| format!("unknown timezone \"{}\"", args.timezone))?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    println!("Creating database at {:#?}", args.db_path);
    let db = Database::open(&args.db_path)?;

    if !args.no_sample_data {
        println!("Adding sample expenses...");

        let sample_expenses = [
            Expense::build(today, 15.50, "Food").notes(Some("Lunch")),
            Expense::build(today, 45.00, "Transport").notes(Some("Monthly pass")),
            Expense::build(today - Duration::days(1), 25.30, "Food").notes(Some("Groceries")),
            Expense::build(today - Duration::days(2), 12.00, "Entertainment")
                .notes(Some("Movie")),
        ];

        for expense in &sample_expenses {
            insert_expense(expense, &db)?;
        }
    }

    println!("Expenses for today ({today}):");
    for expense in fetch_expenses_for_date(today, &db)? {
        println!(
            "  #{} {:>8.2} {:<15} {}",
            expense.id,
            expense.amount,
            expense.category,
            expense.notes.as_deref().unwrap_or_default()
        );
    }

    println!("Success!");

    Ok(())
}
