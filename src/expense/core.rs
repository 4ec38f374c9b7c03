//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::{Error, db::Database};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for expense IDs.
pub type ExpenseId = i64;

/// Money spent on a given day.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// The day the money was spent.
    pub expense_date: Date,
    /// How much was spent.
    ///
    /// The sign is not checked, so refunds may be recorded as negative amounts.
    pub amount: f64,
    /// A short label for what kind of expense this was, e.g. "Food".
    pub category: String,
    /// Free text notes about the expense.
    pub notes: Option<String>,
    /// When the expense was recorded, in UTC.
    pub created_at: PrimitiveDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [NewExpense] for discoverability.
    pub fn build(expense_date: Date, amount: f64, category: &str) -> NewExpense {
        NewExpense {
            expense_date,
            amount,
            category: category.to_owned(),
            notes: None,
        }
    }
}

/// An expense that has not been saved to the database yet.
///
/// # Examples
///
/// ```
/// use time::macros::date;
///
/// use expense_tracker::Expense;
///
/// let lunch = Expense::build(date!(2024 - 09 - 30), 15.50, "Food").notes(Some("Lunch"));
///
/// assert_eq!(lunch.notes.as_deref(), Some("Lunch"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    /// The day the money was spent.
    pub expense_date: Date,
    /// How much was spent.
    pub amount: f64,
    /// A short label for what kind of expense this was.
    pub category: String,
    /// Free text notes about the expense.
    pub notes: Option<String>,
}

impl NewExpense {
    /// Set the notes for the expense.
    pub fn notes(mut self, notes: Option<&str>) -> Self {
        self.notes = notes.map(ToOwned::to_owned);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert `expense` and return the ID of the new row.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn insert_expense_row(expense: &NewExpense, connection: &Connection) -> Result<ExpenseId, Error> {
    let id = connection
        .prepare(
            "INSERT INTO expenses (expense_date, amount, category, notes)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )?
        .query_row(
            (
                expense.expense_date,
                expense.amount,
                &expense.category,
                &expense.notes,
            ),
            |row| row.get(0),
        )?;

    Ok(id)
}

/// Get all the expenses on `expense_date` in the order they were inserted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn select_expenses_for_date(
    expense_date: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, expense_date, amount, category, notes, created_at
             FROM expenses
             WHERE expense_date = :expense_date
             ORDER BY id ASC",
        )?
        .query_map(&[(":expense_date", &expense_date)], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Delete every expense on `expense_date`.
///
/// Returns the number of expenses deleted, which is zero if there were none.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_expense_rows_for_date(
    expense_date: Date,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM expenses WHERE expense_date = :expense_date",
            &[(":expense_date", &expense_date)],
        )
        .map_err(Error::from)
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expenses;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expenses table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                expense_date TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
        (),
    )?;

    // Every query filters or groups on the date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(expense_date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let expense_date = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let notes = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Expense {
        id,
        expense_date,
        amount,
        category,
        notes,
        created_at,
    })
}

// ============================================================================
// SCOPED OPERATIONS
// ============================================================================

/// Get all the expenses on `expense_date`.
///
/// # Errors
/// Returns an error if the database cannot be opened or queried.
pub fn fetch_expenses_for_date(
    expense_date: Date,
    database: &Database,
) -> Result<Vec<Expense>, Error> {
    tracing::info!("fetch_expenses_for_date called with {expense_date}");

    database.read(|connection| select_expenses_for_date(expense_date, connection))
}

/// Delete every expense on `expense_date` and return how many were deleted.
///
/// # Errors
/// Returns an error if the database cannot be opened or written to.
pub fn delete_expenses_for_date(expense_date: Date, database: &Database) -> Result<usize, Error> {
    tracing::info!("delete_expenses_for_date called with {expense_date}");

    database.write(|connection| delete_expense_rows_for_date(expense_date, connection))
}

/// Save a new expense and return its ID.
///
/// # Errors
/// Returns an error if the database cannot be opened or written to.
pub fn insert_expense(expense: &NewExpense, database: &Database) -> Result<ExpenseId, Error> {
    tracing::info!(
        "insert_expense called with date: {}, amount: {}, category: {}, notes: {:?}",
        expense.expense_date,
        expense.amount,
        expense.category,
        expense.notes
    );

    database.write(|connection| insert_expense_row(expense, connection))
}

/// Replace all of the expenses on `expense_date` with `expenses`.
///
/// The delete and inserts happen in a single transaction, so if any insert
/// fails the date keeps its previous expenses. The dates in `expenses` are
/// overwritten with `expense_date`.
///
/// Returns the number of expenses deleted and the IDs of the new expenses.
///
/// # Errors
/// Returns an error if the database cannot be opened or written to.
pub fn replace_expenses_for_date(
    expense_date: Date,
    expenses: Vec<NewExpense>,
    database: &Database,
) -> Result<(usize, Vec<ExpenseId>), Error> {
    tracing::info!(
        "replace_expenses_for_date called with {expense_date} and {} expenses",
        expenses.len()
    );

    database.write(|connection| {
        let deleted = delete_expense_rows_for_date(expense_date, connection)?;

        let ids = expenses
            .into_iter()
            .map(|expense| {
                let expense = NewExpense {
                    expense_date,
                    ..expense
                };
                insert_expense_row(&expense, connection)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((deleted, ids))
    })
}

// ============================================================================
// TESTS
// ============================================================================
