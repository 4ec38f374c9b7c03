//! Expenses: recording what was spent on each day, and summarising the spending
//! by category and by month.
//!
//! Every public data access function here runs in its own [crate::Database]
//! scope.

mod api;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod page;
mod replace_endpoint;
mod summary;

pub use api::{get_category_summary_json, get_expenses_json, get_monthly_summary_json};
pub use core::{
    Expense, ExpenseId, NewExpense, create_expense_table, delete_expenses_for_date,
    fetch_expenses_for_date, insert_expense, replace_expenses_for_date,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expenses_endpoint;
pub use page::get_expenses_page;
pub use replace_endpoint::replace_expenses_endpoint;
pub use summary::{
    CategorySummary, MonthlySummary, YearMonth, fetch_expense_summary,
    fetch_monthly_expense_summary,
};
