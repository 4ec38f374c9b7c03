//! JSON endpoints for reading expenses and the spending summaries.

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState,
    db::Database,
    expense::{fetch_expense_summary, fetch_expenses_for_date, fetch_monthly_expense_summary},
};

/// The state needed for the JSON endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseApiState {
    /// The database the expenses are read from.
    pub db: Database,
}

impl FromRef<AppState> for ExpenseApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// The date range for the category summary, both ends inclusive.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

/// Get the expenses on `date` as JSON.
pub async fn get_expenses_json(
    Path(date): Path<Date>,
    State(state): State<ExpenseApiState>,
) -> Response {
    match fetch_expenses_for_date(date, &state.db) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Get the spending by category between `start` and `end` as JSON.
pub async fn get_category_summary_json(
    State(state): State<ExpenseApiState>,
    Query(range): Query<DateRangeQuery>,
) -> Response {
    match fetch_expense_summary(range.start, range.end, &state.db) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Get the spending by month as JSON.
pub async fn get_monthly_summary_json(State(state): State<ExpenseApiState>) -> Response {
    match fetch_monthly_expense_summary(&state.db) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}
