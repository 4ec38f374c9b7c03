//! Defines the endpoint for saving the expense grid for a day.

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    db::Database,
    expense::{
        fetch_expenses_for_date,
        form::{ExpenseGridForm, expense_grid_rows},
        replace_expenses_for_date,
    },
};

/// The state needed to save the expense grid.
#[derive(Debug, Clone)]
pub struct ReplaceExpensesState {
    /// The database the expenses are saved to.
    pub db: Database,
}

impl FromRef<AppState> for ReplaceExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// A route handler that replaces the expenses on `date` with the rows of the
/// submitted grid.
///
/// Responds with a success alert and the saved rows as an out-of-band swap.
pub async fn replace_expenses_endpoint(
    Path(date): Path<Date>,
    State(state): State<ReplaceExpensesState>,
    Form(form): Form<ExpenseGridForm>,
) -> Response {
    match save_grid(date, form, &state.db) {
        Ok(response) => response,
        Err(error) => {
            tracing::error!("could not save expenses for {date}: {error}");
            error.into_alert_response()
        }
    }
}

fn save_grid(date: Date, form: ExpenseGridForm, db: &Database) -> Result<Response, Error> {
    let expenses = form.into_expenses(date)?;
    let (deleted, ids) = replace_expenses_for_date(date, expenses, db)?;
    let saved = fetch_expenses_for_date(date, db)?;

    let alert = Alert::Success {
        message: "Expenses saved".to_owned(),
        details: format!(
            "Saved {} expenses for {date}, replacing {deleted} previous expenses.",
            ids.len()
        ),
    };

    Ok(html! {
        (alert.into_markup())
        (expense_grid_rows(&saved, true))
    }
    .into_response())
}
