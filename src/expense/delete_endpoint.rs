//! Defines the endpoint for deleting every expense on a day.

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use time::Date;

use crate::{
    AppState,
    alert::Alert,
    db::Database,
    expense::{delete_expenses_for_date, form::expense_grid_rows},
};

/// The state needed to delete expenses.
#[derive(Debug, Clone)]
pub struct DeleteExpensesState {
    /// The database the expenses are deleted from.
    pub db: Database,
}

impl FromRef<AppState> for DeleteExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// Handle deleting the expenses on `date`.
///
/// Responds with an alert stating how many expenses were deleted and a blank
/// expense grid as an out-of-band swap.
pub async fn delete_expenses_endpoint(
    Path(date): Path<Date>,
    State(state): State<DeleteExpensesState>,
) -> Response {
    match delete_expenses_for_date(date, &state.db) {
        Ok(deleted) => {
            let message = match deleted {
                1 => format!("Deleted 1 expense on {date}"),
                deleted => format!("Deleted {deleted} expenses on {date}"),
            };

            html! {
                (Alert::SuccessSimple { message }.into_markup())
                (expense_grid_rows(&[], true))
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("could not delete expenses for {date}: {error}");
            error.into_alert_response()
        }
    }
}
