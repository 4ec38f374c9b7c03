//! Defines the endpoint for adding a single expense.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    db::Database,
    endpoints,
    expense::{Expense, insert_expense},
};

/// The state needed to add an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database the expense is saved to.
    pub db: Database,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// The form data for adding an expense.
#[derive(Debug, Deserialize, Serialize)]
pub struct NewExpenseForm {
    /// The day the money was spent.
    pub date: Date,
    /// How much was spent.
    pub amount: f64,
    /// What kind of expense it was.
    pub category: String,
    /// Free text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
struct DateQuery {
    date: Date,
}

/// The URL of the expenses page for `date`.
pub(crate) fn expenses_page_url(date: Date) -> String {
    match serde_urlencoded::to_string(DateQuery { date }) {
        Ok(query) => format!("{}?{query}", endpoints::EXPENSES_VIEW),
        Err(error) => {
            tracing::error!("could not build query string for {date}: {error}");
            endpoints::EXPENSES_VIEW.to_owned()
        }
    }
}

/// A route handler for adding an expense, redirects to the expenses page for
/// the expense's date on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<NewExpenseForm>,
) -> Response {
    if !form.amount.is_finite() {
        return Error::InvalidAmount(form.amount.to_string()).into_alert_response();
    }

    let category = form.category.trim();
    if category.is_empty() {
        return Error::MissingCategory(1).into_alert_response();
    }

    let notes = form
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty());
    let expense = Expense::build(form.date, form.amount, category).notes(notes);

    if let Err(error) = insert_expense(&expense, &state.db) {
        tracing::error!("could not create expense: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(expenses_page_url(form.date)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        expense::{
            create_endpoint::{
                CreateExpenseState, NewExpenseForm, create_expense_endpoint, expenses_page_url,
            },
            fetch_expenses_for_date,
        },
        test_utils::{assert_hx_redirect, get_test_database},
    };

    #[test]
    fn page_url_has_date_query() {
        assert_eq!(
            expenses_page_url(date!(2024 - 09 - 30)),
            "/expenses?date=2024-09-30"
        );
    }

    #[tokio::test]
    async fn can_create_expense() {
        let (_dir, db) = get_test_database();
        let state = CreateExpenseState { db: db.clone() };
        let form = NewExpenseForm {
            date: date!(2024 - 09 - 30),
            amount: 15.5,
            category: "Food".to_owned(),
            notes: Some("Lunch".to_owned()),
        };

        let response = create_expense_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/expenses?date=2024-09-30");
        let expenses = fetch_expenses_for_date(date!(2024 - 09 - 30), &db).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 15.5);
        assert_eq!(expenses[0].category, "Food");
        assert_eq!(expenses[0].notes.as_deref(), Some("Lunch"));
    }

    #[tokio::test]
    async fn blank_notes_are_stored_as_none() {
        let (_dir, db) = get_test_database();
        let state = CreateExpenseState { db: db.clone() };
        let form = NewExpenseForm {
            date: date!(2024 - 09 - 30),
            amount: 3.0,
            category: "Other".to_owned(),
            notes: Some("   ".to_owned()),
        };

        create_expense_endpoint(State(state), Form(form)).await;

        let expenses = fetch_expenses_for_date(date!(2024 - 09 - 30), &db).unwrap();
        assert_eq!(expenses[0].notes, None);
    }

    #[tokio::test]
    async fn rejects_blank_category() {
        let (_dir, db) = get_test_database();
        let state = CreateExpenseState { db: db.clone() };
        let form = NewExpenseForm {
            date: date!(2024 - 09 - 30),
            amount: 3.0,
            category: "".to_owned(),
            notes: None,
        };

        let response = create_expense_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            fetch_expenses_for_date(date!(2024 - 09 - 30), &db)
                .unwrap()
                .is_empty()
        );
    }
}
