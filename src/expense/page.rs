//! Defines the route handler for the page for adding and updating the expenses on a day.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    db::Database,
    endpoints::{self, format_endpoint},
    expense::{
        Expense, fetch_expenses_for_date,
        form::{category_select, expense_grid_rows},
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, dollar_input_styles, format_currency, loading_spinner,
    },
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database the expenses are read from.
    pub db: Database,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the expenses page.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensesPageQuery {
    /// The day to show, defaults to today.
    pub date: Option<Date>,
}

/// Renders the page for adding and updating the expenses on a day.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ExpensesPageQuery>,
) -> Result<Response, Error> {
    let date = match query.date {
        Some(date) => date,
        None => local_today(&state.local_timezone)?,
    };

    let expenses = fetch_expenses_for_date(date, &state.db)
        .inspect_err(|error| tracing::error!("could not get expenses for {date}: {error}"))?;

    Ok(expenses_view(date, &expenses).into_response())
}

fn expenses_view(date: Date, expenses: &[Expense]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let expenses_for_date_route = format_endpoint(endpoints::EXPENSES_FOR_DATE, date);
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="get"
                action=(endpoints::EXPENSES_VIEW)
                class="w-full flex items-end gap-2 mb-6"
            {
                div class="grow"
                {
                    label for="date-picker" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date-picker"
                        type="date"
                        value=(date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class="px-4 py-2.5 bg-blue-500 text-white rounded"
                {
                    "Go"
                }
            }

            form
                id="expense-grid"
                hx-put=(expenses_for_date_route)
                hx-target="#alert-container"
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                div class="flex justify-between items-baseline"
                {
                    h2 class="text-xl font-bold" { "Expenses for " (date) }
                    span class="text-sm" { "Total: " (format_currency(total)) }
                }

                (expense_grid_rows(expenses, false))

                button type="submit" id="save-button" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Save"
                }
            }

            div class="w-full mt-2 text-right"
            {
                button
                    type="button"
                    hx-delete=(expenses_for_date_route)
                    hx-confirm=(format!("Delete all the expenses on {date}?"))
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete all expenses on this day"
                }
            }

            form
                id="quick-add"
                hx-post=(endpoints::EXPENSES_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 mt-8"
            {
                h2 class="text-xl font-bold" { "Quick Add" }

                div class="grid grid-cols-2 gap-2"
                {
                    div
                    {
                        label for="quick-add-date" class=(FORM_LABEL_STYLE) { "Date" }

                        input
                            name="date"
                            id="quick-add-date"
                            type="date"
                            value=(date)
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="quick-add-amount" class=(FORM_LABEL_STYLE) { "Amount" }

                        div class="input-wrapper w-full"
                        {
                            input
                                name="amount"
                                id="quick-add-amount"
                                type="number"
                                step="0.01"
                                placeholder="0.00"
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }

                    div
                    {
                        label for="quick-add-category" class=(FORM_LABEL_STYLE) { "Category" }

                        (category_select("quick-add-category", None))
                    }

                    div
                    {
                        label for="quick-add-notes" class=(FORM_LABEL_STYLE) { "Notes" }

                        input
                            name="notes"
                            id="quick-add-notes"
                            type="text"
                            placeholder="Notes"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
            }
        }
    };

    base("Expenses", &[dollar_input_styles()], &content)
}
