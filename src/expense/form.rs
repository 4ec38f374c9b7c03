//! The grid of expense rows used to add and update the expenses for a day.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    expense::{Expense, NewExpense},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The categories offered in the category dropdowns.
///
/// Expenses may have other categories, e.g. ones created through the JSON
/// API, and these are added to the dropdown for rows that use them.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Rent", "Food", "Shopping", "Entertainment", "Other"];

/// The minimum number of rows shown in the grid.
pub const GRID_ROWS: usize = 5;

/// The ID of the element holding the grid rows, used for out-of-band swaps.
pub const GRID_ROWS_ID: &str = "expense-grid-rows";

/// The form data for the expense grid.
///
/// Each field holds one value per row, in row order.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExpenseGridForm {
    /// The amount for each row as typed, blank for unused rows.
    #[serde(default)]
    pub amount: Vec<String>,
    /// The category for each row.
    #[serde(default)]
    pub category: Vec<String>,
    /// The notes for each row.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ExpenseGridForm {
    /// Convert the submitted rows into expenses on `expense_date`.
    ///
    /// Rows with a blank amount are skipped.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if an amount is not a number, or
    /// [Error::MissingCategory] if a row with an amount has no category.
    pub fn into_expenses(self, expense_date: Date) -> Result<Vec<NewExpense>, Error> {
        let mut expenses = Vec::new();

        for (index, amount) in self.amount.iter().enumerate() {
            let amount = amount.trim();

            if amount.is_empty() {
                continue;
            }

            let amount: f64 = amount
                .parse()
                .ok()
                .filter(|amount: &f64| amount.is_finite())
                .ok_or_else(|| Error::InvalidAmount(amount.to_owned()))?;

            let category = self
                .category
                .get(index)
                .map(|category| category.trim())
                .filter(|category| !category.is_empty())
                .ok_or(Error::MissingCategory(index + 1))?;

            let notes = self
                .notes
                .get(index)
                .map(|notes| notes.trim())
                .filter(|notes| !notes.is_empty());

            expenses.push(Expense::build(expense_date, amount, category).notes(notes));
        }

        Ok(expenses)
    }
}

/// Renders a dropdown of categories with `selected` chosen.
pub fn category_select(id: &str, selected: Option<&str>) -> Markup {
    let has_custom_category =
        selected.is_some_and(|selected| !DEFAULT_CATEGORIES.contains(&selected));

    html! {
        select
            name="category"
            id=(id)
            aria-label="Category"
            class=(FORM_TEXT_INPUT_STYLE)
        {
            option value="" selected[selected.is_none()] { "Select a category" }

            @if has_custom_category {
                @if let Some(selected) = selected {
                    option value=(selected) selected { (selected) }
                }
            }

            @for category in DEFAULT_CATEGORIES {
                option value=(category) selected[selected == Some(category)] { (category) }
            }
        }
    }
}

/// Formats `amount` for the grid with two decimal places, or in full when
/// rounding to cents would change the stored value.
fn format_amount(amount: f64) -> String {
    let cents = format!("{amount:.2}");

    if cents.parse::<f64>() == Ok(amount) {
        cents
    } else {
        amount.to_string()
    }
}

/// Renders the rows of the expense grid, one per expense, padded with blank
/// rows up to [GRID_ROWS].
///
/// Set `out_of_band` to render the rows for an HTMX out-of-band swap.
pub fn expense_grid_rows(expenses: &[Expense], out_of_band: bool) -> Markup {
    let row_count = expenses.len().max(GRID_ROWS);

    html! {
        div
            id=(GRID_ROWS_ID)
            class="space-y-2"
            hx-swap-oob=[out_of_band.then_some("true")]
        {
            div class="grid grid-cols-12 gap-2"
            {
                span class={(FORM_LABEL_STYLE) " col-span-3"} { "Amount" }
                span class={(FORM_LABEL_STYLE) " col-span-4"} { "Category" }
                span class={(FORM_LABEL_STYLE) " col-span-5"} { "Notes" }
            }

            @for index in 0..row_count {
                @let expense = expenses.get(index);
                @let amount = expense.map(|expense| format_amount(expense.amount));

                div class="grid grid-cols-12 gap-2"
                {
                    div class="col-span-3 input-wrapper"
                    {
                        input
                            name="amount"
                            id=(format!("amount-{index}"))
                            aria-label="Amount"
                            type="number"
                            step="any"
                            placeholder="0.00"
                            value=[amount]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div class="col-span-4"
                    {
                        (category_select(
                            &format!("category-{index}"),
                            expense.map(|expense| expense.category.as_str()),
                        ))
                    }

                    div class="col-span-5"
                    {
                        input
                            name="notes"
                            id=(format!("notes-{index}"))
                            aria-label="Notes"
                            type="text"
                            placeholder="Notes"
                            value=[expense.and_then(|expense| expense.notes.as_deref())]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod form_tests {
    use time::macros::date;

    use crate::{
        Error,
        expense::{Expense, form::ExpenseGridForm},
    };

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn skips_rows_with_blank_amount() {
        let form = ExpenseGridForm {
            amount: strings(&["15.50", "", "  ", "45"]),
            category: strings(&["Food", "", "Rent", "Transport"]),
            notes: strings(&["Lunch", "", "", ""]),
        };

        let expenses = form.into_expenses(date!(2024 - 09 - 30)).unwrap();

        assert_eq!(
            expenses,
            vec![
                Expense::build(date!(2024 - 09 - 30), 15.50, "Food").notes(Some("Lunch")),
                Expense::build(date!(2024 - 09 - 30), 45.0, "Transport"),
            ]
        );
    }

    #[test]
    fn rejects_invalid_amount() {
        let form = ExpenseGridForm {
            amount: strings(&["twelve"]),
            category: strings(&["Food"]),
            notes: strings(&[""]),
        };

        let result = form.into_expenses(date!(2024 - 09 - 30));

        assert_eq!(result, Err(Error::InvalidAmount("twelve".to_owned())));
    }

    #[test]
    fn rejects_non_finite_amount() {
        let form = ExpenseGridForm {
            amount: strings(&["inf"]),
            category: strings(&["Food"]),
            notes: strings(&[""]),
        };

        let result = form.into_expenses(date!(2024 - 09 - 30));

        assert_eq!(result, Err(Error::InvalidAmount("inf".to_owned())));
    }

    #[test]
    fn rejects_amount_without_category() {
        let form = ExpenseGridForm {
            amount: strings(&["", "1.00"]),
            category: strings(&["", ""]),
            notes: strings(&["", ""]),
        };

        let result = form.into_expenses(date!(2024 - 09 - 30));

        assert_eq!(result, Err(Error::MissingCategory(2)));
    }

    #[test]
    fn accepts_negative_amounts() {
        let form = ExpenseGridForm {
            amount: strings(&["-5"]),
            category: strings(&["Shopping"]),
            notes: strings(&["Refund"]),
        };

        let expenses = form.into_expenses(date!(2024 - 09 - 30)).unwrap();

        assert_eq!(expenses[0].amount, -5.0);
    }
}
