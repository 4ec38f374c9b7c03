//! The page showing the spending by category over a date range.

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
    analytics::charts::{AnalyticsChart, category_chart, charts_script, charts_view},
    db::Database,
    endpoints,
    expense::{CategorySummary, fetch_expense_summary},
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, format_percentage, link,
    },
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the category analytics page.
#[derive(Debug, Clone)]
pub struct CategoryAnalyticsState {
    /// The database the expenses are read from.
    pub db: Database,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CategoryAnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The date range to summarise.
///
/// Defaults to the first of the current month through to today.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryAnalyticsQuery {
    /// The first day in the range.
    pub start: Option<Date>,
    /// The last day in the range.
    pub end: Option<Date>,
}

/// Renders the spending by category between the requested dates.
pub async fn get_category_analytics_page(
    State(state): State<CategoryAnalyticsState>,
    Query(query): Query<CategoryAnalyticsQuery>,
) -> Result<Response, Error> {
    let (start, end) = match (query.start, query.end) {
        (Some(start), Some(end)) => (start, end),
        (start, end) => {
            let today = local_today(&state.local_timezone)?;
            (
                start.unwrap_or_else(|| today.replace_day(1).unwrap_or(today)),
                end.unwrap_or(today),
            )
        }
    };

    let summary = fetch_expense_summary(start, end, &state.db).inspect_err(|error| {
        tracing::error!("could not get the category summary for {start} to {end}: {error}")
    })?;

    Ok(category_analytics_view(start, end, &summary).into_response())
}

/// The share of `grand_total` that `total` makes up, between 0 and 1.
///
/// Returns zero when `grand_total` is zero.
fn share_of(total: f64, grand_total: f64) -> f64 {
    if grand_total == 0.0 {
        0.0
    } else {
        total / grand_total
    }
}

fn date_range_form(start: Date, end: Date) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::CATEGORY_ANALYTICS_VIEW)
            class="w-full max-w-2xl flex items-end gap-2 mb-6"
        {
            div class="grow"
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    name="start"
                    id="start"
                    type="date"
                    value=(start)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grow"
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    name="end"
                    id="end"
                    type="date"
                    value=(end)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class="px-4 py-2.5 bg-blue-500 text-white rounded"
            {
                "Show"
            }
        }
    }
}

fn category_table(summary: &[CategorySummary]) -> Markup {
    let grand_total: f64 = summary.iter().map(|row| row.total).sum();
    let expense_count: u32 = summary.iter().map(|row| row.count).sum();

    html! {
        div class="w-full max-w-2xl overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Share" }
                    }
                }

                tbody
                {
                    @for row in summary {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                            {
                                (row.category)
                            }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.total)) }
                            td class=(TABLE_CELL_STYLE) { (row.count) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (format_percentage(share_of(row.total, grand_total)))
                            }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                        td class=(TABLE_CELL_STYLE) { (format_currency(grand_total)) }
                        td class=(TABLE_CELL_STYLE) { (expense_count) }
                        td class=(TABLE_CELL_STYLE) {}
                    }
                }
            }
        }
    }
}

fn category_analytics_view(start: Date, end: Date, summary: &[CategorySummary]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORY_ANALYTICS_VIEW).into_html();
    let charts = [AnalyticsChart {
        id: "category-chart",
        options: category_chart(summary).to_string(),
    }];

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Spending by Category" }

            (date_range_form(start, end))

            @if summary.is_empty() {
                p
                {
                    "No expenses between " (start) " and " (end) ". You can add expenses on the "
                    (link(endpoints::EXPENSES_VIEW, "Add/Update")) " page."
                }
            } @else {
                (charts_view(&charts))
                (category_table(summary))
            }
        }
    };

    if summary.is_empty() {
        base("By Category", &[], &content)
    } else {
        base("By Category", &charts_script(&charts), &content)
    }
}
