//! The page showing the spending in each calendar month.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    analytics::charts::{AnalyticsChart, charts_script, charts_view, monthly_chart},
    db::Database,
    endpoints,
    expense::{MonthlySummary, fetch_monthly_expense_summary},
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, link,
    },
    navigation::NavBar,
};

/// The state needed for the monthly analytics page.
#[derive(Debug, Clone)]
pub struct MonthlyAnalyticsState {
    /// The database the expenses are read from.
    pub db: Database,
}

impl FromRef<AppState> for MonthlyAnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// Renders the spending in each month, oldest first.
pub async fn get_monthly_analytics_page(
    State(state): State<MonthlyAnalyticsState>,
) -> Result<Response, Error> {
    let summary = fetch_monthly_expense_summary(&state.db)
        .inspect_err(|error| tracing::error!("could not get the monthly summary: {error}"))?;

    Ok(monthly_analytics_view(&summary).into_response())
}

fn monthly_table(summary: &[MonthlySummary]) -> Markup {
    html! {
        div class="w-full max-w-2xl overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                    }
                }

                tbody
                {
                    @for row in summary {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                            {
                                (row.month.label())
                            }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.total)) }
                            td class=(TABLE_CELL_STYLE) { (row.count) }
                        }
                    }
                }
            }
        }
    }
}

fn monthly_analytics_view(summary: &[MonthlySummary]) -> Markup {
    let nav_bar = NavBar::new(endpoints::MONTHLY_ANALYTICS_VIEW).into_html();

    if summary.is_empty() {
        let content = html! {
            (nav_bar)

            div class=(PAGE_CONTAINER_STYLE)
            {
                h2 class="text-xl font-bold" { "Nothing here yet..." }

                p
                {
                    "Monthly totals will show up here once you add some expenses on the "
                    (link(endpoints::EXPENSES_VIEW, "Add/Update")) " page."
                }
            }
        };

        return base("By Month", &[], &content);
    }

    let charts = [AnalyticsChart {
        id: "monthly-chart",
        options: monthly_chart(summary).to_string(),
    }];

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Spending by Month" }

            (charts_view(&charts))
            (monthly_table(summary))
        }
    };

    base("By Month", &charts_script(&charts), &content)
}
