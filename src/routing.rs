//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    analytics::{get_category_analytics_page, get_monthly_analytics_page},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expenses_endpoint, get_category_summary_json,
        get_expenses_json, get_expenses_page, get_monthly_summary_json, replace_expenses_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(
            endpoints::CATEGORY_ANALYTICS_VIEW,
            get(get_category_analytics_page),
        )
        .route(
            endpoints::MONTHLY_ANALYTICS_VIEW,
            get(get_monthly_analytics_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSES_FOR_DATE,
            get(get_expenses_json)
                .put(replace_expenses_endpoint)
                .delete(delete_expenses_endpoint),
        )
        .route(
            endpoints::CATEGORY_SUMMARY_API,
            get(get_category_summary_json),
        )
        .route(endpoints::MONTHLY_SUMMARY_API, get(get_monthly_summary_json))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the expenses page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EXPENSES_VIEW)
}
