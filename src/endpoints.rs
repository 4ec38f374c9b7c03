//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{date}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the expenses page.
pub const ROOT: &str = "/";
/// The page for adding and updating the expenses on a day.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for the spending by category in a date range.
pub const CATEGORY_ANALYTICS_VIEW: &str = "/analytics/category";
/// The page for the spending by calendar month.
pub const MONTHLY_ANALYTICS_VIEW: &str = "/analytics/month";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create a single expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to get, replace or delete the expenses on a day.
pub const EXPENSES_FOR_DATE: &str = "/api/expenses/{date}";
/// The route for the JSON summary of spending by category.
pub const CATEGORY_SUMMARY_API: &str = "/api/summary/category";
/// The route for the JSON summary of spending by month.
pub const MONTHLY_SUMMARY_API: &str = "/api/summary/month";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{date}', '{date}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
