//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments swapped into the page's alert container by HTMX.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// An alert message to show the user after a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with instructions on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. })
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }

    /// Render the alert as markup for composing with other fragments.
    pub fn into_markup(self) -> Markup {
        let style = if self.is_error() {
            "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
            dark:bg-gray-800 dark:text-red-400"
        } else {
            "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
            dark:bg-gray-800 dark:text-green-400"
        };

        let (message, details) = match self {
            Alert::Success { message, details } | Alert::Error { message, details } => {
                (message, Some(details))
            }
            Alert::SuccessSimple { message } => (message, None),
        };

        html!(
            div
                class=(style)
                role="alert"
                onclick="this.remove()"
            {
                span class="font-medium" { (message) }

                @if let Some(details) = details.filter(|details| !details.is_empty()) {
                    " " (details)
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_html()).into_response()
    }
}
