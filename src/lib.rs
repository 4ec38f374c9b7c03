//! Expense Tracker is a web app for recording day-to-day expenses and
//! reviewing where the money went.
//!
//! This library provides a REST API that directly serves HTML pages, plus a
//! small JSON API over the same data. Expenses live in a single SQLite table
//! and every data access runs in its own short-lived connection scope, see
//! [Database].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod analytics;
mod app_state;
mod db;
mod endpoints;
mod error;
mod expense;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::{Database, DatabaseInfo, initialize as initialize_db};
pub use error::Error;
pub use expense::{
    CategorySummary, Expense, ExpenseId, MonthlySummary, NewExpense, YearMonth,
    delete_expenses_for_date, fetch_expense_summary, fetch_expenses_for_date,
    fetch_monthly_expense_summary, insert_expense, replace_expenses_for_date,
};
pub use routing::build_router;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
