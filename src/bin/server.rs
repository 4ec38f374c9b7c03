use std::{
    error::Error,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{AppState, Database, build_router, graceful_shutdown};

/// The web server for recording and reviewing expenses.
///
/// Every option may also be set with an environment variable, either directly
/// or in a `.env` file in the working directory.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    ///
    /// The database and its tables are created if they do not exist.
    #[arg(long, env = "EXPENSES_DB_PATH", default_value = "expenses.db")]
    db_path: PathBuf,

    /// The address to serve the app from.
    #[arg(short, long, env = "EXPENSES_ADDRESS", default_value = "127.0.0.1")]
    address: IpAddr,

    /// The port to serve the app from.
    #[arg(short, long, env = "EXPENSES_PORT", default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    ///
    /// Used to decide what today's date is.
    #[arg(long, env = "EXPENSES_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(error.into());
        }
    }

    let args = Args::parse();

    setup_logging()?;

    let db = Database::open(&args.db_path)?;
    tracing::info!("Using database at {:?}", db.path());

    let state = AppState::new(db, &args.timezone)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::new(args.address, args.port);
    tracing::info!("HTTP server listening on http://{}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log INFO and above to stdout, and DEBUG and above to `debug.log`.
///
/// Set `RUST_LOG` to narrow what is logged, e.g. `RUST_LOG=expense_tracker=debug`.
fn setup_logging() -> Result<(), Box<dyn Error>> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Handlers log their own errors, so 5xx responses are not logged again here.
        .on_failure(());

    router.layer(tracing_layer)
}
