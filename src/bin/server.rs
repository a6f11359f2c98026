use std::{env, error::Error, fs::OpenOptions, net::SocketAddr, path::Path, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use cashbook::{AppState, build_router, graceful_shutdown, logging_middleware};

/// Serve the cashbook web app over HTTPS on localhost.
///
/// The cookie secret is read from the `SECRET` environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The SQLite database holding users, accounts, categories and transactions.
    /// It is created if it does not exist.
    #[arg(long)]
    db_path: String,

    /// Directory holding the TLS certificate `cert.pem` and key `key.pem`.
    #[arg(long)]
    cert_path: String,

    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Timezone for transaction dates and the dashboard's month-to-date range,
    /// e.g. "Asia/Jakarta".
    #[arg(long, default_value = "Asia/Jakarta")]
    timezone: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging()?;

    let state = open_app_state(&args)?;
    let tls_config = load_tls_config(Path::new(&args.cert_path)).await?;
    let router = app_router(state);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("cashbook listening on https://{addr}");

    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    tracing::info!("cashbook stopped");

    Ok(())
}

/// Open the database and build the shared state, failing early on a bad
/// timezone or a missing secret rather than on the first request.
fn open_app_state(args: &Args) -> Result<AppState, Box<dyn Error>> {
    let secret = env::var("SECRET")
        .map_err(|_| "the environment variable SECRET must be set to sign auth cookies")?;

    let connection = Connection::open(&args.db_path)
        .map_err(|error| format!("could not open database at {}: {error}", args.db_path))?;
    let state = AppState::new(connection, &secret, &args.timezone)
        .map_err(|error| format!("could not start with --timezone {}: {error}", args.timezone))?;

    tracing::info!(
        "Using database {} with dates in {}",
        args.db_path,
        args.timezone
    );

    Ok(state)
}

async fn load_tls_config(cert_dir: &Path) -> Result<RustlsConfig, Box<dyn Error>> {
    let cert = cert_dir.join("cert.pem");
    let key = cert_dir.join("key.pem");

    RustlsConfig::from_pem_file(&cert, &key)
        .await
        .map_err(|error| format!("could not load TLS files {cert:?} and {key:?}: {error}").into())
}

fn app_router(state: AppState) -> Router {
    let router = build_router(state).layer(middleware::from_fn(logging_middleware));

    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let matched_path = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str);

            tracing::debug_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                matched_path
            )
        })
        // Failed requests are already logged by `logging_middleware`.
        .on_failure(());
    let router = router.layer(tracing_layer);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    router
}

/// Log INFO and above to stdout, and DEBUG and above to `debug.log`.
fn setup_logging() -> Result<(), Box<dyn Error>> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .map_err(|error| format!("could not open debug.log: {error}"))?;

    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(filter::LevelFilter::INFO);
    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(file_log)
        .init();

    Ok(())
}
