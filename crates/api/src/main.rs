use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clicklog_core::sink::VisitSink;
use clicklog_sheets::{ServiceAccountKey, SheetsClient, SheetsSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clicklog_api::config::ServerConfig;
use clicklog_api::router::build_app_router;
use clicklog_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        trust_forwarded_for = config.trust_forwarded_for,
        "Loaded server configuration",
    );

    // --- Visit sink ---
    let key = ServiceAccountKey::from_file(&config.sheets.credentials_file)
        .expect("Failed to load Google service account credentials");

    let client = SheetsClient::new(key, Duration::from_secs(config.sheets.timeout_secs))
        .expect("Failed to build Google Sheets client");
    tracing::info!(service_account = %client.service_account(), "Google Sheets client created");

    let sink = SheetsSink::connect(client, config.sheets.target())
        .await
        .expect("Failed to open spreadsheet");
    tracing::info!(sink = %sink.describe(), "Visit sink ready");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        sink: Arc::new(sink),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "clicklog_api=debug,clicklog_sheets=debug,tower_http=debug".into()
    });
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
