//! Handlers for the landing page and the visit log endpoint.
//!
//! `POST /log` is best-effort: the visitor always sees the confirmation,
//! whether or not the row reached the spreadsheet.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::response::Html;
use clicklog_core::error::SinkError;
use clicklog_core::visit::VisitRecord;

use crate::request_meta::{client_ip, user_agent};
use crate::state::AppState;

/// The awareness page served at `/`.
pub const LANDING_PAGE: &str = include_str!("../../assets/landing.html");

/// Body returned by `POST /log`.
pub const CONFIRMATION: &str = "<h3>Thanks — your consent recorded. You may now continue.</h3>";

/// GET /
///
/// Serve the landing page. No side effects.
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// POST /log
///
/// Record the visit and confirm. Sink failures, including an append that
/// outlives [`ServerConfig::append_deadline`], are logged and dropped.
///
/// [`ServerConfig::append_deadline`]: crate::config::ServerConfig::append_deadline
pub async fn record_visit(State(state): State<AppState>, request: Request) -> Html<&'static str> {
    let record = {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let headers = request.headers();

        VisitRecord::new(
            client_ip(headers, peer, state.config.trust_forwarded_for),
            user_agent(headers),
        )
    };

    let deadline = state.config.append_deadline();
    let outcome = match tokio::time::timeout(deadline, state.sink.append(&record)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(SinkError::Timeout {
            after_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
        }),
    };

    match outcome {
        Ok(()) => {
            tracing::info!(
                client_ip = %record.client_ip,
                timestamp = %record.timestamp(),
                "Visit recorded",
            );
        }
        Err(e) => {
            // Deliberately not surfaced to the visitor.
            tracing::error!(
                error = %e,
                kind = e.kind(),
                timestamp = %record.timestamp(),
                client_ip = %record.client_ip,
                user_agent = %record.user_agent,
                "Failed to append visit row, continuing without it",
            );
        }
    }

    Html(CONFIRMATION)
}
