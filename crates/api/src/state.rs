use std::sync::Arc;

use clicklog_core::sink::VisitSink;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Destination for visit records, opened once at startup.
    pub sink: Arc<dyn VisitSink>,
}
