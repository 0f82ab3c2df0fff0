use axum::routing::{get, post};
use axum::Router;

use crate::handlers::visit;
use crate::state::AppState;

/// Mount the visitor-facing routes.
///
/// ```text
/// GET  /        landing page
/// POST /log     record visit, always 200
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(visit::landing_page))
        .route("/log", post(visit::record_visit))
}
