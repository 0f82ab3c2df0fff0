use axum::http::Uri;

use crate::error::AppError;

/// Any path without a route: JSON 404.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
