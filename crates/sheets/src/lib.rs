//! Google Sheets client used as the visit log destination.
//!
//! [`credentials`] loads the service-account key, [`auth`] turns it into
//! OAuth2 access tokens, [`api`] wraps the Drive and Sheets REST endpoints,
//! and [`sink`] adapts the lot to [`clicklog_core::sink::VisitSink`].

pub mod api;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod sink;

pub use api::SheetsClient;
pub use credentials::ServiceAccountKey;
pub use error::SheetsError;
pub use sink::{SheetsSink, SpreadsheetTarget};
