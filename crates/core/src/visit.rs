//! The single record this service produces.

use chrono::{DateTime, SecondsFormat, Utc};

/// One visit to the logging endpoint.
///
/// `client_ip` and `user_agent` are empty strings when the request did not
/// carry them; a missing value never prevents a record from being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub recorded_at: DateTime<Utc>,
    pub client_ip: String,
    pub user_agent: String,
}

impl VisitRecord {
    /// Build a record stamped with the current UTC time.
    pub fn new(client_ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self::at(Utc::now(), client_ip, user_agent)
    }

    /// Build a record for a specific instant.
    pub fn at(
        recorded_at: DateTime<Utc>,
        client_ip: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            recorded_at,
            client_ip: client_ip.into(),
            user_agent: user_agent.into(),
        }
    }

    /// ISO-8601 UTC timestamp with microseconds, e.g. `2026-10-18T09:15:02.123456Z`.
    pub fn timestamp(&self) -> String {
        self.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Spreadsheet cells in column order: timestamp, IP, user-agent.
    pub fn to_row(&self) -> [String; 3] {
        [
            self.timestamp(),
            self.client_ip.clone(),
            self.user_agent.clone(),
        ]
    }
}
