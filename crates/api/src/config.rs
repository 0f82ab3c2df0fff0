use std::path::PathBuf;
use std::time::Duration;

use clicklog_sheets::SpreadsheetTarget;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Longest a single visit append may take inside `POST /log` (default: `20`).
    /// Capped by [`ServerConfig::append_deadline`].
    pub append_timeout_secs: u64,
    /// Take the client IP from `X-Forwarded-For` instead of the socket peer.
    /// Only enable behind a reverse proxy that sets the header.
    pub trust_forwarded_for: bool,
    /// Where visits are written.
    pub sheets: SheetsConfig,
}

/// Google Sheets destination settings.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Path to the service-account JSON key.
    pub credentials_file: PathBuf,
    /// Spreadsheet looked up by name when no id is given.
    pub spreadsheet_name: String,
    /// Spreadsheet id; skips the Drive name lookup when set.
    pub spreadsheet_id: Option<String>,
    /// Per-request timeout for Google API calls in seconds.
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `5000`                  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `APPEND_TIMEOUT_SECS`     | `20`                    |
    /// | `TRUST_FORWARDED_FOR`     | `false`                 |
    /// | `GOOGLE_CREDENTIALS_FILE` | `service-account.json`  |
    /// | `SPREADSHEET_NAME`        | `ClickLogs`             |
    /// | `SPREADSHEET_ID`          | unset                   |
    /// | `SHEETS_TIMEOUT_SECS`     | `10`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let append_timeout_secs: u64 = std::env::var("APPEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("APPEND_TIMEOUT_SECS must be a valid u64");

        let trust_forwarded_for = std::env::var("TRUST_FORWARDED_FOR")
            .map(|v| parse_flag(&v).expect("TRUST_FORWARDED_FOR must be true or false"))
            .unwrap_or(false);

        Self {
            host,
            port,
            request_timeout_secs,
            append_timeout_secs,
            trust_forwarded_for,
            sheets: SheetsConfig::from_env(),
        }
    }

    /// Time budget for one sink append in `POST /log`.
    ///
    /// Never more than four fifths of the request timeout, so a slow store
    /// ends as a logged sink failure and the visitor still gets a 200
    /// instead of the router's 408.
    pub fn append_deadline(&self) -> Duration {
        let ceiling = Duration::from_secs(self.request_timeout_secs) * 4 / 5;
        Duration::from_secs(self.append_timeout_secs).min(ceiling)
    }
}

impl SheetsConfig {
    pub fn from_env() -> Self {
        let credentials_file = std::env::var("GOOGLE_CREDENTIALS_FILE")
            .unwrap_or_else(|_| "service-account.json".into())
            .into();

        let spreadsheet_name =
            std::env::var("SPREADSHEET_NAME").unwrap_or_else(|_| "ClickLogs".into());

        let spreadsheet_id = std::env::var("SPREADSHEET_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let timeout_secs: u64 = std::env::var("SHEETS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHEETS_TIMEOUT_SECS must be a valid u64");

        Self {
            credentials_file,
            spreadsheet_name,
            spreadsheet_id,
            timeout_secs,
        }
    }

    /// An explicit id wins over the name lookup.
    pub fn target(&self) -> SpreadsheetTarget {
        match &self.spreadsheet_id {
            Some(id) => SpreadsheetTarget::Id(id.clone()),
            None => SpreadsheetTarget::Name(self.spreadsheet_name.clone()),
        }
    }
}

/// Parse a boolean env flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
