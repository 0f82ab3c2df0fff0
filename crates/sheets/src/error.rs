use clicklog_core::error::SinkError;

/// Errors from the Google Sheets client layer.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// The service-account key could not be read or parsed.
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    /// Signing the assertion or exchanging it for a token failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Google returned a non-2xx status code.
    #[error("Sheets API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// No spreadsheet visible to the service account has this name.
    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    /// The spreadsheet exists but has no worksheets.
    #[error("Spreadsheet {0} has no worksheets")]
    NoWorksheets(String),

    /// A configured base URL could not be turned into a request URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

impl From<SheetsError> for SinkError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Credentials(msg) | SheetsError::Auth(msg) => SinkError::Auth(msg),
            SheetsError::Api {
                status: status @ (401 | 403),
                body,
            } => SinkError::Auth(format!("HTTP {status}: {body}")),
            SheetsError::Api { status, body } => SinkError::Rejected { status, body },
            SheetsError::Request(e) => SinkError::Transport(e.to_string()),
            SheetsError::InvalidEndpoint(msg) => SinkError::Transport(msg),
            other @ (SheetsError::SpreadsheetNotFound(_) | SheetsError::NoWorksheets(_)) => {
                SinkError::Rejected {
                    status: 404,
                    body: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn forbidden_maps_to_auth() {
        let err: SinkError = SheetsError::Api {
            status: 403,
            body: "The caller does not have permission".into(),
        }
        .into();
        assert_matches!(err, SinkError::Auth(msg) if msg.contains("403"));
    }

    #[test]
    fn quota_maps_to_rejected() {
        let err: SinkError = SheetsError::Api {
            status: 429,
            body: "Quota exceeded".into(),
        }
        .into();
        assert_matches!(err, SinkError::Rejected { status: 429, .. });
    }

    #[test]
    fn request_failure_maps_to_transport() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err: SinkError = SheetsError::Request(req_err).into();
        assert_matches!(err, SinkError::Transport(_));
    }

    #[test]
    fn missing_spreadsheet_maps_to_not_found() {
        let err: SinkError = SheetsError::SpreadsheetNotFound("ClickLogs".into()).into();
        assert_matches!(err, SinkError::Rejected { status: 404, body } if body.contains("ClickLogs"));
    }

    #[test]
    fn credentials_map_to_auth() {
        let err: SinkError = SheetsError::Credentials("missing private_key".into()).into();
        assert_matches!(err, SinkError::Auth(_));
    }
}
