//! REST client for the Google Drive and Sheets endpoints we need.
//!
//! Three calls: find a spreadsheet by name (Drive `files.list`), read its
//! worksheet list (Sheets `spreadsheets.get`), and append one row (Sheets
//! `spreadsheets.values.append`).

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::auth::TokenSource;
use crate::credentials::ServiceAccountKey;
use crate::error::SheetsError;

/// Base URL of the Sheets v4 API.
pub const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com/v4";

/// Base URL of the Drive v3 API.
pub const DEFAULT_DRIVE_URL: &str = "https://www.googleapis.com/drive/v3";

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Properties of one worksheet (tab) inside a spreadsheet.
///
/// Google omits zero-valued fields, so the first tab usually arrives
/// without `sheetId` or `index`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: Worksheet,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    #[serde(default)]
    updates: Option<UpdateSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSummary {
    #[serde(default)]
    updated_range: Option<String>,
}

/// Authenticated client for one service account.
pub struct SheetsClient {
    http: reqwest::Client,
    tokens: TokenSource,
    sheets_url: String,
    drive_url: String,
}

impl SheetsClient {
    /// Build a client whose requests each time out after `timeout`.
    pub fn new(key: ServiceAccountKey, timeout: Duration) -> Result<Self, SheetsError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let tokens = TokenSource::new(http.clone(), key)?;

        Ok(Self {
            http,
            tokens,
            sheets_url: DEFAULT_SHEETS_URL.to_string(),
            drive_url: DEFAULT_DRIVE_URL.to_string(),
        })
    }

    /// Point the client at different API hosts (emulators, proxies).
    pub fn with_endpoints(mut self, sheets_url: String, drive_url: String) -> Self {
        self.sheets_url = sheets_url;
        self.drive_url = drive_url;
        self
    }

    /// Email of the service account the client authenticates as.
    pub fn service_account(&self) -> &str {
        self.tokens.client_email()
    }

    /// Resolve a spreadsheet name to its id.
    ///
    /// Only spreadsheets shared with the service account are visible. When
    /// several share the name, Drive's first match wins.
    pub async fn open_by_name(&self, name: &str) -> Result<String, SheetsError> {
        let token = self.tokens.access_token().await?;
        let query = drive_name_query(name);

        let response = self
            .http
            .get(format!("{}/files", self.drive_url.trim_end_matches('/')))
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;

        let listing: FileList = Self::parse_response(response).await?;
        listing
            .files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    /// Return the first worksheet (lowest index) of a spreadsheet.
    pub async fn first_worksheet(&self, spreadsheet_id: &str) -> Result<Worksheet, SheetsError> {
        let token = self.tokens.access_token().await?;
        let url = self.spreadsheet_url(spreadsheet_id, &[])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&token)
            .query(&[("fields", "sheets.properties(sheetId,title,index)")])
            .send()
            .await?;

        let meta: SpreadsheetMeta = Self::parse_response(response).await?;
        meta.sheets
            .into_iter()
            .map(|s| s.properties)
            .min_by_key(|w| w.index)
            .ok_or_else(|| SheetsError::NoWorksheets(spreadsheet_id.to_string()))
    }

    /// Append one row after the last row of the worksheet's data.
    ///
    /// Values are stored as-is (`RAW`), never parsed as formulas. Returns
    /// the A1 range Google reports as written, when it reports one.
    pub async fn append_row(
        &self,
        spreadsheet_id: &str,
        sheet_title: &str,
        cells: &[String],
    ) -> Result<Option<String>, SheetsError> {
        let token = self.tokens.access_token().await?;
        let range = a1_sheet_range(sheet_title);
        let url = self.spreadsheet_url(spreadsheet_id, &["values", &format!("{range}:append")])?;
        let body = serde_json::json!({ "values": [cells] });

        let response = self
            .http
            .post(url)
            .bearer_auth(&token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;

        let appended: AppendResponse = Self::parse_response(response).await?;
        Ok(appended.updates.and_then(|u| u.updated_range))
    }

    // ---- private helpers ----

    /// `{sheets_url}/spreadsheets/{id}/{extra...}` with every segment
    /// percent-encoded.
    fn spreadsheet_url(&self, spreadsheet_id: &str, extra: &[&str]) -> Result<Url, SheetsError> {
        let base = format!("{}/spreadsheets", self.sheets_url.trim_end_matches('/'));
        let mut url =
            Url::parse(&base).map_err(|e| SheetsError::InvalidEndpoint(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidEndpoint(base.clone()))?
            .push(spreadsheet_id)
            .extend(extra);
        Ok(url)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`SheetsError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SheetsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SheetsError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

/// Drive search expression matching a non-trashed spreadsheet by exact name.
pub fn drive_name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{escaped}' and mimeType = '{SPREADSHEET_MIME_TYPE}' and trashed = false"
    )
}

/// A1 reference covering a whole worksheet: the quoted title.
///
/// Quotes inside the title are doubled, per A1 notation.
pub fn a1_sheet_range(sheet_title: &str) -> String {
    format!("'{}'", sheet_title.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_rsa_key.pem");

    fn test_client() -> SheetsClient {
        let key = ServiceAccountKey {
            client_email: "clicklog@phinex.iam.gserviceaccount.com".into(),
            private_key: TEST_PRIVATE_KEY.into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
            private_key_id: None,
        };
        SheetsClient::new(key, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn plain_sheet_title_is_quoted() {
        assert_eq!(a1_sheet_range("Sheet1"), "'Sheet1'");
    }

    #[test]
    fn embedded_quote_is_doubled() {
        assert_eq!(a1_sheet_range("Bob's visits"), "'Bob''s visits'");
    }

    #[test]
    fn drive_query_matches_spreadsheets_by_name() {
        assert_eq!(
            drive_name_query("ClickLogs"),
            "name = 'ClickLogs' and mimeType = 'application/vnd.google-apps.spreadsheet' \
             and trashed = false"
        );
    }

    #[test]
    fn drive_query_escapes_quotes_and_backslashes() {
        let query = drive_name_query(r"Q3 'phish' \ logs");
        assert!(query.starts_with(r"name = 'Q3 \'phish\' \\ logs'"));
    }

    #[test]
    fn append_url_encodes_sheet_title() {
        let client = test_client();
        let range = a1_sheet_range("Click Log");
        let url = client
            .spreadsheet_url("abc123", &["values", &format!("{range}:append")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/'Click%20Log':append"
        );
    }

    #[test]
    fn custom_endpoints_are_used() {
        let client = test_client().with_endpoints(
            "http://localhost:9090/v4/".into(),
            "http://localhost:9090/drive/v3".into(),
        );
        let url = client.spreadsheet_url("abc123", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9090/v4/spreadsheets/abc123");
    }

    #[test]
    fn service_account_email_is_exposed() {
        assert_eq!(
            test_client().service_account(),
            "clicklog@phinex.iam.gserviceaccount.com"
        );
    }

    #[test]
    fn worksheet_index_defaults_to_zero() {
        let meta: SpreadsheetMeta = serde_json::from_str(
            r#"{"sheets": [
                {"properties": {"sheetId": 77, "title": "Archive", "index": 1}},
                {"properties": {"title": "Sheet1"}}
            ]}"#,
        )
        .unwrap();
        let first = meta
            .sheets
            .into_iter()
            .map(|s| s.properties)
            .min_by_key(|w| w.index)
            .unwrap();
        assert_eq!(first.title, "Sheet1");
        assert_eq!(first.sheet_id, 0);
    }

    #[test]
    fn append_response_reports_updated_range() {
        let parsed: AppendResponse = serde_json::from_str(
            r#"{"spreadsheetId": "abc", "updates": {"updatedRange": "Sheet1!A5:C5", "updatedRows": 1}}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.updates.and_then(|u| u.updated_range).as_deref(),
            Some("Sheet1!A5:C5")
        );
    }
}
