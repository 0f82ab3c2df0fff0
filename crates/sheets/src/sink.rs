//! [`VisitSink`] backed by the first worksheet of a Google spreadsheet.

use async_trait::async_trait;
use clicklog_core::error::SinkError;
use clicklog_core::sink::VisitSink;
use clicklog_core::visit::VisitRecord;

use crate::api::{SheetsClient, Worksheet};
use crate::error::SheetsError;

/// How to find the spreadsheet at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetTarget {
    /// Use this spreadsheet id directly.
    Id(String),
    /// Look the spreadsheet up by exact name through Drive.
    Name(String),
}

/// An opened spreadsheet ready to take rows.
///
/// Built once with [`SheetsSink::connect`]; the id and worksheet are
/// resolved up front so each append is a single API call.
pub struct SheetsSink {
    client: SheetsClient,
    spreadsheet_id: String,
    worksheet: Worksheet,
}

impl SheetsSink {
    /// Resolve the spreadsheet and its first worksheet.
    pub async fn connect(
        client: SheetsClient,
        target: SpreadsheetTarget,
    ) -> Result<Self, SheetsError> {
        let spreadsheet_id = match target {
            SpreadsheetTarget::Id(id) => id,
            SpreadsheetTarget::Name(name) => {
                let id = client.open_by_name(&name).await?;
                tracing::info!(%name, spreadsheet_id = %id, "Resolved spreadsheet by name");
                id
            }
        };

        let worksheet = client.first_worksheet(&spreadsheet_id).await?;
        tracing::info!(
            %spreadsheet_id,
            worksheet = %worksheet.title,
            service_account = %client.service_account(),
            "Opened spreadsheet for visit logging",
        );

        Ok(Self {
            client,
            spreadsheet_id,
            worksheet,
        })
    }
}

#[async_trait]
impl VisitSink for SheetsSink {
    async fn append(&self, record: &VisitRecord) -> Result<(), SinkError> {
        let updated_range = self
            .client
            .append_row(&self.spreadsheet_id, &self.worksheet.title, &record.to_row())
            .await?;

        tracing::debug!(
            updated_range = updated_range.as_deref().unwrap_or("unknown"),
            "Visit row appended",
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "google-sheets:{}/{}",
            self.spreadsheet_id, self.worksheet.title
        )
    }
}
