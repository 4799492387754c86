use crate::LinkRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScanShortcuts,
    ExportRecords {
        format: ExportFormat,
        folder_name: String,
        records: Vec<LinkRecord>,
    },
    StartBulkRun { records: Vec<LinkRecord> },
    CancelRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Netscape bookmark file, importable by every major browser.
    Html,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Html => "HTML",
            ExportFormat::Json => "JSON",
        }
    }
}
