use crate::{ExportFormat, LinkRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a fresh scan of the device shortcuts.
    ScanClicked,
    /// Scan finished; the records replace the current set.
    ScanCompleted(Vec<LinkRecord>),
    /// User asked to export the current set.
    ExportClicked(ExportFormat),
    /// Export finished with the written path or an error message.
    ExportFinished {
        format: ExportFormat,
        result: Result<String, String>,
    },
    /// User asked to bulk-open every record.
    StartClicked,
    /// User asked to stop the active run.
    CancelClicked,
    /// Runner is about to open the record at 1-based `position`.
    RunItemStarted {
        position: usize,
        total: usize,
        title: String,
    },
    /// Runner finished acting on one record.
    RunItemUpdated { id: String, bookmarked: bool },
    /// Runner visited every record.
    RunFinished { processed: usize },
    /// Runner stopped early after `processed` records.
    RunCancelled { processed: usize },
    /// Runner refused to start.
    RunRejected { reason: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
