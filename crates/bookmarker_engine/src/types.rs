use std::path::PathBuf;

use bookmarker_core::{ExportFormat, LinkRecord};

/// Progress reported by the bulk runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// About to open `record`; `position` is 1-based.
    ItemStarted {
        position: usize,
        total: usize,
        record: LinkRecord,
    },
    /// The open action for the record at `index` has settled.
    ItemUpdated { index: usize, record: LinkRecord },
    Completed { processed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub records: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunReport),
    Cancelled(RunReport),
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::Completed(report) | RunOutcome::Cancelled(report) => report,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled(_))
    }
}

/// Everything the background engine reports back to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ScanCompleted(Vec<LinkRecord>),
    ExportFinished {
        format: ExportFormat,
        result: Result<PathBuf, String>,
    },
    Run(RunEvent),
    RunCancelled { processed: usize },
    RunRejected { reason: String },
    /// The user pressed Ctrl-C.
    Interrupted,
}
