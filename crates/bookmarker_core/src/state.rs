use crate::view_model::{AppViewModel, RecordRowView};
use crate::{LinkRecord, RecordStore};

pub const DEFAULT_FOLDER_NAME: &str = "Mobile Bookmarks";

/// What the controller is busy with. Only `Idle` accepts new commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Scanning,
    Exporting,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunProgress {
    pub done: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A one-off message for the user (the toast/dialog of a GUI front end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    phase: Phase,
    records: RecordStore,
    folder_name: String,
    progress: Option<RunProgress>,
    status: String,
    notice: Option<Notice>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            records: RecordStore::new(),
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
            progress: None,
            status: "Ready".to_string(),
            notice: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder name used for the bookmark-file export.
    pub fn with_folder_name(mut self, folder_name: impl Into<String>) -> Self {
        self.folder_name = folder_name.into();
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    pub fn view(&self) -> AppViewModel {
        let idle = self.phase == Phase::Idle;
        let has_records = !self.records.is_empty();
        AppViewModel {
            phase: self.phase,
            rows: self.records.iter().map(row_view).collect(),
            record_count: self.records.len(),
            bookmarked_count: self.records.bookmarked_count(),
            scan_enabled: idle,
            export_enabled: idle && has_records,
            start_enabled: idle && has_records,
            cancel_enabled: self.phase == Phase::Running,
            progress: self.progress,
            status_text: self.status.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Takes the pending notice so it is shown once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.mark_dirty();
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn replace_records(&mut self, records: Vec<LinkRecord>) -> usize {
        self.progress = None;
        self.mark_dirty();
        self.records.replace_all(records)
    }

    pub(crate) fn snapshot_records(&self) -> Vec<LinkRecord> {
        self.records.snapshot()
    }

    pub(crate) fn begin_progress(&mut self, total: usize) {
        self.progress = Some(RunProgress { done: 0, total });
        self.mark_dirty();
    }

    pub(crate) fn advance_progress(&mut self) {
        if let Some(progress) = self.progress.as_mut() {
            progress.done = (progress.done + 1).min(progress.total);
        }
        self.mark_dirty();
    }

    pub(crate) fn progress(&self) -> Option<RunProgress> {
        self.progress
    }

    pub(crate) fn mark_record_bookmarked(&mut self, id: &str) -> bool {
        let changed = self.records.mark_bookmarked(id);
        if changed {
            self.mark_dirty();
        }
        changed
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn row_view(record: &LinkRecord) -> RecordRowView {
    RecordRowView {
        id: record.id.clone(),
        title: record.title.clone(),
        domain: record.domain(),
        url: record.url.clone(),
        bookmarked: record.is_bookmarked(),
    }
}
