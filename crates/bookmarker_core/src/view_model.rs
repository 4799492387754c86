use crate::{Notice, Phase, RunProgress};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub rows: Vec<RecordRowView>,
    pub record_count: usize,
    pub bookmarked_count: usize,
    pub scan_enabled: bool,
    pub export_enabled: bool,
    pub start_enabled: bool,
    pub cancel_enabled: bool,
    pub progress: Option<RunProgress>,
    pub status_text: String,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub id: String,
    pub title: String,
    pub domain: String,
    pub url: String,
    pub bookmarked: bool,
}
