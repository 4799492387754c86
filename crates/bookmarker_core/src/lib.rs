//! Shortcut bookmarker core: link records and the pure controller state machine.
mod effect;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, ExportFormat};
pub use msg::Msg;
pub use record::{is_http_url, LinkRecord, RecordStore, UNTITLED};
pub use state::{AppState, Notice, Phase, RunProgress, Severity, DEFAULT_FOLDER_NAME};
pub use update::update;
pub use view_model::{AppViewModel, RecordRowView};
