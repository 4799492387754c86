//! Shortcut bookmarker engine: device access, bulk opening and export.
mod adb;
mod dumpsys;
mod engine;
mod export;
mod opener;
mod persist;
mod runner;
mod source;
mod types;

pub use adb::{shell_quote, AdbError, AdbRunner, AdbSettings, CommandOutput};
pub use dumpsys::parse_dumpsys_shortcuts;
pub use engine::{
    describe_run_event, EngineConfig, EngineHandle, EngineParts, EngineStopped, SourceKind,
};
pub use export::{
    bookmark_document, bookmark_document_at, escape_html, export_filename, export_records,
    json_document, ExportError, ExportRequest, ExportedLink, EXPORT_FILE_PREFIX,
};
pub use opener::{view_intent_command, AdbUrlOpener, OpenError, UrlOpener, DEFAULT_BROWSER_PACKAGE};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError, TextWriter};
pub use runner::{
    BulkRunner, ChannelProgressSink, Pacer, ProgressSink, RunError, RunStatus, TokioPacer,
    DEFAULT_PACING, DEFAULT_PACING_MS,
};
pub use source::{
    system_clock, AdbShortcutHost, Clock, HostError, HostShortcut, QueryFlags, ShortcutHost,
    ShortcutSource, SnapshotShortcutHost, DEFAULT_BROWSER_FILTER,
};
pub use types::{EngineEvent, RunEvent, RunOutcome, RunReport};
