use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use bookmarker_core::{ExportFormat, LinkRecord};
use bookmarker_logging::{marker_error, marker_info};
use chrono::Local;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::adb::{AdbRunner, AdbSettings};
use crate::export::{export_records, ExportRequest};
use crate::opener::{AdbUrlOpener, DEFAULT_BROWSER_PACKAGE};
use crate::persist::{AtomicFileWriter, TextWriter};
use crate::runner::{
    BulkRunner, ChannelProgressSink, ProgressSink, RunError, TokioPacer, DEFAULT_PACING,
};
use crate::source::{
    AdbShortcutHost, ShortcutHost, ShortcutSource, SnapshotShortcutHost, DEFAULT_BROWSER_FILTER,
};
use crate::{EngineEvent, RunEvent, RunOutcome};

/// Where shortcuts come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Device,
    Snapshot(PathBuf),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub adb: AdbSettings,
    pub source: SourceKind,
    pub browser_package: String,
    pub browser_filter: String,
    pub pacing: Duration,
    pub export_dir: PathBuf,
    /// Cancel a run on Ctrl-C and report [`EngineEvent::Interrupted`].
    pub handle_interrupt: bool,
}

impl EngineConfig {
    pub fn default_with_export_dir(export_dir: PathBuf) -> Self {
        Self {
            adb: AdbSettings::default(),
            source: SourceKind::Device,
            browser_package: DEFAULT_BROWSER_PACKAGE.to_string(),
            browser_filter: DEFAULT_BROWSER_FILTER.to_string(),
            pacing: DEFAULT_PACING,
            export_dir,
            handle_interrupt: false,
        }
    }
}

/// Collaborators the engine drives; tests swap in fakes.
pub struct EngineParts {
    pub source: ShortcutSource,
    pub runner: Arc<BulkRunner>,
    pub writer: Arc<dyn TextWriter>,
    pub export_dir: PathBuf,
    pub handle_interrupt: bool,
}

impl EngineParts {
    pub fn from_config(config: &EngineConfig) -> Self {
        let adb = AdbRunner::new(config.adb.clone());
        let host: Arc<dyn ShortcutHost> = match &config.source {
            SourceKind::Device => Arc::new(AdbShortcutHost::new(adb.clone())),
            SourceKind::Snapshot(path) => Arc::new(SnapshotShortcutHost::new(path.clone())),
        };
        let opener = Arc::new(AdbUrlOpener::new(adb, config.browser_package.clone()));
        Self {
            source: ShortcutSource::new(host, config.browser_filter.clone()),
            runner: Arc::new(BulkRunner::new(opener, Arc::new(TokioPacer), config.pacing)),
            writer: Arc::new(AtomicFileWriter),
            export_dir: config.export_dir.clone(),
            handle_interrupt: config.handle_interrupt,
        }
    }
}

enum EngineCommand {
    Scan,
    Export {
        format: ExportFormat,
        folder_name: String,
        records: Vec<LinkRecord>,
    },
    StartRun { records: Vec<LinkRecord> },
    CancelRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("engine worker stopped")]
pub struct EngineStopped;

/// Background worker owning a tokio runtime. Dropping the handle cancels any
/// active run before the worker winds down.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(EngineParts::from_config(&config))
    }

    pub fn with_parts(parts: EngineParts) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let worker_shutdown = shutdown.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    marker_error!("Could not start the engine runtime: {}", err);
                    return;
                }
            };
            let worker = Worker {
                parts: Arc::new(parts),
                event_tx,
                shutdown: worker_shutdown,
                runs: Arc::new(Mutex::new(RunSlot::default())),
            };
            while let Ok(command) = cmd_rx.recv() {
                worker.dispatch(&runtime, command);
            }
            worker.shutdown.cancel();
        });

        Self {
            cmd_tx,
            event_rx,
            shutdown,
        }
    }

    pub fn scan(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Scan);
    }

    pub fn export(&self, format: ExportFormat, folder_name: impl Into<String>, records: Vec<LinkRecord>) {
        let _ = self.cmd_tx.send(EngineCommand::Export {
            format,
            folder_name: folder_name.into(),
            records,
        });
    }

    pub fn start_run(&self, records: Vec<LinkRecord>) {
        let _ = self.cmd_tx.send(EngineCommand::StartRun { records });
    }

    pub fn cancel_run(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelRun);
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[derive(Clone)]
struct Worker {
    parts: Arc<EngineParts>,
    event_tx: mpsc::Sender<EngineEvent>,
    shutdown: CancellationToken,
    runs: Arc<Mutex<RunSlot>>,
}

/// At most one bulk run at a time. Ids keep a finished run from releasing a
/// slot that a newer run has already claimed.
#[derive(Default)]
struct RunSlot {
    next_id: u64,
    active: Option<ActiveRun>,
}

struct ActiveRun {
    id: u64,
    token: CancellationToken,
}

/// Forwards runner events, freeing the run slot just before `Completed` goes
/// out.
struct RunSink<'a> {
    worker: &'a Worker,
    run_id: u64,
    inner: ChannelProgressSink,
}

impl ProgressSink for RunSink<'_> {
    fn emit(&self, event: RunEvent) {
        if matches!(event, RunEvent::Completed { .. }) {
            self.worker.release_run(self.run_id);
        }
        self.inner.emit(event);
    }
}

impl Worker {
    fn dispatch(&self, runtime: &tokio::runtime::Runtime, command: EngineCommand) {
        match command {
            EngineCommand::Scan => {
                let worker = self.clone();
                runtime.spawn(async move {
                    let records = worker.parts.source.query().await;
                    worker.send(EngineEvent::ScanCompleted(records));
                });
            }
            EngineCommand::Export {
                format,
                folder_name,
                records,
            } => {
                let worker = self.clone();
                runtime.spawn_blocking(move || {
                    let request = ExportRequest {
                        format,
                        folder_name: &folder_name,
                        records: &records,
                    };
                    let result = export_records(
                        worker.parts.writer.as_ref(),
                        &worker.parts.export_dir,
                        &request,
                        &Local::now(),
                    )
                    .map_err(|err| err.to_string());
                    worker.send(EngineEvent::ExportFinished { format, result });
                });
            }
            EngineCommand::StartRun { records } => {
                let Some((run_id, token)) = self.claim_run() else {
                    self.send(EngineEvent::RunRejected {
                        reason: RunError::AlreadyRunning.to_string(),
                    });
                    return;
                };
                let worker = self.clone();
                runtime.spawn(async move { worker.run(records, run_id, token).await });
            }
            EngineCommand::CancelRun => {
                if self.cancel_active_run() {
                    marker_info!("Cancelling the active run");
                }
            }
        }
    }

    async fn run(&self, records: Vec<LinkRecord>, run_id: u64, token: CancellationToken) {
        if self.parts.handle_interrupt {
            tokio::spawn(self.clone().watch_interrupts(token.clone()));
        }
        let sink = RunSink {
            worker: self,
            run_id,
            inner: ChannelProgressSink::new(self.event_tx.clone()),
        };
        let result = self.parts.runner.run(records, &sink, &token).await;
        // Also releases the interrupt watcher.
        token.cancel();
        self.release_run(run_id);

        match result {
            Ok(RunOutcome::Completed(_)) => {}
            Ok(RunOutcome::Cancelled(report)) => {
                // Only report the cancellation while someone is listening.
                if !self.shutdown.is_cancelled() {
                    self.send(EngineEvent::RunCancelled {
                        processed: report.processed,
                    });
                }
            }
            Err(err) => self.send(EngineEvent::RunRejected {
                reason: err.to_string(),
            }),
        }
    }

    /// Armed for the lifetime of one run only, so Ctrl-C keeps its default
    /// behaviour everywhere else.
    async fn watch_interrupts(self, run: CancellationToken) {
        tokio::select! {
            _ = run.cancelled() => {}
            signal = tokio::signal::ctrl_c() => {
                // Reported before cancelling so it arrives ahead of RunCancelled.
                if signal.is_ok() {
                    self.send(EngineEvent::Interrupted);
                    run.cancel();
                }
            }
        }
    }

    /// Reserves the run slot. It is freed before the run's final event is
    /// sent, so a start issued in reaction to that event is accepted.
    fn claim_run(&self) -> Option<(u64, CancellationToken)> {
        let mut slot = self.run_slot();
        if slot.active.is_some() {
            return None;
        }
        slot.next_id += 1;
        let id = slot.next_id;
        let token = self.shutdown.child_token();
        slot.active = Some(ActiveRun {
            id,
            token: token.clone(),
        });
        Some((id, token))
    }

    fn release_run(&self, run_id: u64) {
        let mut slot = self.run_slot();
        if slot.active.as_ref().is_some_and(|run| run.id == run_id) {
            slot.active = None;
        }
    }

    fn cancel_active_run(&self) -> bool {
        match self.run_slot().active.as_ref() {
            Some(run) => {
                run.token.cancel();
                true
            }
            None => false,
        }
    }

    fn run_slot(&self) -> MutexGuard<'_, RunSlot> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// Maps a runner event onto the one-line status a front end shows.
pub fn describe_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::ItemStarted {
            position,
            total,
            record,
        } => format!("Processing {position}/{total}: {}", record.title),
        RunEvent::ItemUpdated { record, .. } if record.is_bookmarked() => {
            format!("Opened {}", record.url)
        }
        RunEvent::ItemUpdated { record, .. } => format!("Failed to open {}", record.url),
        RunEvent::Completed { processed } => format!("Processed {processed} shortcuts"),
    }
}
