use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bookmarker_core::LinkRecord;
use bookmarker_logging::{marker_info, marker_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::opener::UrlOpener;
use crate::{EngineEvent, RunEvent, RunOutcome, RunReport};

/// Pause between two opens so the browser can come to the foreground.
pub const DEFAULT_PACING_MS: u64 = 3000;
pub const DEFAULT_PACING: Duration = Duration::from_millis(DEFAULT_PACING_MS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("no shortcuts to open, scan first")]
    Empty,
    #[error("a bulk run is already active")]
    AlreadyRunning,
}

/// Fixed-delay suspension point between two items.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait::async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: RunEvent) {
        let _ = self.tx.send(EngineEvent::Run(event));
    }
}

/// Opens every record in order, one at a time, pausing between items.
pub struct BulkRunner {
    opener: Arc<dyn UrlOpener>,
    pacer: Arc<dyn Pacer>,
    interval: Duration,
    status: Mutex<RunStatus>,
}

impl BulkRunner {
    pub fn new(opener: Arc<dyn UrlOpener>, pacer: Arc<dyn Pacer>, interval: Duration) -> Self {
        Self {
            opener,
            pacer,
            interval,
            status: Mutex::new(RunStatus::Idle),
        }
    }

    pub fn status(&self) -> RunStatus {
        *lock(&self.status)
    }

    /// Visits `records` in order. Returns the records with their updated
    /// flags; a cancelled run stops at the next suspension point and emits
    /// nothing further.
    pub async fn run(
        &self,
        mut records: Vec<LinkRecord>,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, RunError> {
        if records.is_empty() {
            return Err(RunError::Empty);
        }
        let mut guard = self.begin()?;

        let total = records.len();
        let mut succeeded = 0;
        let mut failed = 0;
        marker_info!("Bulk run started: {} records, pacing {:?}", total, self.interval);

        for index in 0..total {
            if cancel.is_cancelled() {
                return Ok(cancelled(records, succeeded, failed));
            }
            sink.emit(RunEvent::ItemStarted {
                position: index + 1,
                total,
                record: records[index].clone(),
            });

            let url = records[index].url.clone();
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(cancelled(records, succeeded, failed)),
                result = self.opener.open(&url) => result,
            };
            match result {
                Ok(()) => {
                    records[index].mark_bookmarked();
                    succeeded += 1;
                }
                Err(err) => {
                    marker_warn!("Item {}/{} failed: {}", index + 1, total, err);
                    failed += 1;
                }
            }
            sink.emit(RunEvent::ItemUpdated {
                index,
                record: records[index].clone(),
            });

            if index + 1 < total {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(cancelled(records, succeeded, failed)),
                    _ = self.pacer.pause(self.interval) => {}
                }
            }
        }

        // Leave Running before anyone hears about the completion, so a start
        // issued in reaction to it is accepted.
        guard.complete();
        drop(guard);
        sink.emit(RunEvent::Completed { processed: total });
        marker_info!(
            "Bulk run completed: {} opened, {} failed",
            succeeded,
            failed
        );
        Ok(RunOutcome::Completed(RunReport {
            processed: total,
            succeeded,
            failed,
            records,
        }))
    }

    fn begin(&self) -> Result<RunningGuard<'_>, RunError> {
        let mut status = lock(&self.status);
        if *status == RunStatus::Running {
            return Err(RunError::AlreadyRunning);
        }
        *status = RunStatus::Running;
        Ok(RunningGuard {
            status: &self.status,
            completed: false,
        })
    }
}

fn cancelled(records: Vec<LinkRecord>, succeeded: usize, failed: usize) -> RunOutcome {
    marker_info!("Bulk run cancelled after {} records", succeeded + failed);
    RunOutcome::Cancelled(RunReport {
        processed: succeeded + failed,
        succeeded,
        failed,
        records,
    })
}

/// Leaves `Running` on every exit path, including a dropped future.
struct RunningGuard<'a> {
    status: &'a Mutex<RunStatus>,
    completed: bool,
}

impl RunningGuard<'_> {
    fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *lock(self.status) = if self.completed {
            RunStatus::Completed
        } else {
            RunStatus::Idle
        };
    }
}

fn lock(status: &Mutex<RunStatus>) -> MutexGuard<'_, RunStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}
