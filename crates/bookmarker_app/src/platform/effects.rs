use std::time::Duration;

use bookmarker_core::{Effect, Msg};
use bookmarker_engine::{describe_run_event, EngineEvent, EngineHandle, EngineStopped, RunEvent};
use bookmarker_logging::{marker_debug, marker_info, marker_warn};

/// Forwards controller effects to the engine and turns engine events back
/// into controller messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScanShortcuts => {
                    marker_info!("ScanShortcuts");
                    self.engine.scan();
                }
                Effect::ExportRecords {
                    format,
                    folder_name,
                    records,
                } => {
                    marker_info!(
                        "ExportRecords format={} records={} folder={}",
                        format.label(),
                        records.len(),
                        folder_name
                    );
                    self.engine.export(format, folder_name, records);
                }
                Effect::StartBulkRun { records } => {
                    marker_info!("StartBulkRun records={}", records.len());
                    self.engine.start_run(records);
                }
                Effect::CancelRun => {
                    marker_info!("CancelRun");
                    self.engine.cancel_run();
                }
            }
        }
    }

    /// Next engine event, `Ok(None)` after `timeout` without one.
    pub fn next_event(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        self.engine.recv_timeout(timeout)
    }
}

/// `None` for events the controller does not model (Ctrl-C).
pub fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ScanCompleted(records) => Some(Msg::ScanCompleted(records)),
        EngineEvent::ExportFinished { format, result } => {
            if let Err(message) = &result {
                marker_warn!("{} export failed: {}", format.label(), message);
            }
            Some(Msg::ExportFinished {
                format,
                result: result.map(|path| path.display().to_string()),
            })
        }
        EngineEvent::Run(run_event) => {
            marker_debug!("{}", describe_run_event(&run_event));
            Some(map_run_event(run_event))
        }
        EngineEvent::RunCancelled { processed } => Some(Msg::RunCancelled { processed }),
        EngineEvent::RunRejected { reason } => Some(Msg::RunRejected { reason }),
        EngineEvent::Interrupted => None,
    }
}

fn map_run_event(event: RunEvent) -> Msg {
    match event {
        RunEvent::ItemStarted {
            position,
            total,
            record,
        } => Msg::RunItemStarted {
            position,
            total,
            title: record.title,
        },
        RunEvent::ItemUpdated { record, .. } => Msg::RunItemUpdated {
            bookmarked: record.is_bookmarked(),
            id: record.id,
        },
        RunEvent::Completed { processed } => Msg::RunFinished { processed },
    }
}
