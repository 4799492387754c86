use crate::{AppState, Effect, Msg, Notice, Phase, RunProgress};

const SCAN_FIRST: &str = "Scan for shortcuts first";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ScanClicked => {
            if state.phase() != Phase::Idle {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Scanning);
            state.set_status("Scanning for shortcuts...");
            vec![Effect::ScanShortcuts]
        }
        Msg::ScanCompleted(records) => {
            // A late scan result must never replace records a run is mutating.
            if state.phase() != Phase::Scanning {
                return (state, Vec::new());
            }
            state.replace_records(records);
            state.set_phase(Phase::Idle);
            let found = state.records().len();
            if found == 0 {
                state.set_status("No shortcuts found");
                state.set_notice(Notice::warning(
                    "No Chrome shortcuts were found. Pin a page to the home screen from Chrome and scan again.",
                ));
            } else {
                state.set_status(format!("Found {found} shortcuts"));
            }
            Vec::new()
        }
        Msg::ExportClicked(format) => {
            if state.records().is_empty() {
                state.set_notice(Notice::warning(SCAN_FIRST));
                return (state, Vec::new());
            }
            if state.phase() != Phase::Idle {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Exporting);
            state.set_status(format!("Exporting {}...", format.label()));
            vec![Effect::ExportRecords {
                format,
                folder_name: state.folder_name().to_string(),
                records: state.snapshot_records(),
            }]
        }
        Msg::ExportFinished { format, result } => {
            if state.phase() != Phase::Exporting {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Idle);
            match result {
                Ok(path) => {
                    state.set_status(format!("{} export complete", format.label()));
                    state.set_notice(Notice::info(format!("Exported to {path}")));
                }
                Err(message) => {
                    state.set_status("Export failed");
                    state.set_notice(Notice::error(message));
                }
            }
            Vec::new()
        }
        Msg::StartClicked => match state.phase() {
            _ if state.records().is_empty() => {
                state.set_notice(Notice::warning(SCAN_FIRST));
                Vec::new()
            }
            Phase::Running => {
                state.set_notice(Notice::warning("A run is already in progress"));
                Vec::new()
            }
            Phase::Scanning | Phase::Exporting => Vec::new(),
            Phase::Idle => {
                let records = state.snapshot_records();
                state.set_phase(Phase::Running);
                state.begin_progress(records.len());
                state.set_status(format!("Starting to open {} shortcuts", records.len()));
                vec![Effect::StartBulkRun { records }]
            }
        },
        Msg::CancelClicked => {
            if state.phase() != Phase::Running {
                return (state, Vec::new());
            }
            state.set_status("Cancelling...");
            vec![Effect::CancelRun]
        }
        Msg::RunItemStarted {
            position,
            total,
            title,
        } => {
            if state.phase() == Phase::Running {
                state.set_status(format!("Processing {position}/{total}: {title}"));
            }
            Vec::new()
        }
        Msg::RunItemUpdated { id, bookmarked } => {
            if state.phase() != Phase::Running {
                return (state, Vec::new());
            }
            if bookmarked {
                state.mark_record_bookmarked(&id);
            }
            state.advance_progress();
            Vec::new()
        }
        Msg::RunFinished { processed } => {
            if state.phase() != Phase::Running {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Idle);
            state.set_status(format!("Processed {processed} shortcuts"));
            state.set_notice(Notice::info(
                "All shortcuts were opened in Chrome. Export the list to keep a bookmark file.",
            ));
            Vec::new()
        }
        Msg::RunCancelled { processed } => {
            if state.phase() != Phase::Running {
                return (state, Vec::new());
            }
            let total = state
                .progress()
                .map(|RunProgress { total, .. }| total)
                .unwrap_or(processed);
            state.set_phase(Phase::Idle);
            state.set_status(format!("Cancelled after {processed} of {total} shortcuts"));
            Vec::new()
        }
        Msg::RunRejected { reason } => {
            if state.phase() == Phase::Running {
                state.set_phase(Phase::Idle);
                state.set_status("Run not started");
            }
            state.set_notice(Notice::warning(reason));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
