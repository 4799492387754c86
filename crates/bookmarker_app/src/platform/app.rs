use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use bookmarker_core::{update, AppState, ExportFormat, Msg, Phase, Severity};
use bookmarker_engine::{EngineEvent, EngineHandle};
use bookmarker_logging::{marker_info, marker_warn};

use super::config::AppConfig;
use super::effects::{map_event, EffectRunner};
use super::{logging, render};
use crate::cli::{Cli, Commands};

/// How long the loop waits for an engine event before sending `Msg::Tick`.
const TICK_INTERVAL: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> Result<()> {
    logging::initialize(cli.verbose, cli.log_file.clone());

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply(cli.overrides());
    marker_info!(
        "Starting with adb={} serial={:?} package={} pacing_ms={}",
        config.adb_path,
        config.device_serial,
        config.browser_package,
        config.pacing_ms
    );

    let engine = EngineHandle::new(config.engine_config(cli.source(), cli.handles_interrupt()));
    let state = AppState::new().with_folder_name(config.folder_name.clone());
    let mut session = Session::new(engine, state, io::stdout());

    session.dispatch(Msg::ScanClicked)?;
    session.wait_until_idle()?;
    if session.interrupted() {
        return Ok(());
    }

    match cli.command {
        Commands::Scan => session.print_records()?,
        Commands::Export { format, .. } => session.export(format.into())?,
        Commands::Open {
            yes, export_after, ..
        } => {
            if session.state().records().is_empty() {
                return Ok(());
            }
            session.print_records()?;
            let prompt = format!(
                "Open {} shortcuts in {}, one every {} ms?",
                session.state().records().len(),
                config.browser_package,
                config.pacing_ms
            );
            if !yes && !confirm(&prompt, &mut io::stdin().lock(), &mut io::stdout())? {
                println!("Nothing opened");
                return Ok(());
            }
            session.run_all()?;
            if let Some(format) = export_after.filter(|_| !session.interrupted()) {
                session.export(ExportFormat::from(format))?;
            }
        }
    }
    Ok(())
}

/// Asks a yes/no question; anything but `y` or `yes` declines.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Drives the pure controller against the engine and writes what changes to
/// `out`.
pub struct Session<W: Write> {
    state: AppState,
    effects: EffectRunner,
    out: W,
    last_status: Option<String>,
    last_error: Option<String>,
    interrupted: bool,
}

impl<W: Write> Session<W> {
    pub fn new(engine: EngineHandle, state: AppState, out: W) -> Self {
        Self {
            state,
            effects: EffectRunner::new(engine),
            out,
            last_status: None,
            last_error: None,
            interrupted: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// True once Ctrl-C ended a wait.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        let notice = state.take_notice();
        self.state = state;

        self.effects.enqueue(effects);

        if was_dirty && self.last_status.as_deref() != Some(view.status_text.as_str()) {
            writeln!(self.out, "{}", render::status_line(&view))?;
            self.last_status = Some(view.status_text);
        }
        if let Some(notice) = notice {
            writeln!(self.out, "{}", render::notice_line(&notice))?;
            if notice.severity == Severity::Error {
                self.last_error = Some(notice.text);
            }
        }
        Ok(())
    }

    /// Feeds engine events into the controller until it is idle again.
    pub fn wait_until_idle(&mut self) -> Result<()> {
        while self.state.phase() != Phase::Idle {
            let event = self
                .effects
                .next_event(TICK_INTERVAL)
                .context("engine stopped before the operation finished")?;
            match event {
                Some(EngineEvent::Interrupted) => {
                    self.interrupted = true;
                    if self.state.phase() != Phase::Running {
                        break;
                    }
                    marker_warn!("Interrupted; cancelling the run");
                    self.dispatch(Msg::CancelClicked)?;
                }
                Some(event) => {
                    if let Some(msg) = map_event(event) {
                        self.dispatch(msg)?;
                    }
                }
                None => self.dispatch(Msg::Tick)?,
            }
        }
        Ok(())
    }

    /// Exports the scanned records. A failed write is an error so the
    /// process exits non-zero.
    pub fn export(&mut self, format: ExportFormat) -> Result<()> {
        self.last_error = None;
        self.dispatch(Msg::ExportClicked(format))?;
        self.wait_until_idle()?;
        if let Some(message) = self.last_error.take() {
            bail!("{} export failed: {message}", format.label());
        }
        Ok(())
    }

    pub fn run_all(&mut self) -> Result<()> {
        self.dispatch(Msg::StartClicked)?;
        self.wait_until_idle()?;
        writeln!(self.out, "{}", render::summary_line(&self.state.view()))?;
        Ok(())
    }

    pub fn print_records(&mut self) -> Result<()> {
        for line in render::record_lines(&self.state.view()) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}
