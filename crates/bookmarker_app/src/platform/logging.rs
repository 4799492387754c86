//! Logger setup for the command line front end.
//!
//! Without `--log-file` only warnings and errors reach the terminal so they do
//! not interleave with the status lines. `-v` raises the level, `-vv` adds
//! debug output.

use std::path::PathBuf;

use bookmarker_logging::LogDestination;
use log::LevelFilter;

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn destination_for(log_file: Option<PathBuf>) -> LogDestination {
    match log_file {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    }
}

pub fn initialize(verbosity: u8, log_file: Option<PathBuf>) {
    bookmarker_logging::initialize(destination_for(log_file), level_for(verbosity));
}
