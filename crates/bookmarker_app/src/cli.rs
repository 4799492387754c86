use std::path::PathBuf;

use bookmarker_core::ExportFormat;
use bookmarker_engine::SourceKind;
use bookmarker_logging::DEFAULT_LOG_FILE;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::platform::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "shortcut-bookmarker")]
#[command(author, version, long_about = None)]
#[command(
    about = "Turn Chrome home-screen shortcuts on an Android device into bookmarks",
    long_about = "Scans a device over adb for Chrome web-page shortcuts, opens each one in \
                  Chrome so it lands in history and bookmarks, and exports the list as a \
                  bookmark HTML or JSON file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the adb executable
    #[arg(long, global = true, value_name = "PATH")]
    pub adb: Option<String>,

    /// Device serial passed to `adb -s`
    #[arg(long, global = true)]
    pub serial: Option<String>,

    /// Read shortcuts from a JSON snapshot instead of a device
    #[arg(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Package that should open the links
    #[arg(long, global = true, value_name = "PACKAGE")]
    pub browser_package: Option<String>,

    /// Config file (defaults to the per-user config.ron)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to a file (./bookmarker.log when no path is given)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_LOG_FILE
    )]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the Chrome shortcuts found on the device
    Scan,

    /// Scan, then write the shortcuts to a bookmark file
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: FormatArg,

        #[command(flatten)]
        target: ExportTarget,
    },

    /// Scan, then open every shortcut in the browser one at a time
    Open {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Delay between two links in milliseconds
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,

        /// Export the list once the run completes
        #[arg(long, value_enum, value_name = "FORMAT")]
        export_after: Option<FormatArg>,

        #[command(flatten)]
        target: ExportTarget,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExportTarget {
    /// Directory for export files (defaults to Downloads)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Folder name inside the bookmark file
    #[arg(long, value_name = "NAME")]
    pub folder: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    Html,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            adb_path: self.adb.clone(),
            device_serial: self.serial.clone(),
            browser_package: self.browser_package.clone(),
            ..ConfigOverrides::default()
        };
        match &self.command {
            Commands::Scan => {}
            Commands::Export { target, .. } => {
                overrides.export_dir = target.out.clone();
                overrides.folder_name = target.folder.clone();
            }
            Commands::Open {
                interval_ms,
                target,
                ..
            } => {
                overrides.pacing_ms = *interval_ms;
                overrides.export_dir = target.out.clone();
                overrides.folder_name = target.folder.clone();
            }
        }
        overrides
    }

    pub fn source(&self) -> SourceKind {
        match &self.snapshot {
            Some(path) => SourceKind::Snapshot(path.clone()),
            None => SourceKind::Device,
        }
    }

    /// Only bulk runs take over Ctrl-C; the other commands keep the default
    /// handler so an interrupted scan exits at once.
    pub fn handles_interrupt(&self) -> bool {
        matches!(self.command, Commands::Open { .. })
    }
}
