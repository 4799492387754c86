use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bookmarker_core::{is_http_url, LinkRecord};
use bookmarker_logging::{marker_debug, marker_info, marker_warn};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adb::{AdbError, AdbRunner};
use crate::dumpsys::parse_dumpsys_shortcuts;

/// Default owner-package filter; matches stable, beta, dev and canary builds.
pub const DEFAULT_BROWSER_FILTER: &str = "chrome";

/// Which shortcut kinds the host query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFlags {
    pub pinned: bool,
    pub dynamic: bool,
    pub manifest: bool,
}

impl Default for QueryFlags {
    fn default() -> Self {
        Self {
            pinned: true,
            dynamic: true,
            manifest: true,
        }
    }
}

impl QueryFlags {
    pub fn pinned_only() -> Self {
        Self {
            pinned: true,
            dynamic: false,
            manifest: false,
        }
    }

    /// Checks a dumpsys flag list such as `Pin Man Ic`.
    pub fn matches_kinds(&self, kinds: &str) -> bool {
        kinds.split_whitespace().any(|kind| match kind {
            "Pin" => self.pinned,
            "Dyn" => self.dynamic,
            "Man" => self.manifest,
            _ => false,
        })
    }
}

/// Raw shortcut as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostShortcut {
    pub id: String,
    #[serde(default)]
    pub short_label: Option<String>,
    #[serde(default)]
    pub long_label: Option<String>,
    /// Intent data URI.
    #[serde(default)]
    pub intent_data: Option<String>,
    /// `url` intent extra, used when the intent carries no data URI.
    #[serde(default)]
    pub url_extra: Option<String>,
    pub owner_package: String,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("shortcut service unavailable: {0}")]
    Unsupported(String),
    #[error(transparent)]
    Adb(#[from] AdbError),
    #[error("failed to read snapshot {path:?}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed snapshot {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait::async_trait]
pub trait ShortcutHost: Send + Sync {
    async fn query(&self, flags: QueryFlags) -> Result<Vec<HostShortcut>, HostError>;
}

/// Queries a connected device through `adb shell dumpsys shortcut`.
#[derive(Debug, Clone)]
pub struct AdbShortcutHost {
    adb: AdbRunner,
}

impl AdbShortcutHost {
    pub fn new(adb: AdbRunner) -> Self {
        Self { adb }
    }
}

#[async_trait::async_trait]
impl ShortcutHost for AdbShortcutHost {
    async fn query(&self, flags: QueryFlags) -> Result<Vec<HostShortcut>, HostError> {
        let output = self.adb.shell("dumpsys shortcut").await?;
        // Devices below Android 7.1 have no shortcut service.
        if output.stdout.contains("Can't find service") {
            return Err(HostError::Unsupported(output.stdout.trim().to_string()));
        }
        Ok(parse_dumpsys_shortcuts(&output.stdout, flags))
    }
}

/// Reads shortcuts from a JSON array of [`HostShortcut`] saved earlier.
#[derive(Debug, Clone)]
pub struct SnapshotShortcutHost {
    path: PathBuf,
}

impl SnapshotShortcutHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ShortcutHost for SnapshotShortcutHost {
    async fn query(&self, _flags: QueryFlags) -> Result<Vec<HostShortcut>, HostError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| HostError::Snapshot {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| HostError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

/// Milliseconds since the Unix epoch, injectable for tests.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0))
}

/// Turns host shortcuts into browser link records.
#[derive(Clone)]
pub struct ShortcutSource {
    host: Arc<dyn ShortcutHost>,
    browser_filter: String,
    flags: QueryFlags,
    clock: Clock,
}

impl ShortcutSource {
    pub fn new(host: Arc<dyn ShortcutHost>, browser_filter: impl Into<String>) -> Self {
        Self {
            host,
            browser_filter: browser_filter.into().to_lowercase(),
            flags: QueryFlags::default(),
            clock: system_clock(),
        }
    }

    pub fn with_flags(mut self, flags: QueryFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Never fails: a host error is logged and reported as zero shortcuts.
    pub async fn query(&self) -> Vec<LinkRecord> {
        let shortcuts = match self.host.query(self.flags).await {
            Ok(shortcuts) => shortcuts,
            Err(err) => {
                marker_warn!("Shortcut query failed, treating as no shortcuts: {}", err);
                return Vec::new();
            }
        };

        let total = shortcuts.len();
        let now = (self.clock)();
        let mut seen = HashSet::new();
        let records: Vec<LinkRecord> = shortcuts
            .into_iter()
            .filter_map(|shortcut| self.to_record(shortcut, now))
            .filter(|record| seen.insert(record.id.clone()))
            .collect();

        marker_info!(
            "Shortcut scan: {} of {} host shortcuts are browser links",
            records.len(),
            total
        );
        records
    }

    fn to_record(&self, shortcut: HostShortcut, now: u64) -> Option<LinkRecord> {
        if !shortcut
            .owner_package
            .to_lowercase()
            .contains(&self.browser_filter)
        {
            return None;
        }
        let url = shortcut
            .intent_data
            .or(shortcut.url_extra)
            .filter(|url| is_http_url(url));
        let Some(url) = url else {
            marker_debug!("Skipping shortcut {} without a web URL", shortcut.id);
            return None;
        };
        let title = shortcut
            .short_label
            .filter(|label| !label.trim().is_empty())
            .or(shortcut.long_label);
        Some(LinkRecord::new(shortcut.id, title.as_deref(), url, now))
    }
}
