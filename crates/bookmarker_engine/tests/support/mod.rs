#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use bookmarker_core::LinkRecord;
use bookmarker_engine::{
    HostError, HostShortcut, OpenError, Pacer, ProgressSink, QueryFlags, RunEvent, ShortcutHost,
    UrlOpener,
};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bookmarker_logging::initialize_for_tests);
}

pub fn record(id: &str) -> LinkRecord {
    LinkRecord::new(
        id,
        Some(&format!("Title {id}")),
        format!("https://{id}.example.com/"),
        1_700_000_000_000,
    )
}

pub fn records(ids: &[&str]) -> Vec<LinkRecord> {
    ids.iter().map(|id| record(id)).collect()
}

/// Opener that succeeds unless the URL was marked as failing.
#[derive(Default)]
pub struct ScriptedOpener {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl ScriptedOpener {
    pub fn failing_on(urls: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UrlOpener for ScriptedOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            Err(OpenError::new(url, "no activity found"))
        } else {
            Ok(())
        }
    }
}

/// Opener that blocks every call until the test releases it.
#[derive(Default)]
pub struct GatedOpener {
    pub entered: Notify,
    pub release: Notify,
    calls: Mutex<Vec<String>>,
}

impl GatedOpener {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UrlOpener for GatedOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

/// Pacer that returns immediately and remembers each requested pause.
#[derive(Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

/// Sink that keeps every event and can cancel a token once a given item settles.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<RunEvent>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl CollectingSink {
    pub fn cancelling_after(index: usize, token: CancellationToken) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_after: Some((index, token)),
        }
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: RunEvent) {
        if let (RunEvent::ItemUpdated { index, .. }, Some((after, token))) =
            (&event, &self.cancel_after)
        {
            if index == after {
                token.cancel();
            }
        }
        self.events.lock().unwrap().push(event);
    }
}

/// Host returning a fixed list, or an error when `fail` is set.
pub struct FixedHost {
    pub shortcuts: Vec<HostShortcut>,
    pub fail: bool,
    pub seen_flags: Mutex<Option<QueryFlags>>,
}

impl FixedHost {
    pub fn new(shortcuts: Vec<HostShortcut>) -> Arc<Self> {
        Arc::new(Self {
            shortcuts,
            fail: false,
            seen_flags: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            shortcuts: Vec::new(),
            fail: true,
            seen_flags: Mutex::new(None),
        })
    }
}

#[async_trait::async_trait]
impl ShortcutHost for FixedHost {
    async fn query(&self, flags: QueryFlags) -> Result<Vec<HostShortcut>, HostError> {
        *self.seen_flags.lock().unwrap() = Some(flags);
        if self.fail {
            return Err(HostError::Unsupported("Can't find service: shortcut".to_string()));
        }
        Ok(self.shortcuts.clone())
    }
}

pub fn chrome_shortcut(id: &str, label: Option<&str>, data: Option<&str>) -> HostShortcut {
    HostShortcut {
        id: id.to_string(),
        short_label: label.map(ToOwned::to_owned),
        long_label: None,
        intent_data: data.map(ToOwned::to_owned),
        url_extra: None,
        owner_package: "com.android.chrome".to_string(),
    }
}
