use bookmarker_logging::marker_info;
use thiserror::Error;

use crate::adb::{shell_quote, AdbRunner, CommandOutput};

pub const DEFAULT_BROWSER_PACKAGE: &str = "com.android.chrome";

/// FLAG_ACTIVITY_NEW_TASK | FLAG_ACTIVITY_CLEAR_TOP
const LAUNCH_FLAGS: &str = "0x14000000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not open {url}: {message}")]
pub struct OpenError {
    pub url: String,
    pub message: String,
}

impl OpenError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// The external "open this URL" action.
#[async_trait::async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Fires a VIEW intent on the device, preferring one browser package and
/// falling back to whatever handles the URL by default.
#[derive(Debug, Clone)]
pub struct AdbUrlOpener {
    adb: AdbRunner,
    browser_package: String,
}

impl AdbUrlOpener {
    pub fn new(adb: AdbRunner, browser_package: impl Into<String>) -> Self {
        Self {
            adb,
            browser_package: browser_package.into(),
        }
    }

    async fn start_view(&self, url: &str, package: Option<&str>) -> Result<(), String> {
        let command = view_intent_command(url, package);
        match self.adb.shell(&command).await {
            Ok(output) if output.reports_error() => Err(first_error_line(&output)),
            Ok(_) => Ok(()),
            Err(err) => Err(err.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl UrlOpener for AdbUrlOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        match self.start_view(url, Some(&self.browser_package)).await {
            Ok(()) => Ok(()),
            Err(reason) => {
                marker_info!(
                    "{} unavailable ({}), using the default handler",
                    self.browser_package,
                    reason
                );
                self.start_view(url, None)
                    .await
                    .map_err(|message| OpenError::new(url, message))
            }
        }
    }
}

/// `am start` line for a VIEW intent.
pub fn view_intent_command(url: &str, package: Option<&str>) -> String {
    let mut command = format!(
        "am start -a android.intent.action.VIEW -d {} -f {}",
        shell_quote(url),
        LAUNCH_FLAGS
    );
    if let Some(package) = package {
        command.push_str(" -p ");
        command.push_str(&shell_quote(package));
    }
    command
}

fn first_error_line(output: &CommandOutput) -> String {
    output
        .stdout
        .lines()
        .chain(output.stderr.lines())
        .find(|line| line.contains("Error:"))
        .unwrap_or("activity not started")
        .trim()
        .to_string()
}
