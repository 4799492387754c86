use std::io;
use std::process::Stdio;
use std::time::Duration;

use bookmarker_logging::marker_debug;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdbSettings {
    pub program: String,
    /// Device serial passed as `-s`; `None` lets adb pick the only device.
    pub serial: Option<String>,
    pub command_timeout: Duration,
}

impl Default for AdbSettings {
    fn default() -> Self {
        Self {
            program: "adb".to_string(),
            serial: None,
            command_timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Error)]
pub enum AdbError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("adb command timed out after {0:?}")]
    Timeout(Duration),
    #[error("adb exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// `am` and friends report some failures on a zero exit status.
    pub fn reports_error(&self) -> bool {
        self.stdout.contains("Error:") || self.stderr.contains("Error:")
    }
}

/// Runs `adb shell` commands against one device.
#[derive(Debug, Clone)]
pub struct AdbRunner {
    settings: AdbSettings,
}

impl AdbRunner {
    pub fn new(settings: AdbSettings) -> Self {
        Self { settings }
    }

    /// Runs `command` through the device shell. The command is parsed by the
    /// device shell, so dynamic arguments must go through [`shell_quote`].
    pub async fn shell(&self, command: &str) -> Result<CommandOutput, AdbError> {
        let mut cmd = Command::new(&self.settings.program);
        if let Some(serial) = &self.settings.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd.arg("shell")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        marker_debug!("adb shell {}", command);
        let output = tokio::time::timeout(self.settings.command_timeout, cmd.output())
            .await
            .map_err(|_| AdbError::Timeout(self.settings.command_timeout))?
            .map_err(|source| AdbError::Spawn {
                program: self.settings.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(AdbError::Failed {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(CommandOutput { stdout, stderr })
    }
}

/// Single-quotes `value` for a POSIX shell.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
