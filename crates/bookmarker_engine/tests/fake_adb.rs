//! Runs the adb layer against small shell scripts standing in for `adb`.
#![cfg(unix)]

mod support;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bookmarker_engine::{
    AdbError, AdbRunner, AdbSettings, AdbShortcutHost, AdbUrlOpener, HostError, QueryFlags,
    ShortcutHost, UrlOpener, DEFAULT_BROWSER_PACKAGE,
};
use pretty_assertions::assert_eq;
use support::init_logging;
use tempfile::TempDir;

const URL: &str = "https://news.example.com/";

/// Writes an executable `adb` script that appends its arguments to
/// `calls.log` and then runs `body`.
fn fake_adb(temp: &TempDir, body: &str) -> PathBuf {
    let log = temp.path().join("calls.log");
    let script = temp.path().join("adb");
    fs::write(
        &script,
        format!("#!/bin/sh\necho \"$*\" >> '{}'\n{body}\n", log.display()),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn calls(temp: &TempDir) -> Vec<String> {
    let log = temp.path().join("calls.log");
    if !log.exists() {
        return Vec::new();
    }
    fs::read_to_string(log)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn runner(program: &Path, serial: Option<&str>, timeout: Duration) -> AdbRunner {
    AdbRunner::new(AdbSettings {
        program: program.display().to_string(),
        serial: serial.map(str::to_string),
        command_timeout: timeout,
    })
}

fn opener(program: &Path) -> AdbUrlOpener {
    AdbUrlOpener::new(
        runner(program, None, Duration::from_secs(5)),
        DEFAULT_BROWSER_PACKAGE,
    )
}

#[tokio::test]
async fn opener_falls_back_to_default_handler_when_browser_is_missing() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let adb = fake_adb(
        &temp,
        r#"case "$*" in
  *" -p "*) echo "Error: Activity not started, unable to resolve Intent" ;;
  *) echo "Starting: Intent { act=android.intent.action.VIEW }" ;;
esac"#,
    );

    opener(&adb).open(URL).await.unwrap();

    let calls = calls(&temp);
    assert_eq!(calls.len(), 2, "{calls:?}");
    assert!(calls[0].contains("-p 'com.android.chrome'"), "{calls:?}");
    assert!(!calls[1].contains(" -p "), "{calls:?}");
    assert!(calls[1].contains(&format!("-d '{URL}'")), "{calls:?}");
}

#[tokio::test]
async fn opener_uses_browser_package_when_it_works() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let adb = fake_adb(&temp, "echo 'Starting: Intent { }'");

    opener(&adb).open(URL).await.unwrap();

    let calls = calls(&temp);
    assert_eq!(calls.len(), 1, "{calls:?}");
    assert!(calls[0].starts_with("shell am start"), "{calls:?}");
}

#[tokio::test]
async fn opener_reports_error_when_both_attempts_fail() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let adb = fake_adb(&temp, "echo 'error: device offline' >&2\nexit 1");

    let err = opener(&adb).open(URL).await.unwrap_err();

    assert_eq!(err.url, URL);
    assert!(err.message.contains("device offline"), "{err}");
    assert_eq!(calls(&temp).len(), 2);
}

#[tokio::test]
async fn non_zero_exit_is_a_failed_command() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let adb = fake_adb(&temp, "echo 'error: no devices/emulators found' >&2\nexit 1");

    let err = runner(&adb, None, Duration::from_secs(5))
        .shell("dumpsys shortcut")
        .await
        .unwrap_err();

    match err {
        AdbError::Failed { code, stderr } => {
            assert_eq!(code, Some(1));
            assert_eq!(stderr, "error: no devices/emulators found");
        }
        other => panic!("expected a failed command, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_command_times_out() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let adb = fake_adb(&temp, "exec sleep 5");

    let err = runner(&adb, None, Duration::from_millis(200))
        .shell("dumpsys shortcut")
        .await
        .unwrap_err();

    assert!(
        matches!(err, AdbError::Timeout(timeout) if timeout == Duration::from_millis(200)),
        "{err:?}"
    );
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    init_logging();
    let temp = TempDir::new().unwrap();

    let err = runner(&temp.path().join("no-adb-here"), None, Duration::from_secs(1))
        .shell("dumpsys shortcut")
        .await
        .unwrap_err();

    assert!(matches!(err, AdbError::Spawn { .. }), "{err:?}");
}

#[tokio::test]
async fn serial_is_passed_before_shell() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let adb = fake_adb(&temp, "echo ok");

    let output = runner(&adb, Some("emulator-5554"), Duration::from_secs(5))
        .shell("dumpsys shortcut")
        .await
        .unwrap();

    assert_eq!(output.stdout, "ok\n");
    assert_eq!(calls(&temp), vec!["-s emulator-5554 shell dumpsys shortcut"]);
}

#[tokio::test]
async fn device_without_shortcut_service_is_unsupported() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let adb = fake_adb(&temp, "echo \"Can't find service: shortcut\"");
    let host = AdbShortcutHost::new(runner(&adb, None, Duration::from_secs(5)));

    let err = host.query(QueryFlags::default()).await.unwrap_err();

    match err {
        HostError::Unsupported(message) => assert_eq!(message, "Can't find service: shortcut"),
        other => panic!("expected unsupported, got {other:?}"),
    }
}
