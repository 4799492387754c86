use bookmarker_engine::{shell_quote, view_intent_command, CommandOutput};

#[test]
fn shell_quote_wraps_ampersands_and_escapes_single_quotes() {
    assert_eq!(
        shell_quote("https://a.example.com/?x=1&y=2"),
        "'https://a.example.com/?x=1&y=2'"
    );
    assert_eq!(shell_quote("it's"), r"'it'\''s'");
}

#[test]
fn view_intent_prefers_package_when_given() {
    assert_eq!(
        view_intent_command("https://a.example.com", Some("com.android.chrome")),
        "am start -a android.intent.action.VIEW -d 'https://a.example.com' -f 0x14000000 -p 'com.android.chrome'"
    );
    assert_eq!(
        view_intent_command("https://a.example.com", None),
        "am start -a android.intent.action.VIEW -d 'https://a.example.com' -f 0x14000000"
    );
}

#[test]
fn error_marker_is_detected_in_either_stream() {
    let out = CommandOutput {
        stdout: "Starting: Intent { }\r\nError: Activity not started, unable to resolve Intent"
            .to_string(),
        stderr: String::new(),
    };
    assert!(out.reports_error());

    let err = CommandOutput {
        stdout: String::new(),
        stderr: "Error: no device".to_string(),
    };
    assert!(err.reports_error());
    assert!(!CommandOutput::default().reports_error());
}
