mod support;

use std::sync::Arc;

use bookmarker_engine::{
    parse_dumpsys_shortcuts, HostShortcut, QueryFlags, ShortcutHost, ShortcutSource,
    SnapshotShortcutHost, DEFAULT_BROWSER_FILTER,
};
use pretty_assertions::assert_eq;
use support::{chrome_shortcut, init_logging, FixedHost};

const DUMPSYS: &str = r#"
USER 0:
  Package: com.android.chrome  UID: 10139
    Shortcuts:
      ShortcutInfo {id=webapp-1, flags=0x1022 [Pin Man Ic], packageName=com.android.chrome, activity=ComponentInfo{com.android.chrome/com.google.android.apps.chrome.Main}, shortLabel=News, Daily, resId=0, longLabel=Daily News Site, resId=0, disabledMessage=null, intents=[Intent { act=android.intent.action.VIEW dat=https://news.example.com/today?x=1 flg=0x10000000 (has extras) }/], extras=null}
      ShortcutInfo {id=dyn-2, flags=0x1 [Dyn], packageName=com.android.chrome, shortLabel=Recent, resId=0, longLabel=null, resId=0, intents=[Intent { act=android.intent.action.VIEW dat=https://recent.example.com/ }/]}
      ShortcutInfo {id=redacted-3, flags=0x2 [Pin], packageName=com.chrome.beta, shortLabel=null, resId=0, longLabel=Beta Page, resId=0, intents=[Intent { act=android.intent.action.VIEW dat=https://beta.example.com/... (has extras) }/], extras=PersistableBundle[{url=https://beta.example.com/full/path}]}
  Package: com.example.mail  UID: 10200
    Shortcuts:
      ShortcutInfo {id=compose, flags=0x2 [Pin], packageName=com.example.mail, shortLabel=Compose, resId=0, longLabel=null, resId=0, intents=[Intent { act=android.intent.action.SEND }/]}
"#;

fn fixed_clock() -> bookmarker_engine::Clock {
    Arc::new(|| 1_700_000_000_000u64)
}

#[test]
fn dumpsys_parser_reads_fields_and_honours_flags() {
    init_logging();
    let all = parse_dumpsys_shortcuts(DUMPSYS, QueryFlags::default());

    assert_eq!(all.len(), 4);
    assert_eq!(
        all[0],
        HostShortcut {
            id: "webapp-1".to_string(),
            short_label: Some("News, Daily".to_string()),
            long_label: Some("Daily News Site".to_string()),
            intent_data: Some("https://news.example.com/today?x=1".to_string()),
            url_extra: None,
            owner_package: "com.android.chrome".to_string(),
        }
    );
    assert_eq!(all[1].long_label, None);
    assert_eq!(all[2].short_label, None);
    assert_eq!(all[2].intent_data, None);
    assert_eq!(
        all[2].url_extra.as_deref(),
        Some("https://beta.example.com/full/path")
    );

    let pinned: Vec<_> = parse_dumpsys_shortcuts(DUMPSYS, QueryFlags::pinned_only())
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(pinned, vec!["webapp-1", "redacted-3", "compose"]);
}

#[test]
fn dumpsys_parser_ignores_unrelated_output() {
    assert!(parse_dumpsys_shortcuts("Can't find service: shortcut\n", QueryFlags::default()).is_empty());
    assert!(parse_dumpsys_shortcuts("", QueryFlags::default()).is_empty());
}

#[tokio::test]
async fn source_keeps_browser_links_only() {
    init_logging();
    let shortcuts = parse_dumpsys_shortcuts(DUMPSYS, QueryFlags::default());
    let source = ShortcutSource::new(FixedHost::new(shortcuts), DEFAULT_BROWSER_FILTER)
        .with_clock(fixed_clock());

    let records = source.query().await;

    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.id.as_str(), r.title.as_str(), r.url.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("webapp-1", "News, Daily", "https://news.example.com/today?x=1"),
            ("dyn-2", "Recent", "https://recent.example.com/"),
            ("redacted-3", "Beta Page", "https://beta.example.com/full/path"),
        ]
    );
    assert!(records.iter().all(|r| !r.is_bookmarked()));
    assert!(records.iter().all(|r| r.discovered_at_ms == 1_700_000_000_000));
}

#[tokio::test]
async fn source_drops_non_web_urls_and_duplicate_ids() {
    init_logging();
    let host = FixedHost::new(vec![
        chrome_shortcut("a", Some("A"), Some("https://a.example.com")),
        chrome_shortcut("b", Some("B"), Some("content://settings")),
        chrome_shortcut("c", Some("C"), None),
        chrome_shortcut("a", Some("A again"), Some("https://a2.example.com")),
        chrome_shortcut("d", None, Some("http://d.example.com")),
    ]);
    let source = ShortcutSource::new(host, "CHROME").with_clock(fixed_clock());

    let records = source.query().await;

    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d"]);
    assert_eq!(records[0].url, "https://a.example.com");
    assert_eq!(records[1].title, "Untitled");
}

#[tokio::test]
async fn host_failure_is_treated_as_no_shortcuts() {
    init_logging();
    let source = ShortcutSource::new(FixedHost::failing(), DEFAULT_BROWSER_FILTER);

    assert!(source.query().await.is_empty());
}

#[tokio::test]
async fn source_passes_query_flags_to_host() {
    let host = FixedHost::new(Vec::new());
    let source = ShortcutSource::new(host.clone(), DEFAULT_BROWSER_FILTER)
        .with_flags(QueryFlags::pinned_only());

    source.query().await;

    assert_eq!(*host.seen_flags.lock().unwrap(), Some(QueryFlags::pinned_only()));
}

#[tokio::test]
async fn snapshot_host_reads_json_file() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("shortcuts.json");
    std::fs::write(
        &path,
        r#"[
          {"id": "s1", "short_label": "Docs", "intent_data": "https://docs.example.com", "owner_package": "com.android.chrome"},
          {"id": "s2", "url_extra": "https://extra.example.com", "owner_package": "com.chrome.dev"}
        ]"#,
    )
    .unwrap();

    let host = SnapshotShortcutHost::new(&path);
    let shortcuts = host.query(QueryFlags::default()).await.unwrap();
    assert_eq!(shortcuts.len(), 2);
    assert_eq!(shortcuts[1].url_extra.as_deref(), Some("https://extra.example.com"));

    let records = ShortcutSource::new(Arc::new(host), DEFAULT_BROWSER_FILTER)
        .query()
        .await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].title, "Untitled");
}

#[tokio::test]
async fn missing_or_malformed_snapshot_is_swallowed_by_source() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let bad = temp.path().join("bad.json");
    std::fs::write(&bad, "{not json").unwrap();

    let missing = SnapshotShortcutHost::new(temp.path().join("missing.json"));
    assert!(missing.query(QueryFlags::default()).await.is_err());

    for path in [bad, temp.path().join("missing.json")] {
        let source = ShortcutSource::new(
            Arc::new(SnapshotShortcutHost::new(path)),
            DEFAULT_BROWSER_FILTER,
        );
        assert!(source.query().await.is_empty());
    }
}
