use bookmarker_core::{LinkRecord, RecordStore, UNTITLED};

fn record(id: &str, url: &str) -> LinkRecord {
    LinkRecord::new(id, Some(id), url, 1_700_000_000_000)
}

#[test]
fn missing_or_blank_title_falls_back_to_placeholder() {
    let none = LinkRecord::new("a", None, "https://a.example.com", 0);
    let blank = LinkRecord::new("b", Some("   "), "https://b.example.com", 0);
    let named = LinkRecord::new("c", Some(" News "), "https://c.example.com", 0);

    assert_eq!(none.title, UNTITLED);
    assert_eq!(blank.title, UNTITLED);
    assert_eq!(named.title, "News");
}

#[test]
fn domain_uses_host_or_raw_url() {
    let ok = record("a", "https://news.example.com/path?q=1");
    let odd = record("b", "http://");

    assert_eq!(ok.domain(), "news.example.com");
    assert_eq!(odd.domain(), "http://");
}

#[test]
fn replace_all_drops_invalid_urls_and_duplicate_ids() {
    let mut store = RecordStore::new();
    let dropped = store.replace_all(vec![
        record("a", "https://a.example.com"),
        record("b", "ftp://b.example.com"),
        record("a", "https://other.example.com"),
        record("c", "http://c.example.com"),
    ]);

    assert_eq!(dropped, 2);
    let ids: Vec<_> = store.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(store.get(0).unwrap().url, "https://a.example.com");
}

#[test]
fn replace_all_replaces_instead_of_merging() {
    let mut store = RecordStore::new();
    store.replace_all(vec![record("a", "https://a.example.com")]);
    assert!(store.mark_bookmarked("a"));

    store.replace_all(vec![record("b", "https://b.example.com")]);

    assert_eq!(store.len(), 1);
    assert_eq!(store.position("a"), None);
    assert_eq!(store.bookmarked_count(), 0);
}

#[test]
fn bookmarked_flag_is_monotonic() {
    let mut store = RecordStore::new();
    store.replace_all(vec![record("a", "https://a.example.com")]);

    assert!(!store.get(0).unwrap().is_bookmarked());
    assert!(store.mark_bookmarked("a"));
    assert!(!store.mark_bookmarked("a"));
    assert!(store.get(0).unwrap().is_bookmarked());
    assert!(!store.mark_bookmarked("missing"));
}

#[test]
fn snapshot_is_detached_from_store() {
    let mut store = RecordStore::new();
    store.replace_all(vec![record("a", "https://a.example.com")]);

    let mut snapshot = store.snapshot();
    snapshot[0].mark_bookmarked();

    assert!(!store.get(0).unwrap().is_bookmarked());
}

#[test]
fn discovered_at_converts_to_seconds() {
    let r = LinkRecord::new("a", None, "https://a.example.com", 1_700_000_123_999);
    assert_eq!(r.discovered_at_secs(), 1_700_000_123);
}
