//! Parser for `dumpsys shortcut` output.
//!
//! Every shortcut is printed as one `ShortcutInfo {...}` line. Field order is
//! stable across releases but labels may contain commas, so labels are read up
//! to the next `, key=` pair.

use std::sync::OnceLock;

use regex::Regex;

use crate::{HostShortcut, QueryFlags};

struct Patterns {
    id: Regex,
    flags: Regex,
    package: Regex,
    short_label: Regex,
    long_label: Regex,
    data: Regex,
    url_extra: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        id: Regex::new(r"ShortcutInfo \{id=(.*?), flags=").expect("id pattern"),
        flags: Regex::new(r"flags=0x[0-9a-fA-F]+\s*\[([^\]]*)\]").expect("flags pattern"),
        package: Regex::new(r"packageName=([^,\s}]+)").expect("package pattern"),
        short_label: Regex::new(r"shortLabel=(.*?), \w+=").expect("short label pattern"),
        long_label: Regex::new(r"longLabel=(.*?), \w+=").expect("long label pattern"),
        data: Regex::new(r"\bdat=(\S+)").expect("data pattern"),
        url_extra: Regex::new(r"\burl=(https?://[^\s,}\]]+)").expect("url extra pattern"),
    })
}

/// Extracts the shortcuts matching `flags` from raw `dumpsys shortcut` text.
pub fn parse_dumpsys_shortcuts(output: &str, flags: QueryFlags) -> Vec<HostShortcut> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("ShortcutInfo {"))
        .filter_map(|line| parse_shortcut_line(line, flags))
        .collect()
}

fn parse_shortcut_line(line: &str, flags: QueryFlags) -> Option<HostShortcut> {
    let p = patterns();
    let id = capture(&p.id, line)?;
    let owner_package = capture(&p.package, line)?;

    if let Some(kinds) = capture(&p.flags, line) {
        if !flags.matches_kinds(&kinds) {
            return None;
        }
    }

    Some(HostShortcut {
        id,
        short_label: capture(&p.short_label, line).filter(|l| l != "null"),
        long_label: capture(&p.long_label, line).filter(|l| l != "null"),
        // Newer releases redact the path as `https://host/...`; that is not a usable URL.
        intent_data: capture(&p.data, line).filter(|d| !d.ends_with("...")),
        url_extra: capture(&p.url_extra, line),
        owner_package,
    })
}

fn capture(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
