use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use bookmarker_core::{ExportFormat, LinkRecord};
use bookmarker_logging::marker_info;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{PersistError, TextWriter};

pub const EXPORT_FILE_PREFIX: &str = "chrome_bookmarks";

const BOOKMARK_HEADER: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>"#;

const BOOKMARK_FOOTER: &str = "</DL><p>";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export, scan for shortcuts first")]
    NoRecords,
    #[error("could not serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write export: {0}")]
    Persist(#[from] PersistError),
}

/// One entry of the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedLink {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Discovery time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl From<&LinkRecord> for ExportedLink {
    fn from(record: &LinkRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            url: record.url.clone(),
            timestamp: record.discovered_at_ms,
        }
    }
}

/// Netscape bookmark file with one folder holding every record.
pub fn bookmark_document(records: &[LinkRecord], folder_name: &str) -> String {
    bookmark_document_at(records, folder_name, Utc::now().timestamp())
}

/// Same as [`bookmark_document`] with the folder timestamps pinned to `now_secs`.
pub fn bookmark_document_at(records: &[LinkRecord], folder_name: &str, now_secs: i64) -> String {
    let mut out = String::with_capacity(BOOKMARK_HEADER.len() + records.len() * 128);
    out.push_str(BOOKMARK_HEADER);
    out.push('\n');

    let _ = writeln!(
        out,
        "    <DT><H3 ADD_DATE=\"{now_secs}\" LAST_MODIFIED=\"{now_secs}\">{}</H3>",
        escape_html(folder_name)
    );
    out.push_str("    <DL><p>\n");
    for record in records {
        let _ = writeln!(
            out,
            "        <DT><A HREF=\"{}\" ADD_DATE=\"{}\">{}</A>",
            escape_html(&record.url),
            record.discovered_at_secs(),
            escape_html(&record.title)
        );
    }
    out.push_str("    </DL><p>\n");

    out.push_str(BOOKMARK_FOOTER);
    out.push('\n');
    out
}

/// JSON array of `{id, title, url, timestamp}`, indented by two spaces.
pub fn json_document(records: &[LinkRecord]) -> Result<String, ExportError> {
    let links: Vec<ExportedLink> = records.iter().map(ExportedLink::from).collect();
    Ok(serde_json::to_string_pretty(&links)?)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `chrome_bookmarks_YYYYMMDD_HHMMSS.ext`
pub fn export_filename<Tz>(format: ExportFormat, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        "{EXPORT_FILE_PREFIX}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub format: ExportFormat,
    pub folder_name: &'a str,
    pub records: &'a [LinkRecord],
}

/// Renders the document for `request` and hands it to `writer`.
pub fn export_records<Tz>(
    writer: &dyn TextWriter,
    dir: &Path,
    request: &ExportRequest<'_>,
    now: &DateTime<Tz>,
) -> Result<PathBuf, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if request.records.is_empty() {
        return Err(ExportError::NoRecords);
    }
    let content = match request.format {
        ExportFormat::Html => {
            bookmark_document_at(request.records, request.folder_name, now.timestamp())
        }
        ExportFormat::Json => json_document(request.records)?,
    };
    let filename = export_filename(request.format, now);
    let path = writer.write_text(dir, &filename, &content)?;
    marker_info!(
        "Exported {} records as {} to {:?}",
        request.records.len(),
        request.format.label(),
        path
    );
    Ok(path)
}
