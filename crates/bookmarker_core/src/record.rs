use url::Url;

/// Placeholder title for shortcuts that carry no label.
pub const UNTITLED: &str = "Untitled";

/// A web-page shortcut discovered on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub discovered_at_ms: u64,
    bookmarked: bool,
}

impl LinkRecord {
    pub fn new(
        id: impl Into<String>,
        title: Option<&str>,
        url: impl Into<String>,
        discovered_at_ms: u64,
    ) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();
        Self {
            id: id.into(),
            title,
            url: url.into(),
            discovered_at_ms,
            bookmarked: false,
        }
    }

    pub fn is_bookmarked(&self) -> bool {
        self.bookmarked
    }

    /// Flags the record as bookmarked. Returns whether the flag changed.
    pub fn mark_bookmarked(&mut self) -> bool {
        let changed = !self.bookmarked;
        self.bookmarked = true;
        changed
    }

    pub fn is_valid_url(&self) -> bool {
        is_http_url(&self.url)
    }

    pub fn discovered_at_secs(&self) -> u64 {
        self.discovered_at_ms / 1000
    }

    /// Host part of the URL, or the raw URL when it does not parse.
    pub fn domain(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(ToOwned::to_owned))
            .unwrap_or_else(|| self.url.clone())
    }
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Ordered set of records from the latest scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordStore {
    records: Vec<LinkRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole set. Records with a duplicate id or a non-http URL
    /// are dropped; the number of dropped records is returned.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = LinkRecord>) -> usize {
        self.records.clear();
        let mut dropped = 0;
        for record in records {
            if !record.is_valid_url() || self.position(&record.id).is_some() {
                dropped += 1;
                continue;
            }
            self.records.push(record);
        }
        dropped
    }

    pub fn mark_bookmarked(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => record.mark_bookmarked(),
            None => false,
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&LinkRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkRecord> {
        self.records.iter()
    }

    pub fn snapshot(&self) -> Vec<LinkRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn bookmarked_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_bookmarked()).count()
    }
}
