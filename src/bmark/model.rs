use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::frontmatter::Header;
use crate::slug::derive_id;

/// One bookmark: its store-relative path plus the parsed file content.
///
/// The path is where the record lives, never what it is: identity comes
/// from the URL hash, so moving or renaming the file keeps the same ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Path relative to the store root, ending in `.bm`.
    pub path: PathBuf,
    pub header: Header,
    pub body: String,
}

impl Record {
    pub fn new(path: PathBuf, header: Header, body: String) -> Self {
        Self { path, header, body }
    }

    /// Stable short ID derived from the record's URL.
    pub fn id(&self) -> String {
        derive_id(&self.header.url)
    }

    /// Relative path without the `.bm` extension, with `/` separators,
    /// as shown in listings.
    pub fn display_path(&self) -> String {
        let stem = self.path.with_extension("");
        components_to_string(&stem)
    }

    /// Directory segments above the file, used as implicit tags when the
    /// `folder_tags` policy is on.
    pub fn folder_segments(&self) -> Vec<String> {
        let mut segments: Vec<String> = self
            .path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.pop();
        segments
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.header.created.as_deref().and_then(parse_stamp)
    }

    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.header.modified.as_deref().and_then(parse_stamp)
    }

    /// Timestamp used for sorting and `--since` filtering: `created`,
    /// falling back to `modified`.
    pub fn stamp(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at().or_else(|| self.modified_at())
    }

    pub fn summary(&self) -> Summary {
        Summary {
            id: self.id(),
            path: self.display_path(),
            title: self.header.title.clone().unwrap_or_default(),
            url: self.header.url.clone(),
            tags: self.header.tags.clone(),
            created: self.header.created.clone().unwrap_or_default(),
            modified: self.header.modified.clone().unwrap_or_default(),
        }
    }
}

/// The flat row emitted for `--json` / `--jsonl` output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub id: String,
    pub path: String,
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
    pub created: String,
    pub modified: String,
}

fn components_to_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Current time as RFC 3339 with the local offset, seconds precision.
pub fn iso_now() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse an ISO-ish timestamp. A bare `YYYY-MM-DD` means midnight UTC; a
/// full datetime without an offset is taken as UTC.
pub fn parse_stamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).fixed_offset());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

pub fn to_epoch(dt: DateTime<FixedOffset>) -> i64 {
    dt.timestamp()
}

/// Epoch seconds to an RFC 3339 string (UTC), used when importing
/// `ADD_DATE`/`LAST_MODIFIED` attributes.
pub fn from_epoch(secs: i64) -> Option<String> {
    let dt = Utc.timestamp_opt(secs, 0).single()?;
    Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, url: &str) -> Record {
        Record::new(PathBuf::from(path), Header::new(url), String::new())
    }

    #[test]
    fn display_path_drops_extension() {
        let r = record("dev/rust/tips-a1b2c3d4.bm", "https://e.test");
        assert_eq!(r.display_path(), "dev/rust/tips-a1b2c3d4");
    }

    #[test]
    fn folder_segments_exclude_filename() {
        let r = record("dev/rust/tips-a1b2c3d4.bm", "https://e.test");
        assert_eq!(r.folder_segments(), vec!["dev", "rust"]);
        let flat = record("tips-a1b2c3d4.bm", "https://e.test");
        assert!(flat.folder_segments().is_empty());
    }

    #[test]
    fn moving_a_record_keeps_its_id() {
        let a = record("old-a1b2.bm", "https://e.test/page");
        let b = record("dev/new-a1b2.bm", "https://e.test/page");
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn bare_date_parses_as_midnight_utc() {
        let dt = parse_stamp("2025-01-01").unwrap();
        assert_eq!(dt.timestamp(), 1_735_689_600);
    }

    #[test]
    fn full_timestamps_parse_with_offset() {
        let dt = parse_stamp("2024-12-31T23:59:59+00:00").unwrap();
        assert_eq!(dt.timestamp(), 1_735_689_599);
        assert!(parse_stamp("2024-12-31T23:59:59Z").is_some());
        assert!(parse_stamp("2024-12-31T23:59:59").is_some());
    }

    #[test]
    fn garbage_stamps_parse_to_none() {
        assert!(parse_stamp("").is_none());
        assert!(parse_stamp("yesterday").is_none());
    }

    #[test]
    fn stamp_prefers_created() {
        let mut r = record("x-1.bm", "https://e.test");
        r.header.modified = Some("2025-02-01".into());
        assert_eq!(r.stamp(), r.modified_at());
        r.header.created = Some("2025-01-01".into());
        assert_eq!(r.stamp(), r.created_at());
    }

    #[test]
    fn epoch_round_trip() {
        let stamp = from_epoch(1_735_689_600).unwrap();
        assert_eq!(parse_stamp(&stamp).unwrap().timestamp(), 1_735_689_600);
    }
}
