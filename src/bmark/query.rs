//! Filtering and full-text search over enumerated records.
//!
//! Everything here is pure: records in, records out. Ordering is
//! newest-first by `created` (falling back to `modified`), with ties
//! broken by ID so output is deterministic.

use chrono::{DateTime, FixedOffset};
use std::collections::BTreeSet;
use url::Url;

use crate::model::Record;

/// Criteria for `list`: all present fields must match.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub host: Option<String>,
    pub tag: Option<String>,
    pub since: Option<DateTime<FixedOffset>>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.tag.is_none() && self.since.is_none()
    }

    fn matches(&self, record: &Record, folder_tags: bool) -> bool {
        if let Some(want) = &self.tag {
            let mut found = record.header.tags.iter().any(|t| t == want);
            if !found && folder_tags {
                found = record.folder_segments().iter().any(|s| s == want);
            }
            if !found {
                return false;
            }
        }
        if let Some(want) = &self.host {
            match record_host(record) {
                Some(host) => {
                    if !host.eq_ignore_ascii_case(strip_www(want)) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if let Some(since) = self.since {
            // a record with no parseable timestamp cannot clear the bound
            match record.stamp() {
                Some(stamp) => {
                    if stamp < since {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }
}

/// Apply a filter and sort the survivors newest-first.
pub fn apply(mut records: Vec<Record>, filter: &Filter, folder_tags: bool) -> Vec<Record> {
    records.retain(|r| filter.matches(r, folder_tags));
    sort_newest_first(&mut records);
    records
}

/// Case-insensitive substring search across title, url, tags, and body.
/// Every whitespace-separated term must match somewhere.
pub fn search(mut records: Vec<Record>, query: &str, folder_tags: bool) -> Vec<Record> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();
    if terms.is_empty() {
        sort_newest_first(&mut records);
        return records;
    }
    records.retain(|record| {
        let blob = search_blob(record, folder_tags);
        terms.iter().all(|term| blob.contains(term))
    });
    sort_newest_first(&mut records);
    records
}

/// Union of header tags and, when the policy is on, folder segments.
pub fn list_tags(records: &[Record], folder_tags: bool) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    for record in records {
        tags.extend(
            record
                .header
                .tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        );
        if folder_tags {
            tags.extend(record.folder_segments());
        }
    }
    tags
}

pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| {
        b.stamp()
            .cmp(&a.stamp())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

fn search_blob(record: &Record, folder_tags: bool) -> String {
    let mut parts = vec![
        record.header.title.clone().unwrap_or_default(),
        record.header.url.clone(),
        record.header.tags.join(" "),
        record.body.clone(),
    ];
    if folder_tags {
        parts.push(record.folder_segments().join(" "));
    }
    parts.join("\n").to_lowercase()
}

fn record_host(record: &Record) -> Option<String> {
    let url = Url::parse(&record.header.url).ok()?;
    url.host_str()
        .map(|h| strip_www(h).to_lowercase())
}

fn strip_www(host: &str) -> &str {
    let trimmed = host.trim();
    trimmed
        .strip_prefix("www.")
        .or_else(|| trimmed.strip_prefix("WWW."))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::Header;
    use crate::model::parse_stamp;
    use std::path::PathBuf;

    fn record(path: &str, url: &str, tags: &[&str], created: Option<&str>) -> Record {
        let mut header = Header::new(url);
        header.tags = tags.iter().map(|t| t.to_string()).collect();
        header.created = created.map(|c| c.to_string());
        Record::new(PathBuf::from(path), header, String::new())
    }

    #[test]
    fn host_filter_ignores_case_and_www() {
        let records = vec![
            record("a-1.bm", "https://www.Example.com/x", &[], None),
            record("b-2.bm", "https://other.test/x", &[], None),
        ];
        let filter = Filter {
            host: Some("example.com".into()),
            ..Filter::default()
        };
        let hits = apply(records.clone(), &filter, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, PathBuf::from("a-1.bm"));

        let filter = Filter {
            host: Some("www.other.test".into()),
            ..Filter::default()
        };
        let hits = apply(records, &filter, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, PathBuf::from("b-2.bm"));
    }

    #[test]
    fn since_bound_is_inclusive_at_midnight() {
        let records = vec![
            record("old-1.bm", "https://a.test", &[], Some("2024-12-31T23:59:59")),
            record("new-2.bm", "https://b.test", &[], Some("2025-01-01T00:00:00")),
        ];
        let filter = Filter {
            since: parse_stamp("2025-01-01"),
            ..Filter::default()
        };
        let hits = apply(records, &filter, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, PathBuf::from("new-2.bm"));
    }

    #[test]
    fn since_excludes_records_without_timestamps() {
        let records = vec![record("x-1.bm", "https://a.test", &[], None)];
        let filter = Filter {
            since: parse_stamp("2025-01-01"),
            ..Filter::default()
        };
        assert!(apply(records, &filter, true).is_empty());
    }

    #[test]
    fn tag_filter_sees_folder_segments_only_when_enabled() {
        let records = vec![record("dev/tool-1.bm", "https://a.test", &["cli"], None)];
        let filter = Filter {
            tag: Some("dev".into()),
            ..Filter::default()
        };
        assert_eq!(apply(records.clone(), &filter, true).len(), 1);
        assert!(apply(records.clone(), &filter, false).is_empty());

        let filter = Filter {
            tag: Some("cli".into()),
            ..Filter::default()
        };
        assert_eq!(apply(records, &filter, false).len(), 1);
    }

    #[test]
    fn search_requires_all_terms() {
        let mut hit = record("a-1.bm", "https://rust-lang.org", &["lang"], None);
        hit.header.title = Some("The Rust Book".into());
        hit.body = "ownership chapter\n".into();
        let miss = record("b-2.bm", "https://python.org", &[], None);

        let found = search(vec![hit.clone(), miss], "rust ownership", true);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, hit.path);

        assert!(search(vec![hit], "rust golang", true).is_empty());
    }

    #[test]
    fn results_are_newest_first_with_id_ties() {
        let records = vec![
            record("old-1.bm", "https://a.test", &[], Some("2024-01-01")),
            record("new-2.bm", "https://b.test", &[], Some("2025-01-01")),
            record("none-3.bm", "https://c.test", &[], None),
        ];
        let sorted = apply(records, &Filter::default(), true);
        assert_eq!(sorted[0].path, PathBuf::from("new-2.bm"));
        assert_eq!(sorted[1].path, PathBuf::from("old-1.bm"));
        // no timestamp sorts last
        assert_eq!(sorted[2].path, PathBuf::from("none-3.bm"));
    }

    #[test]
    fn list_tags_unions_header_and_folders() {
        let records = vec![
            record("dev/a-1.bm", "https://a.test", &["cli", "rust"], None),
            record("b-2.bm", "https://b.test", &["cli"], None),
        ];
        let with_folders = list_tags(&records, true);
        assert_eq!(
            with_folders.into_iter().collect::<Vec<_>>(),
            vec!["cli", "dev", "rust"]
        );
        let without = list_tags(&records, false);
        assert_eq!(without.into_iter().collect::<Vec<_>>(), vec!["cli", "rust"]);
    }
}
