use std::collections::HashSet;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::from_epoch;
use crate::netscape;
use crate::slug::derive_id;
use crate::store::{Draft, RecordStore};

/// Import a Netscape bookmarks file. Folder hierarchy becomes path
/// segments. URLs already present are skipped unless `force`; bad entries
/// are reported and never abort the rest of the run.
pub fn run<S: RecordStore>(store: &mut S, html: &str, force: bool) -> Result<CmdResult> {
    let bookmarks = netscape::import(html);
    let mut known: HashSet<String> = store
        .list_all()?
        .records
        .iter()
        .map(|r| r.id())
        .collect();

    let mut result = CmdResult::default();
    let mut created = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for bookmark in bookmarks {
        let id = derive_id(&bookmark.url);
        if known.contains(&id) && !force {
            skipped += 1;
            continue;
        }
        let draft = Draft {
            url: bookmark.url.clone(),
            title: Some(bookmark.title.clone()).filter(|t| !t.is_empty()),
            tags: bookmark.tags.clone(),
            folder: if bookmark.folder.is_empty() {
                None
            } else {
                Some(bookmark.folder.join("/"))
            },
            created: bookmark.add_date.and_then(from_epoch),
            modified: bookmark.last_modified.and_then(from_epoch),
            ..Draft::default()
        };
        match store.create(draft, force) {
            Ok(record) => {
                known.insert(record.id());
                result.records.push(record);
                created += 1;
            }
            Err(err) => {
                failed += 1;
                result.add_message(CmdMessage::warning(format!(
                    "failed to import {}: {}",
                    bookmark.url, err
                )));
            }
        }
    }

    result.add_message(CmdMessage::success(format!(
        "imported {}, skipped {}, failed {}",
        created, skipped, failed
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    const SAMPLE: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
<DT><H3 ADD_DATE="1700000000">Dev</H3>
<DL><p>
    <DT><A HREF="https://a.test" ADD_DATE="1735689600" TAGS="tools">A</A>
</DL><p>
<DT><A HREF="https://b.test">B</A>
</DL><p>"#;

    #[test]
    fn folder_becomes_path_segment() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, SAMPLE, false).unwrap();
        assert_eq!(result.records.len(), 2);

        let a = result
            .records
            .iter()
            .find(|r| r.header.url == "https://a.test")
            .unwrap();
        assert_eq!(a.folder_segments(), vec!["dev"]);
        assert_eq!(a.header.tags, vec!["tools"]);
        assert_eq!(
            a.header.created.as_deref(),
            Some("2025-01-01T00:00:00Z")
        );
        // with folder_tags policy on, the folder name is an implicit tag
        let tags = crate::query::list_tags(&store.list_all().unwrap().records, true);
        assert!(tags.contains("dev"));
    }

    #[test]
    fn existing_urls_are_skipped_by_default() {
        let mut store = InMemoryStore::new();
        run(&mut store, SAMPLE, false).unwrap();
        let second = run(&mut store, SAMPLE, false).unwrap();
        assert!(second.records.is_empty());
        let summary = &second.messages.last().unwrap().content;
        assert!(summary.contains("imported 0, skipped 2"), "{}", summary);
    }

    #[test]
    fn force_overwrites_in_place() {
        let mut store = InMemoryStore::new();
        run(&mut store, SAMPLE, false).unwrap();
        let forced = run(&mut store, SAMPLE, true).unwrap();
        assert_eq!(forced.records.len(), 2);
        // still two records for the two urls, not four
        assert_eq!(store.list_all().unwrap().records.len(), 2);
    }

    #[test]
    fn bad_entries_do_not_abort_the_rest() {
        // second anchor has an empty href and is dropped by the parser
        let html = r#"<DL><p>
<DT><A HREF="">broken</A>
<DT><A HREF="https://ok.test">ok</A>
</DL><p>"#;
        let mut store = InMemoryStore::new();
        let result = run(&mut store, html, false).unwrap();
        assert_eq!(result.records.len(), 1);
    }
}
