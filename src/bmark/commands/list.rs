use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::query::{self, Filter};
use crate::store::RecordStore;

pub fn run<S: RecordStore>(store: &S, filter: &Filter, folder_tags: bool) -> Result<CmdResult> {
    let listing = store.list_all()?;
    let mut result = CmdResult::default();
    for failure in &listing.failures {
        result.add_message(CmdMessage::warning(format!(
            "skipped {}: {}",
            failure.path.display(),
            failure.reason
        )));
    }
    let records = query::apply(listing.records, filter, folder_tags);
    let summaries = records.iter().map(|r| r.summary()).collect();
    Ok(result.with_summaries(summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_stamp;
    use crate::store::memory::InMemoryStore;
    use crate::store::Draft;

    fn seed(store: &mut InMemoryStore, url: &str, folder: Option<&str>, created: &str) {
        store
            .create(
                Draft {
                    url: url.into(),
                    folder: folder.map(|f| f.to_string()),
                    created: Some(created.into()),
                    ..Draft::default()
                },
                false,
            )
            .unwrap();
    }

    #[test]
    fn lists_newest_first() {
        let mut store = InMemoryStore::new();
        seed(&mut store, "https://old.test", None, "2024-01-01T00:00:00+00:00");
        seed(&mut store, "https://new.test", None, "2025-01-01T00:00:00+00:00");

        let result = run(&store, &Filter::default(), true).unwrap();
        assert_eq!(result.summaries.len(), 2);
        assert_eq!(result.summaries[0].url, "https://new.test");
    }

    #[test]
    fn since_filter_cuts_older_records() {
        let mut store = InMemoryStore::new();
        seed(&mut store, "https://old.test", None, "2024-12-31T23:59:59");
        seed(&mut store, "https://new.test", None, "2025-01-01T00:00:00");

        let filter = Filter {
            since: parse_stamp("2025-01-01"),
            ..Filter::default()
        };
        let result = run(&store, &filter, true).unwrap();
        assert_eq!(result.summaries.len(), 1);
        assert_eq!(result.summaries[0].url, "https://new.test");
    }

    #[test]
    fn corrupt_files_become_warnings_not_failures() {
        let mut store = InMemoryStore::new();
        store.put_raw("bad-00000000.bm", "---\nurl: x\nnope");
        seed(&mut store, "https://ok.test", None, "2025-01-01T00:00:00+00:00");

        let result = run(&store, &Filter::default(), true).unwrap();
        assert_eq!(result.summaries.len(), 1);
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("bad-00000000.bm"));
    }

    #[test]
    fn folder_tag_filter_respects_policy() {
        let mut store = InMemoryStore::new();
        seed(
            &mut store,
            "https://a.test",
            Some("dev"),
            "2025-01-01T00:00:00+00:00",
        );
        let filter = Filter {
            tag: Some("dev".into()),
            ..Filter::default()
        };
        assert_eq!(run(&store, &filter, true).unwrap().summaries.len(), 1);
        assert!(run(&store, &filter, false).unwrap().summaries.is_empty());
    }
}
