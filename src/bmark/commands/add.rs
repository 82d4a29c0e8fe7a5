use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{Draft, RecordStore};

pub fn run<S: RecordStore>(store: &mut S, draft: Draft, overwrite: bool) -> Result<CmdResult> {
    let record = store.create(draft, overwrite)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "added {} ({})",
        record.display_path(),
        record.id()
    )));
    Ok(result.with_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BmarkError;
    use crate::store::memory::InMemoryStore;

    fn draft(url: &str) -> Draft {
        Draft {
            url: url.to_string(),
            ..Draft::default()
        }
    }

    #[test]
    fn add_reports_the_new_id() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, draft("https://example.com/post"), false).unwrap();
        assert_eq!(result.records.len(), 1);
        let id = result.records[0].id();
        assert!(result.messages[0].content.contains(&id));
    }

    #[test]
    fn equivalent_url_needs_force() {
        let mut store = InMemoryStore::new();
        run(&mut store, draft("https://Example.com/Post/"), false).unwrap();
        let err = run(&mut store, draft("https://example.com/post"), false).unwrap_err();
        assert!(matches!(err, BmarkError::AlreadyExists { .. }));
        run(&mut store, draft("https://example.com/post"), true).unwrap();
    }
}
