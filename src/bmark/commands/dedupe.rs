use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::netscape::{self, MergePlan};
use crate::store::RecordStore;

/// Plan merges for records sharing a normalized URL; apply them only when
/// asked. Without `apply` nothing on disk changes.
pub fn run<S: RecordStore>(store: &mut S, apply: bool) -> Result<CmdResult> {
    let listing = store.list_all()?;
    let plans = netscape::dedupe_plan(&listing.records);

    let mut result = CmdResult::default();
    if plans.is_empty() {
        result.add_message(CmdMessage::info("no duplicates found"));
        return Ok(result);
    }

    for plan in &plans {
        result.add_message(CmdMessage::info(format!(
            "{}: keep {}, absorb {}",
            plan.id,
            plan.survivor.display(),
            plan.absorbed
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    if !apply {
        result.add_message(CmdMessage::info(format!(
            "{} merge(s) planned; re-run with --apply to merge",
            plans.len()
        )));
        return Ok(result);
    }

    let mut merged = 0usize;
    for plan in &plans {
        apply_plan(store, plan)?;
        merged += 1;
    }
    result.add_message(CmdMessage::success(format!("merged {} group(s)", merged)));
    Ok(result)
}

fn apply_plan<S: RecordStore>(store: &mut S, plan: &MergePlan) -> Result<()> {
    let survivor = plan.survivor.to_string_lossy().into_owned();
    store.update(&survivor, &mut |record| {
        record.header.tags = plan.tags.clone();
        if plan.modified.is_some() {
            record.header.modified = plan.modified.clone();
        }
    })?;
    for absorbed in &plan.absorbed {
        store.delete(&absorbed.to_string_lossy())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use crate::store::Draft;

    fn seeded() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store
            .create(
                Draft {
                    url: "http://x.test".into(),
                    slug: Some("one".into()),
                    tags: vec!["a".into()],
                    created: Some("2024-01-01T00:00:00+00:00".into()),
                    ..Draft::default()
                },
                false,
            )
            .unwrap();
        store
            .create(
                Draft {
                    url: "http://x.test/".into(),
                    slug: Some("two".into()),
                    tags: vec!["b".into()],
                    created: Some("2025-01-01T00:00:00+00:00".into()),
                    ..Draft::default()
                },
                false,
            )
            .unwrap();
        store
    }

    #[test]
    fn plan_only_without_apply() {
        let mut store = seeded();
        let result = run(&mut store, false).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("--apply")));
        // nothing deleted
        assert_eq!(store.list_all().unwrap().records.len(), 2);
    }

    #[test]
    fn apply_merges_tags_into_survivor() {
        let mut store = seeded();
        run(&mut store, true).unwrap();

        let records = store.list_all().unwrap().records;
        assert_eq!(records.len(), 1);
        let survivor = &records[0];
        // earliest created wins
        assert_eq!(
            survivor.header.created.as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert_eq!(survivor.header.tags, vec!["a", "b"]);
    }

    #[test]
    fn no_duplicates_is_a_clean_report() {
        let mut store = InMemoryStore::new();
        store
            .create(
                Draft {
                    url: "https://only.test".into(),
                    ..Draft::default()
                },
                false,
            )
            .unwrap();
        let result = run(&mut store, true).unwrap();
        assert!(result.messages[0].content.contains("no duplicates"));
    }
}
