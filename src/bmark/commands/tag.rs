use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::query;
use crate::store::RecordStore;

/// Add tags to a record without opening an editor.
pub fn add<S: RecordStore>(store: &mut S, target: &str, tags: &[String]) -> Result<CmdResult> {
    let updated = store.update(target, &mut |record| {
        for tag in tags {
            let tag = tag.trim();
            if !tag.is_empty() && !record.header.tags.iter().any(|t| t == tag) {
                record.header.tags.push(tag.to_string());
            }
        }
    })?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "tags now: [{}]",
        updated.header.tags.join(", ")
    )));
    Ok(result.with_records(vec![updated]))
}

/// Remove tags from a record.
pub fn rm<S: RecordStore>(store: &mut S, target: &str, tags: &[String]) -> Result<CmdResult> {
    let updated = store.update(target, &mut |record| {
        record
            .header
            .tags
            .retain(|t| !tags.iter().any(|gone| gone.trim() == t));
    })?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "tags now: [{}]",
        updated.header.tags.join(", ")
    )));
    Ok(result.with_records(vec![updated]))
}

/// List every tag discovered in the store.
pub fn all<S: RecordStore>(store: &S, folder_tags: bool) -> Result<CmdResult> {
    let listing = store.list_all()?;
    let mut result = CmdResult::default();
    for failure in &listing.failures {
        result.add_message(CmdMessage::warning(format!(
            "skipped {}: {}",
            failure.path.display(),
            failure.reason
        )));
    }
    let tags = query::list_tags(&listing.records, folder_tags);
    Ok(result.with_rendered(
        tags.into_iter().collect::<Vec<_>>().join("\n"),
    ))
}
