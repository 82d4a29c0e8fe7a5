use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::query;
use crate::store::RecordStore;

pub fn run<S: RecordStore>(store: &S, term: &str, folder_tags: bool) -> Result<CmdResult> {
    let listing = store.list_all()?;
    let mut result = CmdResult::default();
    for failure in &listing.failures {
        result.add_message(CmdMessage::warning(format!(
            "skipped {}: {}",
            failure.path.display(),
            failure.reason
        )));
    }
    let hits = query::search(listing.records, term, folder_tags);
    let summaries = hits.iter().map(|r| r.summary()).collect();
    Ok(result.with_summaries(summaries))
}
