use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::netscape;
use crate::query::{self, Filter};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Netscape,
    Json,
}

pub fn run<S: RecordStore>(
    store: &S,
    format: ExportFormat,
    filter: &Filter,
    folder_tags: bool,
    root_label: &str,
) -> Result<CmdResult> {
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
    let rendered = match format {
        ExportFormat::Netscape => netscape::export(&records, root_label),
        ExportFormat::Json => {
            let rows: Vec<_> = records.iter().map(|r| r.summary()).collect();
            serde_json::to_string(&rows)?
        }
    };
    Ok(result.with_rendered(rendered))
}
