use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;

pub fn run<S: RecordStore>(store: &mut S, target: &str) -> Result<CmdResult> {
    let removed = store.delete(target)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "removed {}",
        removed.display_path()
    )));
    Ok(result.with_records(vec![removed]))
}
