use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;

pub fn run<S: RecordStore>(store: &mut S, src: &str, dst: &str, force: bool) -> Result<CmdResult> {
    let moved = store.rename(src, dst, force)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "moved to {}",
        moved.display_path()
    )));
    Ok(result.with_records(vec![moved]))
}
