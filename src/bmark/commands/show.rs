use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::RecordStore;

pub fn run<S: RecordStore>(store: &S, target: &str) -> Result<CmdResult> {
    let record = store.read(target)?;
    Ok(CmdResult::default().with_records(vec![record]))
}
