use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BmarkError, Result};
use crate::git::GitSync;

/// Stage everything, commit, and push when an upstream exists. Every git
/// failure propagates; this path has a history of being silently eaten,
/// so nothing gets discarded here.
pub fn run(git: &GitSync, message: Option<&str>) -> Result<CmdResult> {
    if !git.is_repo() {
        return Err(BmarkError::Sync {
            reason: "store is not a git repo (run `bmark init --git`)".to_string(),
        });
    }

    git.stage_all()?;
    git.commit(message.unwrap_or("bmark sync"))?;

    let mut result = CmdResult::default();
    if git.has_upstream()? {
        git.push()?;
        result.add_message(CmdMessage::success("committed and pushed"));
    } else {
        result.add_message(CmdMessage::success("committed"));
        result.add_message(CmdMessage::info("no upstream configured, push skipped"));
    }
    Ok(result)
}
