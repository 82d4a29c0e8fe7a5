//! External editor integration.
//!
//! `edit` opens the record file in place; `add --edit` goes through a
//! prefilled temp-file template. Either way the buffer that comes back is
//! re-parsed as front matter by the caller.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::error::{BmarkError, Result};

/// Resolve the editor command: `$EDITOR`, then `$VISUAL`, then common
/// fallbacks found on `$PATH`.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(BmarkError::Store(
        "no editor found, set $EDITOR".to_string(),
    ))
}

/// Open a file in the user's editor, wait, and return the file contents
/// afterwards.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|e| BmarkError::Store(format!("failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(BmarkError::Store(format!(
            "editor '{}' exited with non-zero status",
            editor
        )));
    }

    Ok(fs::read_to_string(path)?)
}

/// Write `initial` to a temp file, edit it, and return the edited buffer.
/// The temp file is removed best-effort either way.
pub fn edit_template(initial: &str) -> Result<String> {
    let temp_file = env::temp_dir().join(format!("bmark-{}.bm", std::process::id()));
    fs::write(&temp_file, initial)?;

    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // one test so the EDITOR variable is not raced by parallel tests
    #[test]
    fn editor_resolution_and_open() {
        env::set_var("EDITOR", "my-editor");
        assert_eq!(get_editor().unwrap(), "my-editor");

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("t.bm");
        fs::write(&file, "content").unwrap();

        // `true` exits 0 without touching the file
        env::set_var("EDITOR", "true");
        let text = open_in_editor(&file).unwrap();
        assert_eq!(text, "content");
        env::remove_var("EDITOR");
    }
}
