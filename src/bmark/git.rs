//! Git sync collaborator.
//!
//! Thin, blocking wrapper over the `git` binary, scoped to the store
//! root. Every non-zero exit becomes a `Sync` error carrying stderr;
//! failures here must reach the user, never vanish.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{BmarkError, Result};

pub struct GitSync {
    root: PathBuf,
}

impl GitSync {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn is_repo(&self) -> bool {
        self.root.join(".git").exists()
    }

    pub fn init(&self) -> Result<()> {
        self.run(&["init"]).map(|_| ())
    }

    pub fn stage_all(&self) -> Result<()> {
        self.run(&["add", "-A"]).map(|_| ())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message, "--allow-empty"])
            .map(|_| ())
    }

    /// Whether the current branch tracks an upstream. A missing upstream
    /// is a normal state (`Ok(false)`), not an error; only a failure to
    /// run git at all is.
    pub fn has_upstream(&self) -> Result<bool> {
        let output = Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])
            .current_dir(&self.root)
            .output()
            .map_err(|e| BmarkError::Sync {
                reason: format!("failed to run git: {}", e),
            })?;
        Ok(output.status.success())
    }

    pub fn push(&self) -> Result<()> {
        self.run(&["push"]).map(|_| ())
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| BmarkError::Sync {
                reason: format!("failed to run git {}: {}", args.join(" "), e),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BmarkError::Sync {
                reason: format!("git {}: {}", args.join(" "), stderr.trim()),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
