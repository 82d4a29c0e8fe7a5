use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BmarkError {
    #[error("not found: {target}")]
    NotFound { target: String },

    #[error("already exists: {} (use --force to overwrite)", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("unsafe path: {input}")]
    UnsafePath { input: String },

    #[error("parse error in {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("sync failed: {reason}")]
    Sync { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("front matter error: {0}")]
    FrontMatter(#[from] crate::frontmatter::FrontMatterError),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, BmarkError>;
