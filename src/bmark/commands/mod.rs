//! Business logic for each CLI operation.
//!
//! Commands operate on a [`RecordStore`] and return structured
//! [`CmdResult`] values. Nothing here writes to stdout/stderr or assumes
//! a terminal; presentation is the CLI layer's job.

use crate::model::{Record, Summary};

pub mod add;
pub mod dedupe;
pub mod export;
pub mod import;
pub mod list;
pub mod mv;
pub mod remove;
pub mod search;
pub mod show;
pub mod sync;
pub mod tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Records touched or displayed whole (show, add).
    pub records: Vec<Record>,
    /// Listing rows (list, search).
    pub summaries: Vec<Summary>,
    /// Pre-rendered payload (export output).
    pub rendered: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_summaries(mut self, summaries: Vec<Summary>) -> Self {
        self.summaries = summaries;
        self
    }

    pub fn with_rendered(mut self, rendered: String) -> Self {
        self.rendered = Some(rendered);
        self
    }
}
