//! API facade: the single entry point for every operation, generic over
//! the storage backend. Dispatches to `commands/*` and returns structured
//! results; no terminal I/O happens at this layer or below.

use std::path::PathBuf;

use crate::commands::{self, CmdResult};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::frontmatter::Header;
use crate::query::Filter;
use crate::store::{Draft, RecordStore};

pub use crate::commands::export::ExportFormat;

pub struct BmarkApi<S: RecordStore> {
    store: S,
    config: StoreConfig,
}

impl<S: RecordStore> BmarkApi<S> {
    pub fn new(store: S, config: StoreConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn add(&mut self, draft: Draft, overwrite: bool) -> Result<CmdResult> {
        commands::add::run(&mut self.store, draft, overwrite)
    }

    pub fn show(&self, target: &str) -> Result<CmdResult> {
        commands::show::run(&self.store, target)
    }

    pub fn list(&self, filter: &Filter) -> Result<CmdResult> {
        commands::list::run(&self.store, filter, self.config.folder_tags)
    }

    pub fn search(&self, term: &str) -> Result<CmdResult> {
        commands::search::run(&self.store, term, self.config.folder_tags)
    }

    pub fn remove(&mut self, target: &str) -> Result<CmdResult> {
        commands::remove::run(&mut self.store, target)
    }

    pub fn relocate(&mut self, src: &str, dst: &str, force: bool) -> Result<CmdResult> {
        commands::mv::run(&mut self.store, src, dst, force)
    }

    pub fn tag_add(&mut self, target: &str, tags: &[String]) -> Result<CmdResult> {
        commands::tag::add(&mut self.store, target, tags)
    }

    pub fn tag_rm(&mut self, target: &str, tags: &[String]) -> Result<CmdResult> {
        commands::tag::rm(&mut self.store, target, tags)
    }

    pub fn tags(&self) -> Result<CmdResult> {
        commands::tag::all(&self.store, self.config.folder_tags)
    }

    pub fn export(
        &self,
        format: ExportFormat,
        filter: &Filter,
        root_label: &str,
    ) -> Result<CmdResult> {
        commands::export::run(
            &self.store,
            format,
            filter,
            self.config.folder_tags,
            root_label,
        )
    }

    pub fn import(&mut self, html: &str, force: bool) -> Result<CmdResult> {
        commands::import::run(&mut self.store, html, force)
    }

    pub fn dedupe(&mut self, apply: bool) -> Result<CmdResult> {
        commands::dedupe::run(&mut self.store, apply)
    }

    pub fn path_of(&self, target: &str) -> Result<PathBuf> {
        self.store.path_of(target)
    }

    /// Install edited content (from the editor flow). `modified` bumps
    /// only if the content actually changed.
    pub fn apply_edit(&mut self, target: &str, header: Header, body: String) -> Result<CmdResult> {
        let record = self.store.update(target, &mut |record| {
            record.header = header.clone();
            record.body = body.clone();
        })?;
        Ok(CmdResult::default().with_records(vec![record]))
    }
}
