//! In-memory store for tests: the same serialized file texts a
//! `FileStore` would write, keyed by relative path, with no filesystem.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{
    apply_mutation, plan_create, plan_rename, resolve_among, Draft, ListFailure, Listing,
    RecordStore,
};
use crate::error::{BmarkError, Result};
use crate::frontmatter;
use crate::model::Record;

#[derive(Default)]
pub struct InMemoryStore {
    files: BTreeMap<PathBuf, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw file, bypassing the create path. Lets tests exercise
    /// legacy and corrupt content.
    pub fn put_raw(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    fn persist(&mut self, record: &Record) -> Result<()> {
        let text = frontmatter::serialize(&record.header, &record.body)?;
        self.files.insert(record.path.clone(), text);
        Ok(())
    }

    fn not_found(target: &str) -> BmarkError {
        BmarkError::NotFound {
            target: target.to_string(),
        }
    }
}

impl RecordStore for InMemoryStore {
    fn create(&mut self, draft: Draft, overwrite: bool) -> Result<Record> {
        let (rel, header, body) = plan_create(&draft)?;
        if self.files.contains_key(&rel) && !overwrite {
            return Err(BmarkError::AlreadyExists { path: rel });
        }
        let record = Record::new(rel, header, body);
        self.persist(&record)?;
        Ok(record)
    }

    fn read(&self, target: &str) -> Result<Record> {
        let listing = self.list_all()?;
        resolve_among(&listing.records, target)
            .cloned()
            .ok_or_else(|| Self::not_found(target))
    }

    fn update(&mut self, target: &str, mutate: &mut dyn FnMut(&mut Record)) -> Result<Record> {
        let record = self.read(target)?;
        match apply_mutation(&record, mutate)? {
            Some(updated) => {
                self.persist(&updated)?;
                Ok(updated)
            }
            None => Ok(record),
        }
    }

    fn delete(&mut self, target: &str) -> Result<Record> {
        let record = self.read(target)?;
        self.files.remove(&record.path);
        Ok(record)
    }

    fn rename(&mut self, src: &str, dst: &str, force: bool) -> Result<Record> {
        let record = self.read(src)?;
        let rel = plan_rename(&record, dst)?;
        if rel == record.path {
            return Ok(record);
        }
        if self.files.contains_key(&rel) && !force {
            return Err(BmarkError::AlreadyExists { path: rel });
        }
        let text = self
            .files
            .remove(&record.path)
            .ok_or_else(|| Self::not_found(src))?;
        self.files.insert(rel.clone(), text);
        Ok(Record::new(rel, record.header, record.body))
    }

    fn list_all(&self) -> Result<Listing> {
        let mut listing = Listing::default();
        for (path, text) in &self.files {
            match frontmatter::parse(text) {
                Ok((header, body)) => {
                    listing
                        .records
                        .push(Record::new(path.clone(), header, body));
                }
                Err(err) => listing.failures.push(ListFailure {
                    path: path.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        Ok(listing)
    }

    fn path_of(&self, target: &str) -> Result<PathBuf> {
        Ok(self.read(target)?.path)
    }
}
