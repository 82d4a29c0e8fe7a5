//! Production file-backed store.
//!
//! One `.bm` file per bookmark under the store root. Writes are atomic:
//! full content goes to a same-directory temp file which is then renamed
//! over the target, so a crash mid-write never leaves a half-written
//! record. Two processes writing the same file race and the last rename
//! wins; there is no locking and that is an accepted limitation.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{
    apply_mutation, plan_create, plan_rename, resolve_among, Draft, ListFailure, Listing,
    RecordStore,
};
use crate::error::{BmarkError, Result};
use crate::frontmatter;
use crate::model::Record;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Create the root directory if needed.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn abs(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }

    fn load(&self, rel: &Path) -> Result<Record> {
        let abs = self.abs(rel);
        let text = fs::read_to_string(&abs)?;
        let (header, body) = frontmatter::parse(&text).map_err(|e| BmarkError::Parse {
            path: rel.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Record::new(rel.to_path_buf(), header, body))
    }

    fn persist(&self, record: &Record) -> Result<()> {
        let abs = self.abs(&record.path);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = frontmatter::serialize(&record.header, &record.body)?;
        atomic_write(&abs, &text)
    }

    /// Remove directories left empty between `dir` and the root.
    fn prune_empty_dirs(&self, mut dir: PathBuf) {
        while dir.starts_with(&self.root) && dir != self.root {
            match fs::read_dir(&dir) {
                Ok(mut entries) => {
                    if entries.next().is_some() {
                        break;
                    }
                }
                Err(_) => break,
            }
            if fs::remove_dir(&dir).is_err() {
                break;
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => break,
            }
        }
    }

    fn not_found(target: &str) -> BmarkError {
        BmarkError::NotFound {
            target: target.to_string(),
        }
    }
}

impl RecordStore for FileStore {
    fn create(&mut self, draft: Draft, overwrite: bool) -> Result<Record> {
        if !self.exists() {
            return Err(BmarkError::Store(format!(
                "store not found: {} (run `bmark init` first)",
                self.root.display()
            )));
        }
        let (rel, header, body) = plan_create(&draft)?;
        let abs = self.abs(&rel);
        if abs.exists() && !overwrite {
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
        let abs = self.abs(&record.path);
        fs::remove_file(&abs)?;
        if let Some(parent) = abs.parent() {
            self.prune_empty_dirs(parent.to_path_buf());
        }
        Ok(record)
    }

    fn rename(&mut self, src: &str, dst: &str, force: bool) -> Result<Record> {
        let record = self.read(src)?;
        let rel = plan_rename(&record, dst)?;
        if rel == record.path {
            return Ok(record);
        }
        let abs_dst = self.abs(&rel);
        if abs_dst.exists() && !force {
            return Err(BmarkError::AlreadyExists { path: rel });
        }
        if let Some(parent) = abs_dst.parent() {
            fs::create_dir_all(parent)?;
        }
        let abs_src = self.abs(&record.path);
        fs::rename(&abs_src, &abs_dst)?;
        if let Some(parent) = abs_src.parent() {
            self.prune_empty_dirs(parent.to_path_buf());
        }
        Ok(Record::new(rel, record.header, record.body))
    }

    fn list_all(&self) -> Result<Listing> {
        let mut listing = Listing::default();
        if !self.exists() {
            return Ok(listing);
        }
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // skip dot-directories (.git and friends)
                !(e.file_type().is_dir()
                    && e.file_name().to_string_lossy().starts_with('.')
                    && e.depth() > 0)
            });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // file vanished or unreadable mid-walk; report and move on
                    listing.failures.push(ListFailure {
                        path: err.path().map(Path::to_path_buf).unwrap_or_default(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "bm") {
                continue;
            }
            let rel = match path.strip_prefix(&self.root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            match self.load(&rel) {
                Ok(record) => listing.records.push(record),
                Err(err) => listing.failures.push(ListFailure {
                    path: rel,
                    reason: err.to_string(),
                }),
            }
        }
        Ok(listing)
    }

    fn path_of(&self, target: &str) -> Result<PathBuf> {
        let record = self.read(target)?;
        Ok(self.abs(&record.path))
    }
}

/// Write-then-rename. On any failure before the rename the temp file is
/// removed and the original target is untouched.
fn atomic_write(path: &Path, text: &str) -> Result<()> {
    let tmp = path.with_extension("bm.tmp");
    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        Ok(())
    })();
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    fs::rename(&tmp, path).map_err(|err| {
        let _ = fs::remove_file(&tmp);
        BmarkError::Io(err)
    })
}
