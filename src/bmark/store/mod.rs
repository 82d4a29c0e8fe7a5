//! Storage layer.
//!
//! The [`RecordStore`] trait abstracts persistence so commands can run
//! against the production [`fs::FileStore`] or the test-only
//! [`memory::InMemoryStore`]. The store root is always passed in
//! explicitly (no ambient global), so several stores can live in one
//! test process.
//!
//! On-disk layout for `FileStore`:
//!
//! ```text
//! ~/.bookmarks.d/
//! ├── config.json                     # store policy (folder_tags)
//! ├── example-com-post-9f2a41bc.bm    # flat default placement
//! └── dev/rust/
//!     └── tips-1c0ffee2.bm            # folders from -p or import
//! ```
//!
//! Every write goes through a same-directory temp file plus an atomic
//! rename; every externally supplied path is sanitized before it touches
//! the filesystem.

use std::path::{Path, PathBuf};

use crate::error::{BmarkError, Result};
use crate::frontmatter::{self, Header};
use crate::model::{iso_now, Record};
use crate::slug::{compose_filename, derive_id, normalize_slug, slug_from_url, FILE_EXT};

pub mod fs;
pub mod memory;

/// Input for creating a record.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub url: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub body: String,
    /// Folder namespace, e.g. `dev/rust`.
    pub folder: Option<String>,
    /// Explicit slug override; may itself contain `/` segments.
    pub slug: Option<String>,
    /// Provided by import; `None` means "now".
    pub created: Option<String>,
    pub modified: Option<String>,
}

/// Result of a bulk enumeration: parse failures ride along instead of
/// aborting, so a store with one corrupt file stays usable.
#[derive(Debug, Default)]
pub struct Listing {
    pub records: Vec<Record>,
    pub failures: Vec<ListFailure>,
}

#[derive(Debug)]
pub struct ListFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Abstract interface over a bookmark store.
pub trait RecordStore {
    /// Create a record; `AlreadyExists` if the target file is taken and
    /// `overwrite` is false.
    fn create(&mut self, draft: Draft, overwrite: bool) -> Result<Record>;

    /// Resolve a bare ID or path-ish token to a record.
    fn read(&self, target: &str) -> Result<Record>;

    /// Load, mutate, and persist. `modified` bumps only when the
    /// serialized content actually changed and the mutator did not set it
    /// itself; `created` and the path are always preserved.
    fn update(&mut self, target: &str, mutate: &mut dyn FnMut(&mut Record)) -> Result<Record>;

    /// Remove a record. Deletion is immediate and irreversible.
    fn delete(&mut self, target: &str) -> Result<Record>;

    /// Relocate a record. The ID never changes; `AlreadyExists` at the
    /// destination unless `force`.
    fn rename(&mut self, src: &str, dst: &str, force: bool) -> Result<Record>;

    /// Enumerate every record under the root.
    fn list_all(&self) -> Result<Listing>;

    /// Absolute (or store-relative, for the memory store) path of a
    /// record's file, for editor integration.
    fn path_of(&self, target: &str) -> Result<PathBuf>;
}

/// Split a user-supplied path on `/`, reject escapes, and slugify each
/// segment. Segments that slugify to nothing are dropped.
pub fn sanitize_segments(input: &str) -> Result<Vec<String>> {
    let trimmed = input.trim();
    let unsafe_input = || BmarkError::UnsafePath {
        input: input.to_string(),
    };
    if trimmed.starts_with('/') || trimmed.starts_with('\\') {
        return Err(unsafe_input());
    }
    // windows drive prefix
    let mut chars = trimmed.chars();
    if let (Some(first), Some(':')) = (chars.next(), chars.next()) {
        if first.is_ascii_alphabetic() {
            return Err(unsafe_input());
        }
    }
    let mut segments = Vec::new();
    for raw in trimmed.split(['/', '\\']) {
        if raw.is_empty() || raw == "." {
            continue;
        }
        if raw == ".." {
            return Err(unsafe_input());
        }
        let slug = normalize_slug(raw);
        if !slug.is_empty() {
            segments.push(slug);
        }
    }
    Ok(segments)
}

/// Derive the relative path and full header for a new record.
pub(crate) fn plan_create(draft: &Draft) -> Result<(PathBuf, Header, String)> {
    let url = draft.url.trim().to_string();
    if url.is_empty() {
        return Err(BmarkError::Store("a bookmark needs a url".to_string()));
    }
    let id = derive_id(&url);

    let mut segments = match &draft.folder {
        Some(folder) => sanitize_segments(folder)?,
        None => Vec::new(),
    };
    let slug = match &draft.slug {
        Some(explicit) => {
            let mut parts = sanitize_segments(explicit)?;
            let last = parts.pop().unwrap_or_default();
            segments.extend(parts);
            last
        }
        None => slug_from_url(&url),
    };

    let mut rel = PathBuf::new();
    for segment in &segments {
        rel.push(segment);
    }
    rel.push(compose_filename(&slug, &id));

    let header = Header {
        url,
        title: draft.title.clone().filter(|t| !t.is_empty()),
        tags: draft
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        created: Some(draft.created.clone().unwrap_or_else(iso_now)),
        modified: draft.modified.clone(),
        extra: Default::default(),
    };
    Ok((rel, header, draft.body.clone()))
}

/// Apply a mutation and decide whether anything semantic changed.
/// Returns `None` when the serialized content is identical (no write, no
/// `modified` bump).
pub(crate) fn apply_mutation(
    original: &Record,
    mutate: &mut dyn FnMut(&mut Record),
) -> Result<Option<Record>> {
    let mut updated = original.clone();
    mutate(&mut updated);
    updated.path = original.path.clone();
    updated.header.created = original.header.created.clone();

    let before = frontmatter::serialize(&original.header, &original.body)?;
    let after = frontmatter::serialize(&updated.header, &updated.body)?;
    if before == after {
        return Ok(None);
    }
    // A mutator that set `modified` itself (dedupe installing the merged
    // stamp) wins over the automatic bump.
    if updated.header.modified == original.header.modified {
        updated.header.modified = Some(iso_now());
    }
    Ok(Some(updated))
}

/// Destination path for a rename: folder segments plus a recomputed
/// `<slug>-<id>.bm` filename, keeping the ID suffix convention.
pub(crate) fn plan_rename(record: &Record, dst: &str) -> Result<PathBuf> {
    let mut segments = sanitize_segments(dst)?;
    let slug = segments.pop().ok_or_else(|| BmarkError::UnsafePath {
        input: dst.to_string(),
    })?;
    let mut rel = PathBuf::new();
    for segment in &segments {
        rel.push(segment);
    }
    rel.push(compose_filename(&slug, &record.id()));
    Ok(rel)
}

/// Shared resolution policy: a bare ID wins, then an exact relative path,
/// then a fuzzy match on the filename stem. Hits are ordered by path so
/// ambiguity resolves deterministically.
pub(crate) fn resolve_among<'a>(records: &'a [Record], target: &str) -> Option<&'a Record> {
    let token = target.trim();
    if token.is_empty() {
        return None;
    }

    if looks_like_id(token) {
        if let Some(found) = records.iter().find(|r| r.id() == token) {
            return Some(found);
        }
    }

    let token = token.strip_suffix(FILE_EXT).unwrap_or(token);
    let segments = sanitize_segments(token).ok()?;
    if segments.is_empty() {
        return None;
    }
    let mut rel = PathBuf::new();
    for segment in &segments {
        rel.push(segment);
    }
    let exact = append_ext(&rel);
    if let Some(found) = records.iter().find(|r| r.path == exact) {
        return Some(found);
    }

    let needle = segments.last()?;
    let mut hits: Vec<&Record> = records
        .iter()
        .filter(|r| {
            let stem = match r.path.file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => return false,
            };
            stem.ends_with(needle.as_str()) || stem.starts_with(&format!("{}-", needle))
        })
        .collect();
    hits.sort_by(|a, b| a.path.cmp(&b.path));
    hits.into_iter().next()
}

pub(crate) fn looks_like_id(token: &str) -> bool {
    token.len() == crate::slug::ID_LEN && token.chars().all(|c| c.is_ascii_hexdigit())
}

pub(crate) fn append_ext(rel: &Path) -> PathBuf {
    let mut name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(FILE_EXT);
    rel.with_file_name(name)
}
