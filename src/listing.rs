//! Directory listing with cache-first signature detection

use crate::scan_cache::DetectionCache;
use crate::scanner::{DetectionResult, Scanner};
use crate::utils::{absolute_path, display_path, has_extension, safe_metadata, safe_read_dir};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which documents a listing keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
    #[default]
    All,
    SignedOnly,
    UnsignedOnly,
}

impl ListFilter {
    pub fn accepts(self, result: &DetectionResult) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::SignedOnly => result.is_signed,
            ListFilter::UnsignedOnly => !result.is_signed,
        }
    }
}

/// One document in a folder listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry {
    pub file_name: String,
    pub modified_time: DateTime<Local>,
    pub is_signed: bool,
    pub signer: String,
    pub full_path: PathBuf,
}

impl DirectoryEntry {
    pub fn signed_label(&self) -> &'static str {
        if self.is_signed {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Detection result for one document, served from the cache when present.
///
/// On a miss the document is scanned and the result written back before
/// returning. A failed write is logged; the result is still returned.
pub fn detect(path: &Path, cache: &mut DetectionCache, scanner: &Scanner) -> DetectionResult {
    if let Some(cached) = cache.get(path) {
        debug!(path = %path.display(), "detection cache hit");
        return cached.clone();
    }
    rescan(path, cache, scanner)
}

/// Scan `path` unconditionally and overwrite its cache entry
pub fn rescan(path: &Path, cache: &mut DetectionCache, scanner: &Scanner) -> DetectionResult {
    let result = scanner.scan(path);
    if let Err(e) = cache.put(path, result.clone()) {
        warn!(path = %path.display(), error = %e, "failed to persist detection cache");
    }
    result
}

/// List the documents directly inside `folder`
///
/// Handles errors gracefully - an unreadable folder yields an empty listing
pub fn list_directory(
    folder: &Path,
    filter: ListFilter,
    extension: &str,
    cache: &mut DetectionCache,
    scanner: &Scanner,
) -> Vec<DirectoryEntry> {
    list_directory_with_progress(folder, filter, extension, cache, scanner, |_| {})
}

/// [`list_directory`], calling `on_path` before each candidate is classified
pub fn list_directory_with_progress<F>(
    folder: &Path,
    filter: ListFilter,
    extension: &str,
    cache: &mut DetectionCache,
    scanner: &Scanner,
    mut on_path: F,
) -> Vec<DirectoryEntry>
where
    F: FnMut(&Path),
{
    let folder = absolute_path(folder);
    let read_dir = match safe_read_dir(&folder) {
        Ok(rd) => rd,
        Err(e) => {
            warn!(folder = %display_path(&folder), error = %e, "cannot list folder");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for entry in read_dir.filter_map(|e| e.ok()) {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !has_extension(&file_name, extension) {
            continue;
        }

        let full_path = folder.join(entry.file_name());
        let metadata = match safe_metadata(&full_path) {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                warn!(path = %display_path(&full_path), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let modified_time = match metadata.modified() {
            Ok(mtime) => DateTime::<Local>::from(mtime),
            Err(e) => {
                warn!(path = %display_path(&full_path), error = %e, "skipping entry without mtime");
                continue;
            }
        };

        on_path(&full_path);
        let result = detect(&full_path, cache, scanner);
        if !filter.accepts(&result) {
            continue;
        }

        entries.push(DirectoryEntry {
            file_name,
            modified_time,
            is_signed: result.is_signed,
            signer: result.signer,
            full_path,
        });
    }

    debug!(folder = %display_path(&folder), count = entries.len(), "listing complete");
    entries
}
