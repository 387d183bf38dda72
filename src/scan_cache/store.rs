//! JSON-backed store for detection results

use crate::persist;
use crate::scanner::DetectionResult;
use crate::utils::cache_key;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Detection cache
///
/// Every [`put`](DetectionCache::put) rewrites the whole backing file, so a
/// crash loses at most the update in flight. There is no locking; two
/// processes sharing a file race and the last writer wins.
#[derive(Debug)]
pub struct DetectionCache {
    path: PathBuf,
    entries: BTreeMap<String, DetectionResult>,
}

impl DetectionCache {
    /// Load the cache stored at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty cache.
    pub fn load(path: &Path) -> Self {
        let entries = if path.exists() {
            match persist::read_json(path) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable detection cache");
                    BTreeMap::new()
                }
            }
        } else {
            debug!(path = %path.display(), "no detection cache yet");
            BTreeMap::new()
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Look up the cached result for a document
    pub fn get(&self, document: &Path) -> Option<&DetectionResult> {
        self.entries.get(&cache_key(document))
    }

    /// Insert or overwrite the entry for `document`, then persist the cache.
    ///
    /// The in-memory entry is kept even when writing the file fails.
    pub fn put(&mut self, document: &Path, result: DetectionResult) -> Result<()> {
        self.entries.insert(cache_key(document), result);
        self.save()
    }

    /// Drop every entry and persist the empty cache
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backing file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries ordered by key
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DetectionResult)> {
        self.entries.iter().map(|(key, result)| (key.as_str(), result))
    }

    fn save(&self) -> Result<()> {
        persist::write_json_atomic(&self.path, &self.entries)
    }
}
