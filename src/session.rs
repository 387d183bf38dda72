//! Browsing session: current folder, current listing and sort state
//!
//! Everything a front end needs between two user actions lives here instead
//! of in process-wide globals, so independent sessions (and tests) do not
//! interfere with each other.

use crate::config::Config;
use crate::listing::{self, DirectoryEntry, ListFilter};
use crate::preference::FolderPreference;
use crate::scan_cache::DetectionCache;
use crate::scanner::{DetectionResult, Scanner};
use crate::utils::absolute_path;
use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Listing column a sort applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Modified,
    Signed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Stable sort of `entries` by one column
pub fn sort_entries(entries: &mut [DirectoryEntry], key: SortKey, order: SortOrder) {
    let compare = |a: &DirectoryEntry, b: &DirectoryEntry| -> Ordering {
        match key {
            SortKey::Name => a.file_name.cmp(&b.file_name),
            SortKey::Modified => a.modified_time.cmp(&b.modified_time),
            SortKey::Signed => a.signed_label().cmp(b.signed_label()),
        }
    };
    match order {
        SortOrder::Ascending => entries.sort_by(compare),
        SortOrder::Descending => entries.sort_by(|a, b| compare(b, a)),
    }
}

pub struct Session {
    cache: DetectionCache,
    preference: FolderPreference,
    scanner: Scanner,
    extension: String,
    folder: PathBuf,
    entries: Vec<DirectoryEntry>,
    sort_state: HashMap<SortKey, SortOrder>,
}

impl Session {
    /// Load the cache and folder preference named by `config`.
    ///
    /// Starts in the remembered folder, or the working directory when none
    /// was saved.
    pub fn open(config: &Config) -> Self {
        let cache = DetectionCache::load(&config.cache_path());
        let preference = FolderPreference::load(&config.preference_path());
        let folder = preference
            .last_folder()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| absolute_path(Path::new(".")));

        Self {
            cache,
            preference,
            scanner: Scanner::new(config.detection),
            extension: config.extension.clone(),
            folder,
            entries: Vec::new(),
            sort_state: HashMap::new(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Switch to `folder` and remember it for the next run.
    ///
    /// The folder is switched even if the preference cannot be written.
    pub fn select_folder(&mut self, folder: &Path) -> Result<()> {
        self.folder = absolute_path(folder);
        self.entries.clear();
        self.preference.save(&self.folder)
    }

    /// Re-list the current folder. Entries come back in directory order.
    pub fn refresh(&mut self, filter: ListFilter) -> &[DirectoryEntry] {
        self.refresh_with_progress(filter, |_| {})
    }

    pub fn refresh_with_progress<F>(&mut self, filter: ListFilter, on_path: F) -> &[DirectoryEntry]
    where
        F: FnMut(&Path),
    {
        self.entries = listing::list_directory_with_progress(
            &self.folder,
            filter,
            &self.extension,
            &mut self.cache,
            &self.scanner,
            on_path,
        );
        &self.entries
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Sort by `key`, toggling direction on each call for the same key.
    ///
    /// The first request for a key sorts descending. Each key keeps its own
    /// direction.
    pub fn sort(&mut self, key: SortKey) -> SortOrder {
        let order = self
            .sort_state
            .get(&key)
            .map(|order| order.reversed())
            .unwrap_or(SortOrder::Descending);
        self.sort_with(key, order);
        order
    }

    /// Sort by `key` in a fixed direction; the next [`Session::sort`] on this key flips it
    pub fn sort_with(&mut self, key: SortKey, order: SortOrder) {
        self.sort_state.insert(key, order);
        sort_entries(&mut self.entries, key, order);
    }

    /// Cache-first detection for a single document
    pub fn check(&mut self, path: &Path) -> DetectionResult {
        listing::detect(path, &mut self.cache, &self.scanner)
    }

    /// Scan a single document and overwrite its cache entry
    pub fn rescan(&mut self, path: &Path) -> DetectionResult {
        listing::rescan(path, &mut self.cache, &self.scanner)
    }

    pub fn cache(&self) -> &DetectionCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DetectionCache {
        &mut self.cache
    }

    pub fn preference(&self) -> &FolderPreference {
        &self.preference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{signature, write_pdf};
    use chrono::{Duration, Local};
    use lopdf::dictionary;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            cache_file: Some(temp_dir.path().join("state").join("cache.json")),
            preference_file: Some(temp_dir.path().join("state").join("folder.json")),
            ..Config::default()
        }
    }

    fn setup_session() -> (TempDir, Session) {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("docs");
        fs::create_dir(&folder).unwrap();
        write_pdf(&folder.join("b_signed.pdf"), vec![signature(Some("Bea"))]);
        write_pdf(&folder.join("a_plain.pdf"), vec![dictionary! { "Type" => "Annot" }]);
        write_pdf(&folder.join("c_signed.pdf"), vec![signature(Some("Cid"))]);

        let mut session = Session::open(&test_config(&temp_dir));
        session.select_folder(&folder).unwrap();
        (temp_dir, session)
    }

    fn names(session: &Session) -> Vec<&str> {
        session.entries().iter().map(|e| e.file_name.as_str()).collect()
    }

    fn entry(name: &str, minutes_ago: i64, is_signed: bool) -> DirectoryEntry {
        DirectoryEntry {
            file_name: name.to_string(),
            modified_time: Local::now() - Duration::minutes(minutes_ago),
            is_signed,
            signer: String::new(),
            full_path: PathBuf::from(name),
        }
    }

    #[test]
    fn test_select_folder_is_remembered() {
        let (temp_dir, session) = setup_session();
        let reopened = Session::open(&test_config(&temp_dir));
        assert_eq!(reopened.folder(), session.folder());
        assert_eq!(reopened.folder(), temp_dir.path().join("docs"));
    }

    #[test]
    fn test_default_folder_is_working_directory() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::open(&test_config(&temp_dir));
        assert_eq!(session.folder(), absolute_path(Path::new(".")));
    }

    #[test]
    fn test_sort_by_name_toggles() {
        let (_temp_dir, mut session) = setup_session();
        session.refresh(ListFilter::All);

        assert_eq!(session.sort(SortKey::Name), SortOrder::Descending);
        assert_eq!(names(&session), vec!["c_signed.pdf", "b_signed.pdf", "a_plain.pdf"]);

        assert_eq!(session.sort(SortKey::Name), SortOrder::Ascending);
        assert_eq!(names(&session), vec!["a_plain.pdf", "b_signed.pdf", "c_signed.pdf"]);
    }

    #[test]
    fn test_sort_toggle_state_is_per_key() {
        let (_temp_dir, mut session) = setup_session();
        session.refresh(ListFilter::All);

        assert_eq!(session.sort(SortKey::Name), SortOrder::Descending);
        assert_eq!(session.sort(SortKey::Signed), SortOrder::Descending);
        assert_eq!(session.sort(SortKey::Name), SortOrder::Ascending);
        assert_eq!(session.sort(SortKey::Signed), SortOrder::Ascending);
    }

    #[test]
    fn test_sort_with_sets_toggle_state() {
        let (_temp_dir, mut session) = setup_session();
        session.refresh(ListFilter::All);

        session.sort_with(SortKey::Name, SortOrder::Ascending);
        assert_eq!(names(&session), vec!["a_plain.pdf", "b_signed.pdf", "c_signed.pdf"]);
        assert_eq!(session.sort(SortKey::Name), SortOrder::Descending);
    }

    #[test]
    fn test_refresh_applies_filter() {
        let (_temp_dir, mut session) = setup_session();

        session.refresh(ListFilter::SignedOnly);
        session.sort_with(SortKey::Name, SortOrder::Ascending);
        assert_eq!(names(&session), vec!["b_signed.pdf", "c_signed.pdf"]);

        session.refresh(ListFilter::UnsignedOnly);
        assert_eq!(names(&session), vec!["a_plain.pdf"]);
    }

    #[test]
    fn test_sort_by_signed_label() {
        let mut entries = vec![entry("x", 0, true), entry("y", 0, false), entry("z", 0, true)];

        sort_entries(&mut entries, SortKey::Signed, SortOrder::Ascending);
        let labels: Vec<&str> = entries.iter().map(|e| e.signed_label()).collect();
        assert_eq!(labels, vec!["No", "Yes", "Yes"]);
        // stable: equal keys keep their relative order
        assert_eq!(entries[1].file_name, "x");
        assert_eq!(entries[2].file_name, "z");
    }

    #[test]
    fn test_sort_by_modified() {
        let mut entries = vec![entry("new", 1, false), entry("old", 60, false), entry("mid", 10, false)];

        sort_entries(&mut entries, SortKey::Modified, SortOrder::Ascending);
        let order: Vec<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(order, vec!["old", "mid", "new"]);

        sort_entries(&mut entries, SortKey::Modified, SortOrder::Descending);
        let order: Vec<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_check_and_rescan() {
        let (temp_dir, mut session) = setup_session();
        let doc = temp_dir.path().join("docs").join("a_plain.pdf");

        assert!(!session.check(&doc).is_signed);
        write_pdf(&doc, vec![signature(Some("Eve"))]);
        assert!(!session.check(&doc).is_signed);
        assert_eq!(session.rescan(&doc), DetectionResult::signed(Some("Eve")));
        assert_eq!(session.cache().get(&doc), Some(&DetectionResult::signed(Some("Eve"))));
    }
}
