//! Whole-file JSON persistence shared by the cache and the folder preference

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Replace `path` with the JSON form of `value`.
///
/// Writes a sibling temp file and renames it over the target so a crash
/// leaves either the previous snapshot or the new one, never a torn file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let temp_path = temp_path_for(path);
    {
        let file = File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .with_context(|| format!("Failed to serialize to {}", temp_path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", temp_path.display()))?;
        writer
            .get_ref()
            .sync_all()
            .with_context(|| format!("Failed to sync {}", temp_path.display()))?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Sibling temp file: the full file name plus `.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a JSON file written by [`write_json_atomic`]
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("state.json");

        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1);
        write_json_atomic(&path, &value).unwrap();

        let loaded: BTreeMap<String, i32> = read_json(&path).unwrap();
        assert_eq!(loaded, value);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_replaces_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        write_json_atomic(&path, &vec![1, 2, 3]).unwrap();
        write_json_atomic(&path, &vec![4]).unwrap();

        let loaded: Vec<i32> = read_json(&path).unwrap();
        assert_eq!(loaded, vec![4]);
    }

    #[test]
    fn test_temp_path_keeps_full_file_name() {
        let dir = Path::new("/srv/state");
        assert_eq!(temp_path_for(&dir.join("x.json")), dir.join("x.json.tmp"));
        assert_eq!(temp_path_for(&dir.join("x.txt")), dir.join("x.txt.tmp"));
        assert_ne!(temp_path_for(&dir.join("x.json")), temp_path_for(&dir.join("x.txt")));
    }

    #[test]
    fn test_same_stem_files_do_not_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let json = temp_dir.path().join("state.json");
        let txt = temp_dir.path().join("state.txt");

        write_json_atomic(&json, &vec![1]).unwrap();
        write_json_atomic(&txt, &vec![2]).unwrap();

        assert_eq!(read_json::<Vec<i32>>(&json).unwrap(), vec![1]);
        assert_eq!(read_json::<Vec<i32>>(&txt).unwrap(), vec![2]);
    }

    #[test]
    fn test_read_garbage_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(read_json::<Vec<i32>>(&path).is_err());
    }
}
