//! Last-used folder, remembered across runs

use crate::persist;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
struct PreferenceFile {
    last_folder: Option<String>,
}

/// Persisted folder preference (`{ "last_folder": "..." }`)
#[derive(Debug, Clone)]
pub struct FolderPreference {
    path: PathBuf,
    last_folder: Option<PathBuf>,
}

impl FolderPreference {
    /// Load the preference stored at `path`; missing or corrupt files mean no prior folder
    pub fn load(path: &Path) -> Self {
        let last_folder = if path.exists() {
            match persist::read_json::<PreferenceFile>(path) {
                Ok(file) => file.last_folder.filter(|f| !f.is_empty()).map(PathBuf::from),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable folder preference");
                    None
                }
            }
        } else {
            None
        };

        Self {
            path: path.to_path_buf(),
            last_folder,
        }
    }

    pub fn last_folder(&self) -> Option<&Path> {
        self.last_folder.as_deref()
    }

    /// Remember `folder` and overwrite the stored preference
    pub fn save(&mut self, folder: &Path) -> Result<()> {
        self.last_folder = Some(folder.to_path_buf());
        let file = PreferenceFile {
            last_folder: Some(folder.to_string_lossy().into_owned()),
        };
        persist::write_json_atomic(&self.path, &file)
    }
}
