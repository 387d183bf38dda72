//! Error types for document inspection

use std::path::PathBuf;
use thiserror::Error;

/// Why a document could not be inspected.
///
/// Never crosses the scanner boundary: [`crate::scanner::Scanner::scan`]
/// downgrades every variant to a negative detection result.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
}

impl ScanError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ScanError::Io { path, .. } | ScanError::Parse { path, .. } => path,
        }
    }
}
