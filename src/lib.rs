//! sigscan library crate
//!
//! Detects digital signature dictionaries in PDF documents and caches the
//! results per file. The `sigscan` binary is a thin front end over this API.

pub mod cli;
pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod output;
pub mod persist;
pub mod preference;
pub mod progress;
pub mod scan_cache;
pub mod scanner;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use error::ScanError;
pub use listing::{list_directory, DirectoryEntry, ListFilter};
pub use scan_cache::DetectionCache;
pub use scanner::{scan, DetectionMode, DetectionResult, Scanner};
pub use session::{Session, SortKey, SortOrder};
