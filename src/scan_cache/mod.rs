//! Persistent detection cache
//!
//! Remembers the signature detection result of every document ever scanned,
//! keyed by its normalized absolute path, so repeated listings of a folder
//! skip re-parsing. Entries never expire and are not invalidated when the
//! file changes: a hit is served even for a document edited since it was
//! cached. Use [`crate::listing::rescan`] to overwrite a stale entry.

pub mod store;

pub use store::DetectionCache;
