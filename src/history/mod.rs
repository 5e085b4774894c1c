//! Version history for estimates.
//!
//! A version is a snapshot of every line item's pricing fields, taken before
//! a batch operation rewrites them. Versions are persisted through the
//! estimate store and mirrored in a bounded in-memory list for quick undo.

mod versions;

pub use versions::{EstimateVersion, LineSnapshot, VersionHistory};
