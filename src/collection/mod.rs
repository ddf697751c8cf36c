//! On-disk collection file.
//!
//! The whole collection lives in one JSON array. Every write replaces the
//! file atomically (temporary file + fsync + rename), so readers see either
//! the previous or the next complete collection.

mod file;

pub use file::CollectionFile;
