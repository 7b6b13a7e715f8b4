//! Narrow storage seam for the save record.
//!
//! Any durable key-value medium satisfies [`SaveStore`]: it reads, writes,
//! and clears exactly one named record. Presence or absence of the record is
//! the sole signal of "a resumable game exists".

use std::io;
use std::path::{Path, PathBuf};

/// The single well-known key the save record lives under.
pub const SAVE_KEY: &str = "klondike.save";

/// Read/write/clear over one named record.
pub trait SaveStore {
    /// The record text, or `None` when no saved game exists. Absence is a
    /// normal outcome, not an error.
    fn read(&self) -> Option<String>;

    /// Replace the record. The caller treats failures as fire-and-forget.
    fn write(&mut self, record: &str) -> io::Result<()>;

    /// Remove the record, if present.
    fn clear(&mut self);
}

/// In-memory store, for tests and embedding hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.record.clone()
    }

    fn write(&mut self, record: &str) -> io::Result<()> {
        self.record = Some(record.to_string());
        Ok(())
    }

    fn clear(&mut self) {
        self.record = None;
    }
}

/// File-backed store: one file named [`SAVE_KEY`] in a directory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store the record as `dir/klondike.save`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SAVE_KEY),
        }
    }

    /// The file the record lives in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&mut self, record: &str) -> io::Result<()> {
        std::fs::write(&self.path, record)
    }

    fn clear(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read(), None);

        store.write("{}").unwrap();
        assert_eq!(store.read(), Some("{}".to_string()));

        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert_eq!(store.read(), None);

        store.write(r#"{"move_count":3}"#).unwrap();
        assert_eq!(store.read(), Some(r#"{"move_count":3}"#.to_string()));
        assert!(store.path().ends_with(SAVE_KEY));

        store.clear();
        assert_eq!(store.read(), None);
        store.clear(); // clearing an absent record is fine
    }
}
