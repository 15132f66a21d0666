//! Persisted manifestation history.
//!
//! A single JSON file holds an ordered list of past desires, newest first,
//! capped at a configured size. Entries are never deleted individually; only
//! the cap evicts them.

use crate::error::HistoryError;
use crate::manifestation::HistoryEntry;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CAP: usize = 10;

pub struct HistoryStore {
    path: PathBuf,
    cap: usize,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Open the store at `path`, loading whatever is already persisted. A
    /// missing or unreadable file starts the history empty rather than
    /// failing the whole app.
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "history file corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { path, cap, entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prepend `entry`, evict past the cap, and persist the updated list.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.entries.insert(0, entry);
        self.entries.truncate(self.cap);
        self.save()
    }

    fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            id: format!("id-{n}"),
            desire: format!("desire {n}"),
            date: "8/29/2026".into(),
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.json"), DEFAULT_CAP);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{{{not json").unwrap();
        let store = HistoryStore::open(&path, DEFAULT_CAP);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn newest_entry_goes_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().join("history.json"), DEFAULT_CAP);
        store.record(entry(1)).unwrap();
        store.record(entry(2)).unwrap();
        assert_eq!(store.entries()[0].id, "id-2");
        assert_eq!(store.entries()[1].id, "id-1");
    }

    #[test]
    fn eleventh_entry_evicts_the_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().join("history.json"), DEFAULT_CAP);
        for n in 1..=11 {
            store.record(entry(n)).unwrap();
        }
        assert_eq!(store.entries().len(), 10);
        assert_eq!(store.entries()[0].id, "id-11");
        assert!(!store.entries().iter().any(|e| e.id == "id-1"));
    }

    #[test]
    fn persisted_list_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut store = HistoryStore::open(&path, DEFAULT_CAP);
        for n in 1..=4 {
            store.record(entry(n)).unwrap();
        }
        let expected = store.entries().to_vec();

        let reloaded = HistoryStore::open(&path, DEFAULT_CAP);
        assert_eq!(reloaded.entries(), expected.as_slice());
    }
}
