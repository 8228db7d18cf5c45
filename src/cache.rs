//! # Dataset Cache Module
//!
//! ## Purpose
//! Holds the most recently fetched day's ranked list in memory: at most one
//! dataset at a time, replaced wholesale whenever a new date is loaded.
//!
//! The query engine is the only writer. Readers never trigger a fetch; an
//! absent dataset is a precondition the engine resolves before delegating.

use crate::{Dataset, DateKey};

/// In-memory holder for the current day's dataset
#[derive(Debug, Default)]
pub struct DatasetCache {
    current: Option<Dataset>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached dataset atomically (whole-object swap)
    pub fn replace(&mut self, dataset: Dataset) {
        self.current = Some(dataset);
    }

    /// Drop the cached dataset, returning to the unloaded state
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The currently loaded dataset, if any
    pub fn current(&self) -> Option<&Dataset> {
        self.current.as_ref()
    }

    /// Whether a dataset for the given date is loaded
    pub fn is_loaded_for(&self, date: &DateKey) -> bool {
        self.current
            .as_ref()
            .map(|dataset| &dataset.date == date)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(date: &str) -> Dataset {
        Dataset {
            date: DateKey::parse(date).unwrap(),
            entries: Vec::new(),
        }
    }

    #[test]
    fn test_replace_swaps_whole_dataset() {
        let mut cache = DatasetCache::new();
        assert!(cache.current().is_none());

        cache.replace(dataset("20250613"));
        assert!(cache.is_loaded_for(&DateKey::parse("20250613").unwrap()));

        cache.replace(dataset("20250614"));
        assert!(!cache.is_loaded_for(&DateKey::parse("20250613").unwrap()));
        assert!(cache.is_loaded_for(&DateKey::parse("20250614").unwrap()));
    }

    #[test]
    fn test_clear_returns_to_unloaded() {
        let mut cache = DatasetCache::new();
        cache.replace(dataset("20250614"));
        cache.clear();
        assert!(cache.current().is_none());
    }
}
