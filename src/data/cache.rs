//! Load-once memoization of enriched datasets.
//!
//! Each snapshot is read and enriched on first use and the same
//! `Arc<ResaleDataset>` is handed out until [`DatasetCache::invalidate`] is
//! called or a source path changes. Snapshots are never written after load.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::error::Result;
use super::loader::{load_combined, load_file};
use super::model::ResaleDataset;

#[derive(Debug)]
pub struct DatasetCache {
    historical_path: PathBuf,
    recent_path: PathBuf,
    recent: Option<Arc<ResaleDataset>>,
    full: Option<Arc<ResaleDataset>>,
}

impl DatasetCache {
    pub fn new(historical_path: impl Into<PathBuf>, recent_path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            historical_path: historical_path.into(),
            recent_path: recent_path.into(),
            recent: None,
            full: None,
        }
    }

    /// The recent dataset only.
    pub fn recent(&mut self) -> Result<Arc<ResaleDataset>> {
        if let Some(ds) = &self.recent {
            return Ok(Arc::clone(ds));
        }
        let started = Instant::now();
        let ds = Arc::new(ResaleDataset::from_raw(load_file(&self.recent_path)?));
        log::info!(
            "Enriched recent snapshot: {} records in {:?}",
            ds.len(),
            started.elapsed()
        );
        self.recent = Some(Arc::clone(&ds));
        Ok(ds)
    }

    /// Historical records followed by recent records.
    pub fn full(&mut self) -> Result<Arc<ResaleDataset>> {
        if let Some(ds) = &self.full {
            return Ok(Arc::clone(ds));
        }
        let started = Instant::now();
        let table = load_combined(&self.historical_path, &self.recent_path)?;
        let ds = Arc::new(ResaleDataset::from_raw(table));
        log::info!(
            "Enriched full snapshot: {} records in {:?}",
            ds.len(),
            started.elapsed()
        );
        self.full = Some(Arc::clone(&ds));
        Ok(ds)
    }

    /// Drop every snapshot; the next call reloads from disk.
    pub fn invalidate(&mut self) {
        self.recent = None;
        self.full = None;
    }

    pub fn set_historical_path(&mut self, path: impl Into<PathBuf>) {
        self.historical_path = path.into();
        self.full = None;
    }

    pub fn set_recent_path(&mut self, path: impl Into<PathBuf>) {
        self.recent_path = path.into();
        self.invalidate();
    }
}
