//! Versioned JSON store for rendered plots.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use chanwatch_types::{MetricPlot, StoreVersion};

use crate::error::StoreError;

/// On-disk collection of plots keyed by resolved name.
///
/// The store is a single JSON document. Updates rewrite the whole file;
/// entries not touched by the current call are preserved, and an entry
/// written under an existing name replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotStore {
    /// Schema version stamp.
    pub version: StoreVersion,
    /// Stored plots keyed by resolved name.
    #[serde(default)]
    pub plots: BTreeMap<String, MetricPlot>,
}

impl Default for PlotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotStore {
    /// Empty store stamped with the current schema version.
    pub fn new() -> Self {
        Self {
            version: StoreVersion::current(),
            plots: BTreeMap::new(),
        }
    }

    /// Load a store from disk; a missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = fs::read_to_string(path)?;
        let store: PlotStore = serde_json::from_str(&text)?;
        if !store.version.is_compatible() {
            return Err(StoreError::Version {
                path: path.display().to_string(),
            });
        }
        Ok(store)
    }

    /// Write the store to disk, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Insert or replace a plot under its resolved name.
    pub fn upsert(&mut self, plot: MetricPlot) {
        self.plots.insert(plot.name.clone(), plot);
    }

    /// Number of stored plots.
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    /// Whether the store holds no plots.
    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    /// Load a store, upsert the given plots, and save it back.
    pub fn update_file(path: &Path, plots: &[MetricPlot]) -> Result<(), StoreError> {
        let mut store = Self::load(path)?;
        for plot in plots {
            store.upsert(plot.clone());
        }
        store.save(path)
    }
}
