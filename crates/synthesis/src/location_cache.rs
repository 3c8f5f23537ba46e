//! In-memory cache of tilings keyed by micro-area.
//!
//! ## Keying
//! Entries are keyed by `microarea_id` alone. A request for a cached id
//! returns the stored geometry even if it passes a different bounding box;
//! callers must keep one bbox per id.
//!
//! ## Lifetime
//! No eviction and no TTL: the cache grows with the number of distinct
//! micro-areas and lives as long as its owner. Construct one per process and
//! share it behind an `Arc`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use sat_common::{BoundingBox, CellCentroid, GridSpec, SatResult};

use crate::tiler::GridTiler;

/// A stored tiling plus the bounding box it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedTiling {
    pub cells: Vec<CellCentroid>,
    pub grid: GridSpec,
    pub bbox: BoundingBox,
}

impl CachedTiling {
    pub fn n_cols(&self) -> usize {
        self.grid.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.grid.n_rows
    }
}

/// Statistics for the location cache.
#[derive(Debug, Default)]
pub struct LocationCacheStats {
    /// Lookups answered from the cache.
    pub hits: AtomicU64,
    /// Lookups that had to tile.
    pub misses: AtomicU64,
    /// Hits whose bbox differed from the stored one.
    pub bbox_mismatches: AtomicU64,
}

impl LocationCacheStats {
    /// Calculate cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// Memoizes [`GridTiler`] output per micro-area id.
pub struct LocationCache {
    tiler: GridTiler,
    entries: RwLock<HashMap<String, Arc<CachedTiling>>>,
    stats: LocationCacheStats,
}

impl LocationCache {
    pub fn new(tiler: GridTiler) -> Self {
        info!(max_area_km2 = tiler.max_area_km2(), "LocationCache initialized");

        Self {
            tiler,
            entries: RwLock::new(HashMap::new()),
            stats: LocationCacheStats::default(),
        }
    }

    /// Return the tiling for `microarea_id`, computing it on first access.
    ///
    /// Concurrent first accesses for the same id tile once: the miss path
    /// re-checks under the write lock before inserting.
    pub async fn get_or_compute(
        &self,
        microarea_id: &str,
        bbox: &BoundingBox,
    ) -> SatResult<Arc<CachedTiling>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(microarea_id) {
                self.record_hit(microarea_id, entry, bbox);
                return Ok(Arc::clone(entry));
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(microarea_id) {
            self.record_hit(microarea_id, entry, bbox);
            return Ok(Arc::clone(entry));
        }

        let tiling = self.tiler.tile(bbox)?;
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        info!(
            microarea_id,
            n_cols = tiling.n_cols(),
            n_rows = tiling.n_rows(),
            cells = tiling.cells.len(),
            "Tiled micro-area"
        );

        let entry = Arc::new(CachedTiling {
            cells: tiling.cells,
            grid: tiling.grid,
            bbox: *bbox,
        });
        entries.insert(microarea_id.to_string(), Arc::clone(&entry));

        Ok(entry)
    }

    fn record_hit(&self, microarea_id: &str, entry: &CachedTiling, bbox: &BoundingBox) {
        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        if entry.bbox != *bbox {
            self.stats.bbox_mismatches.fetch_add(1, Ordering::Relaxed);
            debug!(
                microarea_id,
                cached = ?entry.bbox.to_array(),
                requested = ?bbox.to_array(),
                "Returning cached tiling for a different bbox"
            );
        }
    }

    /// Number of cached micro-areas.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn stats(&self) -> &LocationCacheStats {
        &self.stats
    }
}

impl Default for LocationCache {
    fn default() -> Self {
        Self::new(GridTiler::default())
    }
}
