//! Producer configuration.
//!
//! Loaded from a YAML file (with `${VAR}` substitution) or, without one,
//! from environment variables and built-in defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

use imaging::DEFAULT_JPEG_QUALITY;
use sat_common::BoundingBox;
use storage::object_store::normalize_endpoint;
use storage::ObjectStorageConfig;
use synthesis::DEFAULT_MAX_AREA_KM2;

/// A micro-area to produce imagery for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaConfig {
    pub macroarea_id: String,
    pub microarea_id: String,
    /// `[min_long, min_lat, max_long, max_lat]`
    pub bbox: Vec<f64>,
}

/// Top-level producer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Object storage configuration
    pub storage: ObjectStorageConfig,

    /// Areas processed every cycle
    pub areas: Vec<AreaConfig>,

    /// Upper bound on a tiled cell's area
    pub max_area_km2: f64,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// Side length in pixels of one cell in the rendered scene
    pub pixels_per_cell: u32,

    /// Pause between cycles (seconds)
    pub interval_secs: u64,

    /// Areas processed concurrently
    pub concurrency: usize,

    /// Base seed for reproducible output; entropy when unset
    pub seed: Option<u64>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            storage: ObjectStorageConfig::default(),
            areas: default_areas(),
            max_area_km2: DEFAULT_MAX_AREA_KM2,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            pixels_per_cell: 8,
            interval_secs: 60,
            concurrency: 4,
            seed: None,
        }
    }
}

fn default_areas() -> Vec<AreaConfig> {
    vec![
        AreaConfig {
            macroarea_id: "adriatic".to_string(),
            microarea_id: "rimini_01".to_string(),
            bbox: vec![12.0, 44.0, 12.5, 44.3],
        },
        AreaConfig {
            macroarea_id: "adriatic".to_string(),
            microarea_id: "venice_01".to_string(),
            bbox: vec![12.2, 45.2, 12.6, 45.5],
        },
    ]
}

impl ProducerConfig {
    /// Load configuration from a YAML file.
    ///
    /// A storage endpoint given as bare `host:port` gets an `http://` prefix,
    /// as with `MINIO_ENDPOINT`.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let expanded = shellexpand::env(&raw)
            .with_context(|| format!("Failed to expand variables in {}", path.display()))?;

        let mut config: Self = serde_yaml::from_str(&expanded)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.storage.endpoint = normalize_endpoint(&config.storage.endpoint);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            storage: ObjectStorageConfig::from_env(),
            areas: defaults.areas,
            max_area_km2: parse_env("PRODUCER_MAX_AREA_KM2")?.unwrap_or(defaults.max_area_km2),
            jpeg_quality: parse_env("JPEG_QUALITY")?.unwrap_or(defaults.jpeg_quality),
            pixels_per_cell: parse_env("PRODUCER_PIXELS_PER_CELL")?
                .unwrap_or(defaults.pixels_per_cell),
            interval_secs: parse_env("PRODUCER_INTERVAL_SECS")?.unwrap_or(defaults.interval_secs),
            concurrency: parse_env("PRODUCER_CONCURRENCY")?.unwrap_or(defaults.concurrency),
            seed: parse_env("PRODUCER_SEED")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.areas.is_empty() {
            bail!("At least one area must be configured");
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!("jpeg_quality must be in [1, 100], got {}", self.jpeg_quality);
        }
        if !self.max_area_km2.is_finite() || self.max_area_km2 <= 0.0 {
            bail!("max_area_km2 must be positive, got {}", self.max_area_km2);
        }
        if self.pixels_per_cell == 0 {
            bail!("pixels_per_cell must be at least 1");
        }
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }

        let mut seen: HashMap<&str, &[f64]> = HashMap::new();
        for area in &self.areas {
            BoundingBox::from_slice(&area.bbox).with_context(|| {
                format!(
                    "Invalid bbox for area {}/{}",
                    area.macroarea_id, area.microarea_id
                )
            })?;

            match seen.get(area.microarea_id.as_str()) {
                Some(previous) if *previous != area.bbox.as_slice() => {
                    // Tilings are cached by id; the later bbox would be ignored.
                    warn!(
                        microarea_id = %area.microarea_id,
                        "Micro-area configured twice with different bboxes; the first one wins"
                    );
                }
                Some(_) => {}
                None => {
                    seen.insert(&area.microarea_id, &area.bbox);
                }
            }
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(None),
    }
}
