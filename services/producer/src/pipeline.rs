//! Production pipeline: tile, synthesize, render, upload, emit.

use anyhow::Result;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use imaging::{encode_jpeg, render_label_raster};
use sat_common::SatResult;
use storage::BlobStore;
use synthesis::{GridTiler, LocationCache, MetadataAssembler, SyntheticMeasurementGenerator};

use crate::config::{AreaConfig, ProducerConfig};
use crate::sink::PayloadSink;

/// Outcome of one pass over all configured areas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives the assembler for every configured area.
pub struct ProducerPipeline {
    config: ProducerConfig,
    assembler: MetadataAssembler,
    sink: Box<dyn PayloadSink>,
    cycles: AtomicU64,
}

impl ProducerPipeline {
    /// Create a pipeline writing images to `store` and payloads to `sink`.
    pub fn new(
        config: ProducerConfig,
        store: Arc<dyn BlobStore>,
        sink: Box<dyn PayloadSink>,
    ) -> Result<Self> {
        config.validate()?;
        let tiler = GridTiler::new(config.max_area_km2)?;
        let cache = Arc::new(LocationCache::new(tiler));

        Ok(Self {
            config,
            assembler: MetadataAssembler::new(cache, store),
            sink,
            cycles: AtomicU64::new(0),
        })
    }

    pub fn assembler(&self) -> &MetadataAssembler {
        &self.assembler
    }

    /// Run cycles forever, sleeping `interval_secs` between them.
    pub async fn run_forever(&self) -> Result<()> {
        loop {
            let summary = self.run_cycle().await;
            if summary.succeeded == 0 && summary.failed > 0 {
                error!("Every area failed this cycle");
            }

            info!(
                interval_secs = self.config.interval_secs,
                "Sleeping until next cycle"
            );
            tokio::time::sleep(Duration::from_secs(self.config.interval_secs)).await;
        }
    }

    /// Produce and emit one payload per configured area.
    ///
    /// A failing area is logged and counted; the others still run.
    pub async fn run_cycle(&self) -> CycleSummary {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed);
        info!(cycle, areas = self.config.areas.len(), "Starting production cycle");

        let results: Vec<(&AreaConfig, Result<String>)> =
            stream::iter(self.config.areas.iter().enumerate())
                .map(|(index, area)| async move {
                    let result = self
                        .produce_area(area, self.area_rng(cycle, index))
                        .await
                        .map_err(anyhow::Error::from);
                    (area, result)
                })
                .buffer_unordered(self.config.concurrency)
                .collect()
                .await;

        let mut summary = CycleSummary::default();
        for (area, result) in results {
            match result.and_then(|payload| self.sink.emit(&payload)) {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        macroarea_id = %area.macroarea_id,
                        microarea_id = %area.microarea_id,
                        error = %e,
                        "Area production failed"
                    );
                }
            }
        }

        info!(
            cycle,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Production cycle complete"
        );
        summary
    }

    /// Seeded per area and cycle when a base seed is configured.
    fn area_rng(&self, cycle: u64, index: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(area_seed(
                seed,
                cycle,
                self.config.areas.len(),
                index,
            )),
            None => StdRng::from_entropy(),
        }
    }

    /// Build metadata, render and upload the scene, return the payload JSON.
    #[instrument(skip(self, area, rng), fields(macroarea_id = %area.macroarea_id, microarea_id = %area.microarea_id))]
    pub async fn produce_area(&self, area: &AreaConfig, rng: StdRng) -> SatResult<String> {
        let mut generator = SyntheticMeasurementGenerator::new(rng);
        let built = self
            .assembler
            .build(
                &area.bbox,
                &area.microarea_id,
                &area.macroarea_id,
                &mut generator,
            )
            .await?;

        let mut rng = generator.into_inner();
        let raster = render_label_raster(
            &built.tiling.cells,
            built.n_cols,
            built.n_rows,
            self.config.pixels_per_cell,
            &mut rng,
        )?;
        let jpeg = encode_jpeg(&raster, self.config.jpeg_quality)?;

        self.assembler
            .assemble_payload(
                Bytes::from(jpeg),
                built.metadata,
                &area.macroarea_id,
                &area.microarea_id,
            )
            .await
    }
}

/// Seed for area `index` in cycle `cycle`: `seed + cycle * n_areas + index`, wrapping.
fn area_seed(seed: u64, cycle: u64, n_areas: usize, index: usize) -> u64 {
    seed.wrapping_add(
        cycle
            .wrapping_mul(n_areas as u64)
            .wrapping_add(index as u64),
    )
}
