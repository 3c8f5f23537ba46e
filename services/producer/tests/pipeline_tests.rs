//! End-to-end tests for the producer pipeline against in-memory storage.

use std::io::Write as _;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::SeedableRng;

use producer::{AreaConfig, FileSink, PayloadSink, ProducerConfig, ProducerPipeline};
use sat_common::{ImagePayload, Label, SatError, SatResult};
use storage::{BlobStore, ObjectStorage, StoragePath};
use test_utils::fixtures::{area, bbox};

// ============================================================================
// Helper types
// ============================================================================

/// Collects emitted payloads in memory.
#[derive(Clone, Default)]
struct CollectingSink {
    payloads: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    fn payloads(&self) -> Vec<ImagePayload> {
        self.payloads
            .lock()
            .unwrap()
            .iter()
            .map(|p| ImagePayload::from_json(p).unwrap())
            .collect()
    }
}

impl PayloadSink for CollectingSink {
    fn emit(&self, payload: &str) -> anyhow::Result<()> {
        self.payloads.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

/// Rejects writes whose key mentions a given micro-area.
struct SelectiveFailStore {
    inner: ObjectStorage,
    reject: &'static str,
}

#[async_trait]
impl BlobStore for SelectiveFailStore {
    async fn put(&self, key: &str, data: Bytes) -> SatResult<()> {
        if key.contains(self.reject) {
            return Err(SatError::StorageWrite("bucket unavailable".to_string()));
        }
        self.inner.put(key, data).await
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }
}

fn area_config(microarea_id: &str, bbox: [f64; 4]) -> AreaConfig {
    AreaConfig {
        macroarea_id: area::MACROAREA.to_string(),
        microarea_id: microarea_id.to_string(),
        bbox: bbox.to_vec(),
    }
}

fn test_config(areas: Vec<AreaConfig>, seed: Option<u64>) -> ProducerConfig {
    ProducerConfig {
        areas,
        seed,
        pixels_per_cell: 4,
        ..Default::default()
    }
}

// ============================================================================
// Single cycle
// ============================================================================

#[tokio::test]
async fn test_cycle_uploads_and_emits_every_area() {
    let storage = Arc::new(ObjectStorage::in_memory("bronze"));
    let sink = CollectingSink::default();
    let config = test_config(
        vec![
            area_config(area::MICROAREA, bbox::ADRIATIC),
            area_config(area::OTHER_MICROAREA, bbox::EQUATOR_SMALL),
        ],
        Some(7),
    );

    let pipeline =
        ProducerPipeline::new(config, storage.clone(), Box::new(sink.clone())).unwrap();
    let summary = pipeline.run_cycle().await;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 2);

    for payload in &payloads {
        assert!(payload.image_pointer.starts_with(StoragePath::IMAGERY_PREFIX));
        assert!(payload.image_pointer.ends_with(".jpg"));
        assert!(storage.exists(&payload.image_pointer).await.unwrap());

        let image = storage.get(&payload.image_pointer).await.unwrap();
        assert_eq!(&image[..2], &[0xFF, 0xD8]);
    }

    let rimini = payloads
        .iter()
        .find(|p| p.metadata.microarea_id == area::MICROAREA)
        .unwrap();
    assert_eq!(rimini.metadata.satellite_data.len(), 72);
    assert_eq!(rimini.metadata.macroarea_id, area::MACROAREA);
    assert_ne!(payloads[0].image_pointer, payloads[1].image_pointer);
}

#[tokio::test]
async fn test_failing_area_does_not_stop_others() {
    let store = SelectiveFailStore {
        inner: ObjectStorage::in_memory("bronze"),
        reject: area::OTHER_MICROAREA,
    };
    let sink = CollectingSink::default();
    let config = test_config(
        vec![
            area_config(area::MICROAREA, bbox::ADRIATIC),
            area_config(area::OTHER_MICROAREA, bbox::EQUATOR_SMALL),
        ],
        Some(7),
    );

    let pipeline = ProducerPipeline::new(config, Arc::new(store), Box::new(sink.clone())).unwrap();
    let summary = pipeline.run_cycle().await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].metadata.microarea_id, area::MICROAREA);
}

#[tokio::test]
async fn test_produce_area_reports_storage_error() {
    let store = SelectiveFailStore {
        inner: ObjectStorage::in_memory("bronze"),
        reject: area::MICROAREA,
    };
    let config = test_config(vec![area_config(area::MICROAREA, bbox::ADRIATIC)], None);
    let pipeline = ProducerPipeline::new(
        config.clone(),
        Arc::new(store),
        Box::new(CollectingSink::default()),
    )
    .unwrap();

    let err = pipeline
        .produce_area(&config.areas[0], StdRng::seed_from_u64(1))
        .await
        .unwrap_err();
    assert!(matches!(err, SatError::StorageWrite(_)));
}

// ============================================================================
// Reproducibility and caching
// ============================================================================

#[tokio::test]
async fn test_seeded_cycles_are_reproducible() {
    let mut runs = Vec::new();
    for _ in 0..2 {
        let sink = CollectingSink::default();
        let config = test_config(vec![area_config(area::MICROAREA, bbox::ADRIATIC)], Some(42));
        let pipeline = ProducerPipeline::new(
            config,
            Arc::new(ObjectStorage::in_memory("bronze")),
            Box::new(sink.clone()),
        )
        .unwrap();
        pipeline.run_cycle().await;
        runs.push(sink.payloads().remove(0));
    }

    assert_eq!(
        runs[0].metadata.satellite_data,
        runs[1].metadata.satellite_data
    );
    // Keys carry a random suffix even when readings repeat
    assert_ne!(runs[0].image_pointer, runs[1].image_pointer);
}

#[tokio::test]
async fn test_consecutive_cycles_reuse_tiling_with_fresh_readings() {
    let sink = CollectingSink::default();
    let config = test_config(vec![area_config(area::MICROAREA, bbox::ADRIATIC)], Some(42));
    let pipeline = ProducerPipeline::new(
        config,
        Arc::new(ObjectStorage::in_memory("bronze")),
        Box::new(sink.clone()),
    )
    .unwrap();

    pipeline.run_cycle().await;
    pipeline.run_cycle().await;

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 2);

    let first = &payloads[0].metadata.satellite_data;
    let second = &payloads[1].metadata.satellite_data;
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second) {
        assert_eq!(a.latitude, b.latitude);
        assert_eq!(a.longitude, b.longitude);
    }
    assert_ne!(first, second);

    let stats = pipeline.assembler().cache().stats();
    assert_eq!(stats.misses.load(Ordering::Relaxed), 1);
    assert_eq!(stats.hits.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_polluted_readings_come_from_center_cell() {
    let sink = CollectingSink::default();
    let config = test_config(vec![area_config(area::MICROAREA, bbox::EQUATOR_SMALL)], Some(3));
    let pipeline = ProducerPipeline::new(
        config,
        Arc::new(ObjectStorage::in_memory("bronze")),
        Box::new(sink.clone()),
    )
    .unwrap();
    pipeline.run_cycle().await;

    let cache = pipeline.assembler().cache();
    let tiling = cache
        .get_or_compute(
            area::MICROAREA,
            &sat_common::BoundingBox::from_slice(&bbox::EQUATOR_SMALL).unwrap(),
        )
        .await
        .unwrap();
    let polluted: Vec<_> = tiling
        .cells
        .iter()
        .filter(|c| c.label == Label::Polluted)
        .collect();
    assert_eq!(polluted.len(), 1);

    let payload = sink.payloads().remove(0);
    assert_eq!(payload.metadata.satellite_data.len(), 9);
}

// ============================================================================
// Sinks and configuration
// ============================================================================

#[tokio::test]
async fn test_file_sink_appends_one_line_per_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payloads.jsonl");

    let config = test_config(
        vec![
            area_config(area::MICROAREA, bbox::ADRIATIC),
            area_config(area::OTHER_MICROAREA, bbox::EQUATOR_SMALL),
        ],
        Some(11),
    );
    let pipeline = ProducerPipeline::new(
        config,
        Arc::new(ObjectStorage::in_memory("bronze")),
        Box::new(FileSink::open(&path).unwrap()),
    )
    .unwrap();
    pipeline.run_cycle().await;

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let payload = ImagePayload::from_json(line).unwrap();
        assert_eq!(payload.metadata.macroarea_id, area::MACROAREA);
    }
}

#[test]
fn test_yaml_config_expands_environment_variables() {
    std::env::set_var("PRODUCER_TEST_BUCKET", "silver");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
storage:
  bucket: ${{PRODUCER_TEST_BUCKET}}
areas:
  - macroarea_id: adriatic
    microarea_id: rimini_01
    bbox: [12.0, 44.0, 12.5, 44.3]
max_area_km2: 10.0
jpeg_quality: 70
seed: 5
"#
    )
    .unwrap();

    let config = ProducerConfig::from_yaml(file.path()).unwrap();
    assert_eq!(config.storage.bucket, "silver");
    assert_eq!(config.areas.len(), 1);
    assert_eq!(config.areas[0].bbox, vec![12.0, 44.0, 12.5, 44.3]);
    assert_eq!(config.max_area_km2, 10.0);
    assert_eq!(config.jpeg_quality, 70);
    assert_eq!(config.seed, Some(5));
    // Unset keys fall back to defaults
    assert_eq!(config.concurrency, 4);
}

#[test]
fn test_yaml_config_adds_scheme_to_bare_endpoint() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
storage:
  endpoint: minio:9000
"#
    )
    .unwrap();

    let config = ProducerConfig::from_yaml(file.path()).unwrap();
    assert_eq!(config.storage.endpoint, "http://minio:9000");
}

#[test]
fn test_yaml_config_keeps_explicit_https_endpoint() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
storage:
  endpoint: https://s3.eu-south-1.amazonaws.com
"#
    )
    .unwrap();

    let config = ProducerConfig::from_yaml(file.path()).unwrap();
    assert_eq!(config.storage.endpoint, "https://s3.eu-south-1.amazonaws.com");
}

#[test]
fn test_yaml_config_rejects_invalid_bbox() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
areas:
  - macroarea_id: adriatic
    microarea_id: broken
    bbox: [10.0, 10.0, 5.0, 5.0]
"#
    )
    .unwrap();

    assert!(ProducerConfig::from_yaml(file.path()).is_err());
}

#[test]
fn test_pipeline_rejects_invalid_config() {
    let config = ProducerConfig {
        concurrency: 0,
        ..Default::default()
    };
    let result = ProducerPipeline::new(
        config,
        Arc::new(ObjectStorage::in_memory("bronze")),
        Box::new(CollectingSink::default()),
    );
    assert!(result.is_err());
}

#[test]
fn test_shipped_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/producer.yaml");
    let config = ProducerConfig::from_yaml(path).unwrap();
    assert_eq!(config.areas.len(), 3);
    assert!(config.storage.endpoint.starts_with("http"));
    assert!(config
        .areas
        .iter()
        .any(|a| a.microarea_id == area::MICROAREA));
}
