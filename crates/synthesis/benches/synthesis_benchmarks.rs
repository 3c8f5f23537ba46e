//! Benchmarks for tiling and synthetic reading generation.
//!
//! Run with: cargo bench --package synthesis --bench synthesis_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sat_common::BoundingBox;
use synthesis::{GridTiler, ReadingSource, SyntheticMeasurementGenerator};

fn bench_tiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling");
    let bbox = BoundingBox::new(12.0, 44.0, 13.0, 45.0).unwrap();

    for max_area in [100.0, 20.0, 5.0, 1.0] {
        let tiler = GridTiler::new(max_area).unwrap();
        let cells = tiler.tile(&bbox).unwrap().cells.len();
        group.throughput(Throughput::Elements(cells as u64));
        group.bench_with_input(BenchmarkId::new("tile", max_area), &tiler, |b, tiler| {
            b.iter(|| tiler.tile(black_box(&bbox)).unwrap())
        });
    }
    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let bbox = BoundingBox::new(12.0, 44.0, 13.0, 45.0).unwrap();
    let tiling = GridTiler::default().tile(&bbox).unwrap();
    let mut generator = SyntheticMeasurementGenerator::new(StdRng::seed_from_u64(0));

    group.throughput(Throughput::Elements(tiling.cells.len() as u64));
    group.bench_function("readings_per_tiling", |b| {
        b.iter(|| {
            tiling
                .cells
                .iter()
                .filter_map(|cell| generator.reading(black_box(cell), "bench").ok())
                .count()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_tiling, bench_generation);
criterion_main!(benches);
