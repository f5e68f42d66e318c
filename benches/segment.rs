//! Graph-cut segmentation benchmarks.
//!
//! Benchmarks graph construction and the full build/solve/partition
//! pipeline on synthetic two-region images.
//!
//! Run: cargo bench --bench segment

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use graphcut_rust::segmentation::{pixel_id, segment, CapacityGraph, RgbImage};
use graphcut_rust::{Connectivity, SegmentationConfig};

/// Disc of one color on a noisy background of another.
fn disc_image(size: usize, seed: u64) -> RgbImage {
    let mut state = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let center = size as f64 / 2.0;
    let radius = size as f64 / 3.0;

    let mut data = Vec::with_capacity(size * size * 3);
    for y in 0..size {
        for x in 0..size {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let noise = ((state >> 33) % 12) as u8;
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let base = if (dx * dx + dy * dy).sqrt() < radius { 200u8 } else { 40u8 };
            data.extend_from_slice(&[base + noise, base / 2 + noise, base / 3 + noise]);
        }
    }
    RgbImage::from_raw(&data, size, size, 3).expect("valid benchmark image")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    for &size in &[32usize, 64, 128] {
        let image = disc_image(size, 7);
        group.throughput(Throughput::Elements((size * size) as u64));
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let config = SegmentationConfig::with_connectivity(connectivity);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", connectivity), size),
                &image,
                |b, image| b.iter(|| CapacityGraph::from_image(black_box(image), None, &config)),
            );
        }
    }
    group.finish();
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    group.sample_size(10);
    for &size in &[16usize, 32, 48] {
        let image = disc_image(size, 11);
        let center = size / 2;
        let source = vec![pixel_id(center, center, size), pixel_id(center + 1, center, size)];
        let sink = vec![pixel_id(0, 0, size), pixel_id(size - 1, size - 1, size)];
        let config = SegmentationConfig::default();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| segment(black_box(image), None, &source, &sink, &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_segment);
criterion_main!(benches);
