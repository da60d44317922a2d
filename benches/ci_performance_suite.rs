//! CI Performance Suite - performance regression testing for CI/CD
//!
//! Covers the paths that dominate real workloads:
//!
//! 1. Bulk construction from uniform random points at several scales
//! 2. Construction from a regular grid (maximally cocircular input)
//! 3. Single insertions into an already large triangulation
//! 4. Convex hull of the resulting vertex set
//!
//! Inputs are generated from fixed seeds outside the measured loop so that
//! only triangulation work is timed.
//!
//! Set `PLANAR_DELAUNAY_BENCH_LOG=1` to route `tracing` events to stderr
//! (filtered by `RUST_LOG`, default `warn`).

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use planar_delaunay::geometry::util::{
    Bounds, generate_grid_points, generate_random_points_in_bounds,
};
use planar_delaunay::prelude::{DelaunayTriangulation, Point, convex_hull};
use std::hint::black_box;
use tracing::error;

/// Point counts for the construction benchmarks.
const COUNTS: &[usize] = &[1_000, 10_000, 50_000];

/// Side of the square every benchmark triangulates.
const SIDE: f64 = 1_000.0;

/// Fixed base seed; each count adds itself so the inputs are uncorrelated.
const SEED: u64 = 0x5EED;

fn bench_logging_enabled() -> bool {
    std::env::var("PLANAR_DELAUNAY_BENCH_LOG")
        .map(|value| value != "0")
        .unwrap_or(false)
}

fn init_bench_logging() {
    if bench_logging_enabled() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

fn corners() -> (Point, Point) {
    (Point::new(0.0, SIDE), Point::new(SIDE, 0.0))
}

fn random_points(count: usize) -> Vec<Point> {
    let (top_left, bottom_right) = corners();
    let bounds = Bounds::from_corners(top_left, bottom_right);
    generate_random_points_in_bounds(count, &bounds, SEED.wrapping_add(count as u64))
        .expect("generate_random_points_in_bounds failed")
}

fn build(points: &[Point]) -> DelaunayTriangulation {
    let (top_left, bottom_right) = corners();
    DelaunayTriangulation::with_points(top_left, bottom_right, points.iter().copied())
        .unwrap_or_else(|err| {
            error!(%err, "benchmark construction failed");
            panic!("benchmark construction failed: {err}");
        })
}

/// Bulk construction from uniform random points.
fn bench_random_construction(c: &mut Criterion) {
    init_bench_logging();
    let mut group = c.benchmark_group("construction_random");
    group.sample_size(10);

    for &count in COUNTS {
        let points = random_points(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("with_points", count), &points, |b, points| {
            b.iter(|| black_box(build(points)));
        });
    }
    group.finish();
}

/// Construction from a grid, where almost every quad is cocircular.
fn bench_grid_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction_grid");
    group.sample_size(10);

    for per_axis in [32_usize, 100] {
        let spacing = SIDE / (per_axis as f64 + 1.0);
        let points = generate_grid_points(per_axis, spacing, Point::new(spacing, spacing))
            .expect("generate_grid_points failed");
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("with_points", points.len()),
            &points,
            |b, points| b.iter(|| black_box(build(points))),
        );
    }
    group.finish();
}

/// One insertion into a triangulation that already holds many points.
fn bench_single_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_single");

    for &count in &COUNTS[..2] {
        let base = build(&random_points(count));
        let extra = random_points(count + 1);
        let point = extra[count];
        group.bench_with_input(BenchmarkId::new("insert", count), &point, |b, &point| {
            b.iter_batched(
                || base.clone(),
                |mut dt| black_box(dt.insert(point).expect("insert failed")),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Graham scan over the vertices of a built triangulation.
fn bench_convex_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("convex_hull");
    for &count in &COUNTS[..2] {
        let points = random_points(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("graham_scan", count), &points, |b, points| {
            b.iter(|| black_box(convex_hull(points)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_random_construction,
    bench_grid_construction,
    bench_single_insert,
    bench_convex_hull
);
criterion_main!(benches);
