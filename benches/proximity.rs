//! Benchmarks for the per-frame CPU work: connection search and physics.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use constellation::{
    physics, BruteForce, ConnectionFinder, FieldConfig, LineList, ParticleField, ParticleStore,
    SpawnContext, UniformGrid, Vec3,
};

const COUNTS: [usize; 3] = [100, 1_000, 4_000];

fn positions(count: usize) -> Vec<Vec3> {
    let mut ctx = SpawnContext::new(5.0, Some(17));
    (0..count).map(|_| ctx.random_in_bounds()).collect()
}

fn bench_connection_finders(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_connections");

    for count in COUNTS {
        let points = positions(count);

        group.bench_with_input(BenchmarkId::new("brute_force", count), &points, |b, points| {
            let mut finder = BruteForce;
            let mut out = LineList::new();
            b.iter(|| black_box(finder.find(points, 2.0, &mut out)))
        });

        group.bench_with_input(BenchmarkId::new("uniform_grid", count), &points, |b, points| {
            let mut finder = UniformGrid::new();
            let mut out = LineList::new();
            b.iter(|| black_box(finder.find(points, 2.0, &mut out)))
        });
    }

    group.finish();
}

fn bench_physics_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("physics_step");

    for count in COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut ctx = SpawnContext::new(5.0, Some(3));
            let mut store = ParticleStore::spawn(count, 0.005, &mut ctx);
            b.iter(|| physics::step(black_box(&mut store), 5.0))
        });
    }

    group.finish();
}

fn bench_field_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_frame");

    for count in COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = FieldConfig::new().with_particle_count(count).with_seed(5);
            let mut field = ParticleField::new(config);
            b.iter(|| black_box(field.advance()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_connection_finders, bench_physics_step, bench_field_frame);
criterion_main!(benches);
