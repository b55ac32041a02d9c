use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use log::debug;
use rs_gravity::particles::{direct_accelerations, generate_galaxy, BarnesHutTree, GravitySimulation, Particles};
use rs_gravity::utils::{SimulationConfig, SimulationParams};


pub fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(50);

    for &count in &[1_000usize, 10_000, 25_000] {
        let mut particles = Particles::default();
        generate_galaxy(&mut particles, count, 13_371_337);
        let mut tree = BarnesHutTree::new();

        group.bench_with_input(BenchmarkId::from_parameter(count), &particles, |b, particles| b.iter(|| {
            tree.build(black_box(particles));
        }));
        debug!("{} particles -> {} nodes", count, tree.len());
    }
    group.finish();
}

pub fn bench_tree_vs_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_vs_direct");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(20);

    let mut particles = Particles::default();
    generate_galaxy(&mut particles, 2_000, 42);
    let params = SimulationParams { theta: 0.5, ..SimulationParams::default() };

    group.bench_function("direct", |b| b.iter(|| {
        black_box(direct_accelerations(black_box(&particles), &params));
    }));

    let mut tree = BarnesHutTree::new();
    tree.build(&particles);
    group.bench_function("barnes_hut", |b| b.iter(|| {
        let mut stack = Vec::new();
        let mut sum = (0.0, 0.0);
        for i in 0..particles.count() {
            let (ax, ay) = tree.acceleration_on(i, &particles, &params, &mut stack);
            sum.0 += ax;
            sum.1 += ay;
        }
        black_box(sum);
    }));
    group.finish();
}

pub fn bench_step(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut group = c.benchmark_group("step");
    group.measurement_time(std::time::Duration::from_secs(10));
    group.sample_size(20);

    let mut worker_counts = vec![1, SimulationConfig::default().worker_threads];
    worker_counts.dedup();
    for threads in worker_counts {
        let mut sim = GravitySimulation::new(SimulationConfig {
            worker_threads: threads,
            particle_count: 25_000,
            seed: 13_371_337,
        });
        group.bench_with_input(BenchmarkId::new("workers", threads), &threads, |b, _| b.iter(|| {
            sim.step();
        }));
    }
    group.finish();
}

criterion_group!(benches, bench_step, bench_tree_build, bench_tree_vs_direct);
criterion_main!(benches);
