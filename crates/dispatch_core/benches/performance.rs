//! Performance benchmarks for dispatch_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispatch_core::dispatcher::Dispatcher;
use dispatch_core::ecs::DriverId;
use dispatch_core::matching::{
    DriverCandidate, FairnessWeightedMatching, MatchingAlgorithm, NearestDriverMatching,
};
use dispatch_core::scenario::{build_scenario, DispatchConfig, ScenarioParams};
use dispatch_core::spatial::Location;

fn candidates(count: usize) -> Vec<DriverCandidate> {
    (0..count)
        .map(|i| DriverCandidate {
            driver_id: DriverId::new(format!("driver_{i:05}")),
            location: Location::new((i % 97) as i64, (i / 97) as i64),
            assigned_rides: (i % 7) as u32,
        })
        .collect()
}

fn bench_matching_algorithms(c: &mut Criterion) {
    let pickup = Location::new(40, 5);
    let mut group = c.benchmark_group("matching_algorithms");
    for count in [100, 1_000] {
        let drivers = candidates(count);
        group.bench_with_input(
            BenchmarkId::new("fairness_weighted", count),
            &drivers,
            |b, drivers| {
                let algorithm = FairnessWeightedMatching::default();
                b.iter(|| black_box(algorithm.find_match(pickup, drivers)));
            },
        );
        group.bench_with_input(BenchmarkId::new("nearest", count), &drivers, |b, drivers| {
            b.iter(|| black_box(NearestDriverMatching.find_match(pickup, drivers)));
        });
    }
    group.finish();
}

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![("small", 50, 100), ("medium", 200, 500), ("large", 500, 1000)];

    let mut group = c.benchmark_group("simulation_run");
    for (name, drivers, riders) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(drivers, riders),
            |b, &(drivers, riders)| {
                b.iter(|| {
                    let mut dispatcher = Dispatcher::new(DispatchConfig::default());
                    let params = ScenarioParams::default()
                        .with_seed(42)
                        .with_drivers(drivers)
                        .with_riders(riders);
                    build_scenario(&mut dispatcher, params).expect("scenario");
                    black_box(dispatcher.run_until_idle(1_000));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_matching_algorithms, bench_simulation_run);
criterion_main!(benches);
