//! Run a 50 riders / 10 drivers scenario, retrying waiting rides every tick,
//! and print completed trips.
//!
//! Run with: cargo run -p dispatch_core --example scenario_run

use dispatch_core::dispatcher::Dispatcher;
use dispatch_core::ecs::{RideId, RideStatus};
use dispatch_core::scenario::{build_scenario, DispatchConfig, ScenarioParams};

fn main() {
    const NUM_RIDERS: usize = 50;
    const NUM_DRIVERS: usize = 10;
    const MAX_TICKS: u64 = 5_000;

    let mut dispatcher = Dispatcher::new(DispatchConfig::default());
    build_scenario(
        &mut dispatcher,
        ScenarioParams::default()
            .with_seed(123)
            .with_drivers(NUM_DRIVERS)
            .with_riders(NUM_RIDERS),
    )
    .expect("scenario ids are unique");

    let mut events = 0;
    while dispatcher.now() < MAX_TICKS {
        events += dispatcher.tick().len();
        let waiting: Vec<RideId> = dispatcher
            .rides()
            .filter(|ride| ride.status == RideStatus::Waiting)
            .map(|ride| ride.id.clone())
            .collect();
        for ride in &waiting {
            dispatcher.assign_ride(ride).expect("ride exists");
        }
        if waiting.is_empty() && dispatcher.snapshot().active_trips.is_empty() {
            break;
        }
    }

    let telemetry = dispatcher.telemetry();
    println!(
        "--- Scenario run ({} riders, {} drivers, seed 123) ---",
        NUM_RIDERS, NUM_DRIVERS
    );
    println!("Ticks: {}", dispatcher.now());
    println!("Events: {}", events);
    println!("Completed trips: {}", telemetry.completed_trips.len());

    if !telemetry.completed_trips.is_empty() {
        let n = telemetry.completed_trips.len() as f64;
        let pickup: u64 = telemetry.completed_trips.iter().map(|t| t.time_to_pickup()).sum();
        let trip: u64 = telemetry.completed_trips.iter().map(|t| t.trip_duration()).sum();
        println!("Avg time to pickup: {:.1} ticks", pickup as f64 / n);
        println!("Avg trip duration: {:.1} ticks", trip as f64 / n);
    }

    let mut rides_per_driver: Vec<_> = dispatcher
        .drivers()
        .map(|d| (d.id.clone(), d.assigned_rides))
        .collect();
    rides_per_driver.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (driver, rides) in rides_per_driver {
        println!("  {driver}: {rides} rides");
    }
}
