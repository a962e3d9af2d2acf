//! Simulation runner: resource setup and the per-tick schedule.
//!
//! Each tick advances [SimulationClock], runs the schedule (movement plus
//! [apply_deferred] so finished trips are removed before the tick returns) and
//! drains the events it produced.

use bevy_ecs::prelude::{Query, Schedule, With, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{SimulationClock, TickEvents, TripEvent};
use crate::ecs::ActiveTrip;
use crate::matching::MatchingAlgorithmResource;
use crate::scenario::DispatchConfig;
use crate::store::EntityIndex;
use crate::systems::movement::movement_system;
use crate::telemetry::SimTelemetry;

/// Inserts every resource the dispatch operations and systems read.
pub fn initialize_world(world: &mut World, config: DispatchConfig) {
    world.insert_resource(MatchingAlgorithmResource::from_config(&config));
    world.insert_resource(config);
    world.init_resource::<EntityIndex>();
    world.init_resource::<SimulationClock>();
    world.init_resource::<TickEvents>();
    world.init_resource::<SimTelemetry>();
}

fn has_active_trips(trips: Query<(), With<ActiveTrip>>) -> bool {
    !trips.is_empty()
}

pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    let movement = movement_system.run_if(has_active_trips);
    schedule.add_systems((movement, apply_deferred).chain());
    schedule
}

/// Runs one tick and returns the events it emitted.
pub fn run_tick(world: &mut World, schedule: &mut Schedule) -> Vec<TripEvent> {
    world.resource_mut::<SimulationClock>().advance();
    schedule.run(world);
    world.resource_mut::<TickEvents>().drain()
}

pub fn active_trip_count(world: &mut World) -> usize {
    world
        .query_filtered::<(), With<ActiveTrip>>()
        .iter(world)
        .count()
}

/// Ticks until no trip is active or `max_ticks` ticks have run.
/// Returns every event emitted, in order.
pub fn run_until_idle(
    world: &mut World,
    schedule: &mut Schedule,
    max_ticks: u64,
) -> Vec<TripEvent> {
    let mut events = Vec::new();
    let mut ticks = 0;
    while ticks < max_ticks && active_trip_count(world) > 0 {
        events.extend(run_tick(world, schedule));
        ticks += 1;
    }
    events
}
