//! The dispatch session: one independent world per instance.
//!
//! [`Dispatcher`] is the only public entry point to the store. Every mutating
//! operation takes `&mut self`; [`SharedDispatcher`] puts a dispatcher behind a
//! read-write lock for callers that serve requests from several threads.

use std::sync::Arc;

use bevy_ecs::prelude::Schedule;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::assignment::{self, AssignOutcome, Rejection};
use crate::clock::{SimulationClock, TripEvent};
use crate::ecs::{ActiveTrip, Driver, DriverId, DriverStatus, RideId, RideRequest, Rider, RiderId};
use crate::error::DispatchResult;
use crate::matching::{MatchingAlgorithm, MatchingAlgorithmResource};
use crate::runner::{initialize_world, run_tick, run_until_idle, simulation_schedule};
use crate::scenario::DispatchConfig;
use crate::spatial::{GridInfo, Location};
use crate::store::EntityStore;
use crate::telemetry::{capture_snapshot, SimTelemetry, StateSnapshot};

pub struct Dispatcher {
    store: EntityStore,
    schedule: Schedule,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        let mut store = EntityStore::new();
        initialize_world(store.world_mut(), config);
        Self {
            store,
            schedule: simulation_schedule(),
        }
    }

    /// Replaces the configured matching algorithm.
    pub fn with_matching_algorithm(mut self, algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        self.store
            .world_mut()
            .insert_resource(MatchingAlgorithmResource::new(algorithm));
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        self.store.world().resource::<DispatchConfig>()
    }

    pub fn grid_info(&self) -> GridInfo {
        self.config().grid
    }

    /// Ticks run so far.
    pub fn now(&self) -> u64 {
        self.store.world().resource::<SimulationClock>().now()
    }

    pub fn create_driver(
        &mut self,
        id: impl Into<DriverId>,
        location: Location,
    ) -> DispatchResult<Driver> {
        let driver = Driver::new(id.into(), location);
        self.store.insert_driver(driver.clone())?;
        debug!(driver = %driver.id, x = location.x, y = location.y, "driver created");
        Ok(driver)
    }

    pub fn create_rider(
        &mut self,
        id: impl Into<RiderId>,
        location: Location,
    ) -> DispatchResult<Rider> {
        let rider = Rider::new(id.into(), location);
        self.store.insert_rider(rider.clone())?;
        debug!(rider = %rider.id, x = location.x, y = location.y, "rider created");
        Ok(rider)
    }

    pub fn request_ride(
        &mut self,
        ride_id: impl Into<RideId>,
        rider_id: impl Into<RiderId>,
        pickup: Location,
        dropoff: Location,
    ) -> DispatchResult<RideRequest> {
        assignment::request_ride(&mut self.store, ride_id.into(), rider_id.into(), pickup, dropoff)
    }

    pub fn assign_ride(&mut self, ride_id: &RideId) -> DispatchResult<AssignOutcome> {
        assignment::assign_ride(&mut self.store, ride_id)
    }

    pub fn accept_ride(&mut self, ride_id: &RideId, driver_id: &DriverId) -> DispatchResult<()> {
        assignment::accept_ride(&mut self.store, ride_id, driver_id)
    }

    pub fn reject_ride(
        &mut self,
        ride_id: &RideId,
        driver_id: &DriverId,
    ) -> DispatchResult<Rejection> {
        assignment::reject_ride(&mut self.store, ride_id, driver_id)
    }

    pub fn cancel_ride(&mut self, ride_id: &RideId) -> DispatchResult<()> {
        assignment::cancel_ride(&mut self.store, ride_id)
    }

    pub fn remove_driver(&mut self, driver_id: &DriverId) -> DispatchResult<Driver> {
        assignment::remove_driver(&mut self.store, driver_id)
    }

    pub fn remove_rider(&mut self, rider_id: &RiderId) -> DispatchResult<Rider> {
        assignment::remove_rider(&mut self.store, rider_id)
    }

    pub fn set_driver_status(
        &mut self,
        driver_id: &DriverId,
        status: DriverStatus,
    ) -> DispatchResult<()> {
        assignment::set_driver_status(&mut self.store, driver_id, status)
    }

    pub fn driver(&self, id: &DriverId) -> Option<&Driver> {
        self.store.driver(id)
    }

    pub fn rider(&self, id: &RiderId) -> Option<&Rider> {
        self.store.rider(id)
    }

    pub fn ride(&self, id: &RideId) -> Option<&RideRequest> {
        self.store.ride(id)
    }

    pub fn active_trip(&self, ride_id: &RideId) -> Option<&ActiveTrip> {
        self.store.active_trip(ride_id)
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> + '_ {
        self.store.drivers()
    }

    pub fn riders(&self) -> impl Iterator<Item = &Rider> + '_ {
        self.store.riders()
    }

    pub fn rides(&self) -> impl Iterator<Item = &RideRequest> + '_ {
        self.store.rides()
    }

    /// Advances every active trip by one grid unit.
    pub fn tick(&mut self) -> Vec<TripEvent> {
        run_tick(self.store.world_mut(), &mut self.schedule)
    }

    /// Ticks until no trip is active, at most `max_ticks` times.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> Vec<TripEvent> {
        run_until_idle(self.store.world_mut(), &mut self.schedule, max_ticks)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        capture_snapshot(&self.store, self.now())
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.store.world().resource::<SimTelemetry>()
    }
}

/// A dispatcher shared between threads.
///
/// Mutations take the write lock for their whole duration (a tick included);
/// reads take the read lock, so they never see a half-applied change.
#[derive(Clone, Default)]
pub struct SharedDispatcher {
    inner: Arc<RwLock<Dispatcher>>,
}

impl SharedDispatcher {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dispatcher)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Dispatcher> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Dispatcher> {
        self.inner.write()
    }

    pub fn create_driver(
        &self,
        id: impl Into<DriverId>,
        location: Location,
    ) -> DispatchResult<Driver> {
        self.write().create_driver(id, location)
    }

    pub fn create_rider(
        &self,
        id: impl Into<RiderId>,
        location: Location,
    ) -> DispatchResult<Rider> {
        self.write().create_rider(id, location)
    }

    pub fn request_ride(
        &self,
        ride_id: impl Into<RideId>,
        rider_id: impl Into<RiderId>,
        pickup: Location,
        dropoff: Location,
    ) -> DispatchResult<RideRequest> {
        self.write().request_ride(ride_id, rider_id, pickup, dropoff)
    }

    pub fn assign_ride(&self, ride_id: &RideId) -> DispatchResult<AssignOutcome> {
        self.write().assign_ride(ride_id)
    }

    pub fn accept_ride(&self, ride_id: &RideId, driver_id: &DriverId) -> DispatchResult<()> {
        self.write().accept_ride(ride_id, driver_id)
    }

    pub fn reject_ride(&self, ride_id: &RideId, driver_id: &DriverId) -> DispatchResult<Rejection> {
        self.write().reject_ride(ride_id, driver_id)
    }

    pub fn cancel_ride(&self, ride_id: &RideId) -> DispatchResult<()> {
        self.write().cancel_ride(ride_id)
    }

    pub fn remove_driver(&self, driver_id: &DriverId) -> DispatchResult<Driver> {
        self.write().remove_driver(driver_id)
    }

    pub fn remove_rider(&self, rider_id: &RiderId) -> DispatchResult<Rider> {
        self.write().remove_rider(rider_id)
    }

    pub fn set_driver_status(
        &self,
        driver_id: &DriverId,
        status: DriverStatus,
    ) -> DispatchResult<()> {
        self.write().set_driver_status(driver_id, status)
    }

    pub fn tick(&self) -> Vec<TripEvent> {
        self.write().tick()
    }

    /// Holds the write lock until the run finishes.
    pub fn run_until_idle(&self, max_ticks: u64) -> Vec<TripEvent> {
        self.write().run_until_idle(max_ticks)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.read().snapshot()
    }

    pub fn grid_info(&self) -> GridInfo {
        self.read().grid_info()
    }

    pub fn now(&self) -> u64 {
        self.read().now()
    }

    pub fn telemetry(&self) -> SimTelemetry {
        self.read().telemetry().clone()
    }

    pub fn driver(&self, id: &DriverId) -> Option<Driver> {
        self.read().driver(id).cloned()
    }

    pub fn rider(&self, id: &RiderId) -> Option<Rider> {
        self.read().rider(id).cloned()
    }

    pub fn ride(&self, id: &RideId) -> Option<RideRequest> {
        self.read().ride(id).cloned()
    }

    pub fn active_trip(&self, ride_id: &RideId) -> Option<ActiveTrip> {
        self.read().active_trip(ride_id).cloned()
    }

    /// Drivers in identifier order, as of one consistent read.
    pub fn drivers(&self) -> Vec<Driver> {
        self.read().drivers().cloned().collect()
    }

    pub fn riders(&self) -> Vec<Rider> {
        self.read().riders().cloned().collect()
    }

    pub fn rides(&self) -> Vec<RideRequest> {
        self.read().rides().cloned().collect()
    }
}
