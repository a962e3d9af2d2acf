//! Entity store: drivers, riders, ride requests and the active-trip registry.
//!
//! Everything lives in one ECS [`World`]. Each driver, rider and ride request is
//! an entity; [`EntityIndex`] maps caller-supplied identifiers to entities and
//! keeps them ordered so every listing is deterministic. An in-progress trip is
//! an [`ActiveTrip`] component on its ride request entity.
//!
//! The store enforces identifier uniqueness and nothing else; status rules
//! belong to the assignment layer.

use std::collections::BTreeMap;

use bevy_ecs::prelude::{Entity, Resource, World};
use bevy_ecs::world::Mut;

use crate::ecs::{ActiveTrip, Driver, DriverId, RideId, RideRequest, Rider, RiderId};
use crate::error::{DispatchError, DispatchResult};

/// Identifier → entity lookup, ordered by identifier.
#[derive(Debug, Default, Resource)]
pub struct EntityIndex {
    drivers: BTreeMap<DriverId, Entity>,
    riders: BTreeMap<RiderId, Entity>,
    rides: BTreeMap<RideId, Entity>,
}

impl EntityIndex {
    pub fn driver(&self, id: &DriverId) -> Option<Entity> {
        self.drivers.get(id).copied()
    }

    pub fn rider(&self, id: &RiderId) -> Option<Entity> {
        self.riders.get(id).copied()
    }

    pub fn ride(&self, id: &RideId) -> Option<Entity> {
        self.rides.get(id).copied()
    }
}

pub struct EntityStore {
    world: World,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        let mut world = World::new();
        world.init_resource::<EntityIndex>();
        Self { world }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn index(&self) -> &EntityIndex {
        self.world.resource::<EntityIndex>()
    }

    fn index_mut(&mut self) -> Mut<'_, EntityIndex> {
        self.world.resource_mut::<EntityIndex>()
    }

    pub fn insert_driver(&mut self, driver: Driver) -> DispatchResult<()> {
        if self.index().drivers.contains_key(&driver.id) {
            return Err(DispatchError::DuplicateId(driver.id.0));
        }
        let id = driver.id.clone();
        let entity = self.world.spawn(driver).id();
        self.index_mut().drivers.insert(id, entity);
        Ok(())
    }

    pub fn insert_rider(&mut self, rider: Rider) -> DispatchResult<()> {
        if self.index().riders.contains_key(&rider.id) {
            return Err(DispatchError::DuplicateId(rider.id.0));
        }
        let id = rider.id.clone();
        let entity = self.world.spawn(rider).id();
        self.index_mut().riders.insert(id, entity);
        Ok(())
    }

    pub fn insert_ride(&mut self, ride: RideRequest) -> DispatchResult<()> {
        if self.index().rides.contains_key(&ride.id) {
            return Err(DispatchError::DuplicateId(ride.id.0));
        }
        let id = ride.id.clone();
        let entity = self.world.spawn(ride).id();
        self.index_mut().rides.insert(id, entity);
        Ok(())
    }

    pub fn remove_driver(&mut self, id: &DriverId) -> Option<Driver> {
        let entity = self.index_mut().drivers.remove(id)?;
        let driver = self.world.get::<Driver>(entity).cloned();
        self.world.despawn(entity);
        driver
    }

    pub fn remove_rider(&mut self, id: &RiderId) -> Option<Rider> {
        let entity = self.index_mut().riders.remove(id)?;
        let rider = self.world.get::<Rider>(entity).cloned();
        self.world.despawn(entity);
        rider
    }

    pub fn driver(&self, id: &DriverId) -> Option<&Driver> {
        let entity = self.index().driver(id)?;
        self.world.get::<Driver>(entity)
    }

    pub fn driver_mut(&mut self, id: &DriverId) -> Option<Mut<'_, Driver>> {
        let entity = self.index().driver(id)?;
        self.world.get_mut::<Driver>(entity)
    }

    pub fn rider(&self, id: &RiderId) -> Option<&Rider> {
        let entity = self.index().rider(id)?;
        self.world.get::<Rider>(entity)
    }

    pub fn ride(&self, id: &RideId) -> Option<&RideRequest> {
        let entity = self.index().ride(id)?;
        self.world.get::<RideRequest>(entity)
    }

    pub fn ride_mut(&mut self, id: &RideId) -> Option<Mut<'_, RideRequest>> {
        let entity = self.index().ride(id)?;
        self.world.get_mut::<RideRequest>(entity)
    }

    pub fn active_trip(&self, ride: &RideId) -> Option<&ActiveTrip> {
        let entity = self.index().ride(ride)?;
        self.world.get::<ActiveTrip>(entity)
    }

    /// Registers (or replaces) the active trip for `ride`. No-op for an unknown ride.
    pub fn start_trip(&mut self, ride: &RideId, trip: ActiveTrip) {
        if let Some(entity) = self.index().ride(ride) {
            self.world.entity_mut(entity).insert(trip);
        }
    }

    pub fn end_trip(&mut self, ride: &RideId) -> Option<ActiveTrip> {
        let entity = self.index().ride(ride)?;
        self.world.entity_mut(entity).take::<ActiveTrip>()
    }

    /// Drivers in ascending identifier order.
    pub fn drivers(&self) -> impl Iterator<Item = &Driver> + '_ {
        let world = &self.world;
        self.index()
            .drivers
            .values()
            .filter_map(move |entity| world.get::<Driver>(*entity))
    }

    pub fn riders(&self) -> impl Iterator<Item = &Rider> + '_ {
        let world = &self.world;
        self.index()
            .riders
            .values()
            .filter_map(move |entity| world.get::<Rider>(*entity))
    }

    pub fn rides(&self) -> impl Iterator<Item = &RideRequest> + '_ {
        let world = &self.world;
        self.index()
            .rides
            .values()
            .filter_map(move |entity| world.get::<RideRequest>(*entity))
    }

    /// Active trips in ascending ride identifier order.
    pub fn active_trips(&self) -> impl Iterator<Item = (&RideId, &ActiveTrip)> + '_ {
        let world = &self.world;
        self.index()
            .rides
            .iter()
            .filter_map(move |(id, entity)| world.get::<ActiveTrip>(*entity).map(|trip| (id, trip)))
    }

    /// The rider's waiting or assigned request, if any.
    pub fn active_ride_for(&self, rider: &RiderId) -> Option<&RideRequest> {
        self.rides()
            .find(|ride| &ride.rider_id == rider && ride.status.is_active())
    }

    pub fn driver_count(&self) -> usize {
        self.index().drivers.len()
    }

    pub fn ride_count(&self) -> usize {
        self.index().rides.len()
    }
}
