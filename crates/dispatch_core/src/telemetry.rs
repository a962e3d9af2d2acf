//! Telemetry / KPIs and full-state snapshots.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::ecs::{Driver, DriverId, RideId, RideRequest, Rider, RiderId, TripLeg};
use crate::store::EntityStore;

/// One completed trip, recorded when the driver reaches dropoff.
/// Timestamps are simulation ticks; use the helper methods for derived KPIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTripRecord {
    pub ride_id: RideId,
    pub rider_id: RiderId,
    pub driver_id: DriverId,
    pub assigned_at: u64,
    pub pickup_at: u64,
    pub completed_at: u64,
}

impl CompletedTripRecord {
    /// Ticks from assignment to pickup.
    pub fn time_to_pickup(&self) -> u64 {
        self.pickup_at.saturating_sub(self.assigned_at)
    }

    /// Ticks from pickup to dropoff.
    pub fn trip_duration(&self) -> u64 {
        self.completed_at.saturating_sub(self.pickup_at)
    }
}

/// Running counters for a dispatch session.
///
/// Cancelled and exhausted requests share the `failed` ride status; the
/// separate counters are where the two outcomes stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Resource, Serialize)]
pub struct SimTelemetry {
    pub rides_requested: u64,
    pub rides_assigned: u64,
    pub rides_completed: u64,
    pub rides_cancelled: u64,
    pub rides_exhausted: u64,
    pub driver_rejections: u64,
    pub completed_trips: Vec<CompletedTripRecord>,
}

/// Active trip as rendered in a state dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveTripSnapshot {
    pub ride_id: RideId,
    pub driver_id: DriverId,
    pub step: TripLeg,
}

/// Read-only dump of every entity, each list ordered by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub drivers: Vec<Driver>,
    pub riders: Vec<Rider>,
    pub ride_requests: Vec<RideRequest>,
    pub active_trips: Vec<ActiveTripSnapshot>,
}

pub fn capture_snapshot(store: &EntityStore, tick: u64) -> StateSnapshot {
    StateSnapshot {
        tick,
        drivers: store.drivers().cloned().collect(),
        riders: store.riders().cloned().collect(),
        ride_requests: store.rides().cloned().collect(),
        active_trips: store
            .active_trips()
            .map(|(ride_id, trip)| ActiveTripSnapshot {
                ride_id: ride_id.clone(),
                driver_id: trip.driver.clone(),
                step: trip.leg,
            })
            .collect(),
    }
}
