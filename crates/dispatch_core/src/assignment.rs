//! Ride and driver state machine.
//!
//! ```text
//! ride:   waiting  -> assigned (match found / accept)
//!         waiting  -> failed   (retries exhausted / cancel)
//!         assigned -> completed (dropoff, see systems::movement)
//!         assigned -> failed   (cancel)
//! driver: available <-> offline (manual), available -> on_trip (assignment),
//!         on_trip -> available (dropoff / cancel)
//! ```
//!
//! Every operation checks all of its preconditions before touching the store.

use std::fmt;

use bevy_ecs::world::Mut;
use tracing::{debug, info};

use crate::clock::SimulationClock;
use crate::ecs::{
    ActiveTrip, Driver, DriverId, DriverStatus, RideId, RideRequest, RideStatus, Rider, RiderId,
};
use crate::error::{DispatchError, DispatchResult};
use crate::matching::find_best_driver;
use crate::scenario::DispatchConfig;
use crate::spatial::{manhattan_distance, Location};
use crate::store::EntityStore;
use crate::telemetry::SimTelemetry;

/// Result of an assignment attempt that found the ride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned { driver: DriverId },
    /// The ride is assigned, completed or failed; nothing changed.
    AlreadyInState(RideStatus),
    /// No eligible driver right now; the ride stays waiting.
    NoDriverAvailable,
    /// No eligible driver and the rejection budget is spent; the ride failed.
    Exhausted,
}

impl AssignOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AssignOutcome::Assigned { .. })
    }
}

impl fmt::Display for AssignOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignOutcome::Assigned { driver } => write!(f, "assigned to driver {driver}"),
            AssignOutcome::AlreadyInState(status) => write!(f, "ride is already {status}"),
            AssignOutcome::NoDriverAvailable => f.write_str("no available drivers at the moment"),
            AssignOutcome::Exhausted => f.write_str("no available drivers; ride failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectStatus {
    Failed,
    Reassigning,
}

/// What happened after a driver declined a ride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: RejectStatus,
    pub assignment: AssignOutcome,
}

fn config(store: &EntityStore) -> DispatchConfig {
    *store.world().resource::<DispatchConfig>()
}

fn telemetry(store: &mut EntityStore) -> Mut<'_, SimTelemetry> {
    store.world_mut().resource_mut::<SimTelemetry>()
}

fn ride_or_err<'a>(store: &'a EntityStore, ride_id: &RideId) -> DispatchResult<&'a RideRequest> {
    store
        .ride(ride_id)
        .ok_or_else(|| DispatchError::RideNotFound(ride_id.clone()))
}

fn driver_or_err<'a>(store: &'a EntityStore, driver_id: &DriverId) -> DispatchResult<&'a Driver> {
    store
        .driver(driver_id)
        .ok_or_else(|| DispatchError::DriverNotFound(driver_id.clone()))
}

/// Best driver for the ride plus its pickup distance.
fn best_match(store: &EntityStore, ride_id: &RideId) -> Option<(DriverId, u64)> {
    let request = store.ride(ride_id)?;
    let driver_id = find_best_driver(store, request)?;
    let driver = store.driver(&driver_id)?;
    Some((driver_id, manhattan_distance(driver.location, request.pickup)))
}

/// Adds the decline to both sides; repeated declines are recorded once.
fn record_rejection(store: &mut EntityStore, ride_id: &RideId, driver_id: &DriverId) {
    let mut newly_rejected = false;
    if let Some(mut ride) = store.ride_mut(ride_id) {
        if !ride.was_rejected_by(driver_id) {
            ride.rejected_by.push(driver_id.clone());
            newly_rejected = true;
        }
    }
    if let Some(mut driver) = store.driver_mut(driver_id) {
        if !driver.rejected_rides.contains(ride_id) {
            driver.rejected_rides.push(ride_id.clone());
        }
    }
    if newly_rejected {
        telemetry(store).driver_rejections += 1;
    }
}

fn commit_assignment(store: &mut EntityStore, ride_id: &RideId, driver_id: &DriverId) {
    let now = store.world().resource::<SimulationClock>().now();
    if let Some(mut ride) = store.ride_mut(ride_id) {
        ride.status = RideStatus::Assigned;
        ride.assigned_driver_id = Some(driver_id.clone());
    }
    if let Some(mut driver) = store.driver_mut(driver_id) {
        driver.status = DriverStatus::OnTrip;
        driver.assigned_rides += 1;
    }
    store.start_trip(ride_id, ActiveTrip::new(driver_id.clone(), now));
    telemetry(store).rides_assigned += 1;
    debug!(ride = %ride_id, driver = %driver_id, tick = now, "ride assigned");
}

/// Tries to hand the ride to the best eligible driver.
///
/// With a driver decision limit configured, a matched driver may decline; the
/// decline is recorded and matching runs again. Each pass either returns or
/// adds a previously eligible driver to `rejected_by`, so the loop runs at most
/// once per driver.
pub fn assign_ride(store: &mut EntityStore, ride_id: &RideId) -> DispatchResult<AssignOutcome> {
    let status = ride_or_err(store, ride_id)?.status;
    match status {
        RideStatus::Assigned | RideStatus::Completed | RideStatus::Failed => {
            return Ok(AssignOutcome::AlreadyInState(status));
        }
        RideStatus::Waiting | RideStatus::Rejected => {}
    }

    let config = config(store);
    loop {
        let Some((driver_id, pickup_distance)) = best_match(store, ride_id) else {
            let rejections = store.ride(ride_id).map_or(0, |ride| ride.rejected_by.len());
            if rejections >= config.max_rejection_attempts {
                if let Some(mut ride) = store.ride_mut(ride_id) {
                    ride.status = RideStatus::Failed;
                }
                telemetry(store).rides_exhausted += 1;
                info!(ride = %ride_id, rejections, "no drivers left to try; ride failed");
                return Ok(AssignOutcome::Exhausted);
            }
            debug!(ride = %ride_id, rejections, "no available driver");
            return Ok(AssignOutcome::NoDriverAvailable);
        };

        if !config.driver_decision.accepts(pickup_distance) {
            debug!(ride = %ride_id, driver = %driver_id, pickup_distance, "driver declined");
            record_rejection(store, ride_id, &driver_id);
            continue;
        }

        commit_assignment(store, ride_id, &driver_id);
        return Ok(AssignOutcome::Assigned { driver: driver_id });
    }
}

/// Driver takes a waiting ride directly, bypassing matching.
pub fn accept_ride(
    store: &mut EntityStore,
    ride_id: &RideId,
    driver_id: &DriverId,
) -> DispatchResult<()> {
    let ride_status = ride_or_err(store, ride_id)?.status;
    let driver_status = driver_or_err(store, driver_id)?.status;
    if ride_status != RideStatus::Waiting {
        return Err(DispatchError::InvalidRideState {
            ride: ride_id.clone(),
            status: ride_status,
            operation: "accept",
        });
    }
    if driver_status != DriverStatus::Available {
        return Err(DispatchError::InvalidDriverState {
            driver: driver_id.clone(),
            status: driver_status,
            operation: "accept ride with",
        });
    }
    commit_assignment(store, ride_id, driver_id);
    Ok(())
}

/// Driver declines a waiting ride; matching runs again without them.
pub fn reject_ride(
    store: &mut EntityStore,
    ride_id: &RideId,
    driver_id: &DriverId,
) -> DispatchResult<Rejection> {
    let ride_status = ride_or_err(store, ride_id)?.status;
    driver_or_err(store, driver_id)?;
    if ride_status != RideStatus::Waiting {
        return Err(DispatchError::InvalidRideState {
            ride: ride_id.clone(),
            status: ride_status,
            operation: "reject",
        });
    }

    record_rejection(store, ride_id, driver_id);
    let assignment = assign_ride(store, ride_id)?;
    let status = match store.ride(ride_id).map(|ride| ride.status) {
        Some(RideStatus::Failed) => RejectStatus::Failed,
        _ => RejectStatus::Reassigning,
    };
    debug!(ride = %ride_id, driver = %driver_id, outcome = %assignment, "ride rejected");
    Ok(Rejection { status, assignment })
}

/// Cancels a waiting or assigned ride. The ride ends `failed`.
pub fn cancel_ride(store: &mut EntityStore, ride_id: &RideId) -> DispatchResult<()> {
    let ride = ride_or_err(store, ride_id)?;
    let status = ride.status;
    let assigned_driver = ride.assigned_driver_id.clone();
    if !status.is_active() {
        return Err(DispatchError::InvalidRideState {
            ride: ride_id.clone(),
            status,
            operation: "cancel",
        });
    }

    if status == RideStatus::Assigned {
        if let Some(driver_id) = &assigned_driver {
            if let Some(mut driver) = store.driver_mut(driver_id) {
                driver.status = DriverStatus::Available;
                driver.assigned_rides = driver.assigned_rides.saturating_sub(1);
            }
        }
        store.end_trip(ride_id);
    }

    if let Some(mut ride) = store.ride_mut(ride_id) {
        ride.status = RideStatus::Failed;
        ride.assigned_driver_id = None;
    }
    telemetry(store).rides_cancelled += 1;
    info!(ride = %ride_id, previous = %status, "ride cancelled");
    Ok(())
}

/// Creates a waiting ride for the rider and immediately tries to assign it.
pub fn request_ride(
    store: &mut EntityStore,
    ride_id: RideId,
    rider_id: RiderId,
    pickup: Location,
    dropoff: Location,
) -> DispatchResult<RideRequest> {
    if store.rider(&rider_id).is_none() {
        return Err(DispatchError::RiderNotFound(rider_id));
    }
    if let Some(active) = store.active_ride_for(&rider_id) {
        return Err(DispatchError::RiderHasActiveRequest {
            rider: rider_id,
            ride: active.id.clone(),
        });
    }

    store.insert_ride(RideRequest::new(ride_id.clone(), rider_id, pickup, dropoff))?;
    telemetry(store).rides_requested += 1;
    let outcome = assign_ride(store, &ride_id)?;
    debug!(ride = %ride_id, %outcome, "ride requested");
    ride_or_err(store, &ride_id).cloned()
}

pub fn remove_driver(store: &mut EntityStore, driver_id: &DriverId) -> DispatchResult<Driver> {
    let status = driver_or_err(store, driver_id)?.status;
    if status == DriverStatus::OnTrip {
        return Err(DispatchError::InvalidDriverState {
            driver: driver_id.clone(),
            status,
            operation: "remove",
        });
    }
    store
        .remove_driver(driver_id)
        .ok_or_else(|| DispatchError::DriverNotFound(driver_id.clone()))
}

pub fn remove_rider(store: &mut EntityStore, rider_id: &RiderId) -> DispatchResult<Rider> {
    if store.rider(rider_id).is_none() {
        return Err(DispatchError::RiderNotFound(rider_id.clone()));
    }
    if let Some(active) = store.active_ride_for(rider_id) {
        return Err(DispatchError::RiderHasActiveRequest {
            rider: rider_id.clone(),
            ride: active.id.clone(),
        });
    }
    store
        .remove_rider(rider_id)
        .ok_or_else(|| DispatchError::RiderNotFound(rider_id.clone()))
}

/// Manual availability toggle. Only available <-> offline; a driver on a trip
/// is released by dropoff or cancellation, never by hand.
pub fn set_driver_status(
    store: &mut EntityStore,
    driver_id: &DriverId,
    status: DriverStatus,
) -> DispatchResult<()> {
    let current = driver_or_err(store, driver_id)?.status;
    if current == DriverStatus::OnTrip || status == DriverStatus::OnTrip {
        return Err(DispatchError::InvalidDriverState {
            driver: driver_id.clone(),
            status: current,
            operation: "change status of",
        });
    }
    if let Some(mut driver) = store.driver_mut(driver_id) {
        driver.status = status;
    }
    debug!(driver = %driver_id, from = %current, to = %status, "driver status changed");
    Ok(())
}
