//! Test helpers for common test setup and utilities.
//!
//! This module provides shared fixtures to reduce duplication across test files.

use crate::dispatcher::Dispatcher;
use crate::ecs::{DriverId, RideId};
use crate::scenario::DispatchConfig;
use crate::spatial::Location;

/// Shorthand for a grid point.
pub fn loc(x: i64, y: i64) -> Location {
    Location::new(x, y)
}

/// A dispatcher with default configuration and the given drivers, all available.
///
/// # Panics
///
/// Panics if two drivers share an id.
pub fn dispatcher_with_drivers(drivers: &[(&str, Location)]) -> Dispatcher {
    dispatcher_with_config(DispatchConfig::default(), drivers)
}

pub fn dispatcher_with_config(config: DispatchConfig, drivers: &[(&str, Location)]) -> Dispatcher {
    let mut dispatcher = Dispatcher::new(config);
    for (id, location) in drivers {
        dispatcher
            .create_driver(*id, *location)
            .expect("test driver ids must be unique");
    }
    dispatcher
}

/// Creates rider `rider_id` at `pickup` and requests a ride for them.
///
/// # Panics
///
/// Panics if the rider or ride id is already taken.
pub fn request_from(
    dispatcher: &mut Dispatcher,
    ride_id: &str,
    rider_id: &str,
    pickup: Location,
    dropoff: Location,
) -> RideId {
    dispatcher
        .create_rider(rider_id, pickup)
        .expect("test rider ids must be unique");
    dispatcher
        .request_ride(ride_id, rider_id, pickup, dropoff)
        .expect("test ride request must be accepted")
        .id
}

pub fn driver_id(id: &str) -> DriverId {
    DriverId::new(id)
}

pub fn ride_id(id: &str) -> RideId {
    RideId::new(id)
}
