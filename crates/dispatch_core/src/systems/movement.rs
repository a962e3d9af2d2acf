//! Movement system: advances every active trip by one grid unit.
//!
//! Trips are processed in ride id order so a tick is reproducible. A driver on
//! the pickup leg heads to the pickup point; on arrival the trip switches to the
//! dropoff leg. Reaching dropoff completes the ride, frees the driver and drops
//! the [`ActiveTrip`] component (applied at the end of the schedule).

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use tracing::{debug, info, warn};

use crate::clock::{SimulationClock, TickEvents, TripEvent, TripEventKind};
use crate::ecs::{ActiveTrip, Driver, DriverStatus, RideRequest, RideStatus, TripLeg};
use crate::spatial::step_towards;
use crate::store::EntityIndex;
use crate::telemetry::{CompletedTripRecord, SimTelemetry};

#[allow(clippy::type_complexity)]
pub fn movement_system(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    index: Res<EntityIndex>,
    mut events: ResMut<TickEvents>,
    mut telemetry: ResMut<SimTelemetry>,
    mut trips: Query<(Entity, &mut RideRequest, &mut ActiveTrip)>,
    mut drivers: Query<&mut Driver>,
) {
    let now = clock.now();
    let mut active: Vec<_> = trips.iter_mut().collect();
    active.sort_by(|(_, a, _), (_, b, _)| a.id.cmp(&b.id));

    for (ride_entity, mut request, mut trip) in active {
        let Some(mut driver) = index
            .driver(&trip.driver)
            .and_then(|entity| drivers.get_mut(entity).ok())
        else {
            warn!(ride = %request.id, driver = %trip.driver, "trip driver missing; skipped");
            continue;
        };

        match trip.leg {
            TripLeg::ToPickup => {
                if !step_towards(&mut driver.location, request.pickup) {
                    continue;
                }
                events.push(TripEvent {
                    kind: TripEventKind::Pickup,
                    ride_id: request.id.clone(),
                    driver_id: driver.id.clone(),
                    location: driver.location,
                    tick: now,
                });
                trip.leg = TripLeg::ToDropoff;
                trip.pickup_at = Some(now);
                debug!(ride = %request.id, driver = %driver.id, tick = now, "pickup");
            }
            TripLeg::ToDropoff => {
                if !step_towards(&mut driver.location, request.dropoff) {
                    continue;
                }
                events.push(TripEvent {
                    kind: TripEventKind::Dropoff,
                    ride_id: request.id.clone(),
                    driver_id: driver.id.clone(),
                    location: driver.location,
                    tick: now,
                });
                request.status = RideStatus::Completed;
                driver.status = DriverStatus::Available;

                telemetry.rides_completed += 1;
                telemetry.completed_trips.push(CompletedTripRecord {
                    ride_id: request.id.clone(),
                    rider_id: request.rider_id.clone(),
                    driver_id: driver.id.clone(),
                    assigned_at: trip.assigned_at,
                    pickup_at: trip.pickup_at.unwrap_or(now),
                    completed_at: now,
                });
                commands.entity(ride_entity).remove::<ActiveTrip>();
                info!(ride = %request.id, driver = %driver.id, tick = now, "ride completed");
            }
        }
    }
}
