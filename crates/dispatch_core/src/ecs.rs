use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::spatial::Location;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(DriverId);
string_id!(RiderId);
string_id!(RideId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    OnTrip,
    Offline,
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DriverStatus::Available => "available",
            DriverStatus::OnTrip => "on_trip",
            DriverStatus::Offline => "offline",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub location: Location,
    pub status: DriverStatus,
    /// Rides ever assigned; only a cancellation takes one back.
    pub assigned_rides: u32,
    /// Ride requests this driver has declined, in the order declined.
    pub rejected_rides: Vec<RideId>,
}

impl Driver {
    pub fn new(id: DriverId, location: Location) -> Self {
        Self {
            id,
            location,
            status: DriverStatus::Available,
            assigned_rides: 0,
            rejected_rides: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component, Serialize, Deserialize)]
pub struct Rider {
    pub id: RiderId,
    pub location: Location,
}

impl Rider {
    pub fn new(id: RiderId, location: Location) -> Self {
        Self { id, location }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Waiting,
    Assigned,
    /// Kept for wire compatibility; no transition enters it.
    Rejected,
    Completed,
    Failed,
}

impl RideStatus {
    /// Completed and failed rides never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Failed)
    }

    /// Waiting or assigned: the rider still has a ride in flight.
    pub fn is_active(self) -> bool {
        matches!(self, RideStatus::Waiting | RideStatus::Assigned)
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RideStatus::Waiting => "waiting",
            RideStatus::Assigned => "assigned",
            RideStatus::Rejected => "rejected",
            RideStatus::Completed => "completed",
            RideStatus::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: RideId,
    pub rider_id: RiderId,
    pub pickup: Location,
    pub dropoff: Location,
    pub status: RideStatus,
    pub assigned_driver_id: Option<DriverId>,
    /// Drivers that declined this request, in the order they declined.
    pub rejected_by: Vec<DriverId>,
}

impl RideRequest {
    pub fn new(id: RideId, rider_id: RiderId, pickup: Location, dropoff: Location) -> Self {
        Self {
            id,
            rider_id,
            pickup,
            dropoff,
            status: RideStatus::Waiting,
            assigned_driver_id: None,
            rejected_by: Vec::new(),
        }
    }

    pub fn was_rejected_by(&self, driver: &DriverId) -> bool {
        self.rejected_by.contains(driver)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripLeg {
    ToPickup,
    ToDropoff,
}

impl fmt::Display for TripLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TripLeg::ToPickup => "to_pickup",
            TripLeg::ToDropoff => "to_dropoff",
        })
    }
}

/// Attached to a ride request entity while a driver is serving it.
#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct ActiveTrip {
    pub driver: DriverId,
    pub leg: TripLeg,
    /// Tick at which the driver was assigned.
    pub assigned_at: u64,
    /// Tick at which the driver reached pickup.
    pub pickup_at: Option<u64>,
}

impl ActiveTrip {
    pub fn new(driver: DriverId, assigned_at: u64) -> Self {
        Self {
            driver,
            leg: TripLeg::ToPickup,
            assigned_at,
            pickup_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_render_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&DriverStatus::OnTrip).expect("json"),
            "\"on_trip\""
        );
        assert_eq!(
            serde_json::to_string(&RideStatus::Waiting).expect("json"),
            "\"waiting\""
        );
        assert_eq!(
            serde_json::to_string(&TripLeg::ToDropoff).expect("json"),
            "\"to_dropoff\""
        );
        assert_eq!(DriverStatus::Offline.to_string(), "offline");
        assert_eq!(TripLeg::ToPickup.to_string(), "to_pickup");
    }

    #[test]
    fn terminal_and_active_ride_statuses() {
        assert!(RideStatus::Completed.is_terminal());
        assert!(RideStatus::Failed.is_terminal());
        assert!(!RideStatus::Waiting.is_terminal());
        assert!(RideStatus::Waiting.is_active());
        assert!(RideStatus::Assigned.is_active());
        assert!(!RideStatus::Rejected.is_active());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = DriverId::new("driver_1");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"driver_1\"");
        assert_eq!(id.to_string(), "driver_1");
    }
}
