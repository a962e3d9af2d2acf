//! Ride dispatch on an integer grid.
//!
//! Ride requests are matched to drivers by a weighted ETA / ride-count score,
//! assignments move through a small state machine, and a tick-driven
//! simulation walks drivers to pickup and dropoff one grid unit at a time.
//!
//! ```
//! use dispatch_core::dispatcher::Dispatcher;
//! use dispatch_core::spatial::Location;
//!
//! let mut dispatcher = Dispatcher::default();
//! dispatcher.create_driver("driver_1", Location::new(0, 0)).unwrap();
//! dispatcher.create_rider("rider_1", Location::new(3, 2)).unwrap();
//! let ride = dispatcher
//!     .request_ride("ride_1", "rider_1", Location::new(3, 2), Location::new(3, 5))
//!     .unwrap();
//!
//! let events = dispatcher.run_until_idle(100);
//! assert_eq!(events.len(), 2);
//! assert_eq!(events[1].tick, 8);
//! assert!(dispatcher.ride(&ride.id).unwrap().status.is_terminal());
//! ```

pub mod assignment;
pub mod clock;
pub mod dispatcher;
pub mod ecs;
pub mod error;
pub mod matching;
pub mod runner;
pub mod scenario;
pub mod spatial;
pub mod store;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use assignment::{AssignOutcome, RejectStatus, Rejection};
pub use clock::{TripEvent, TripEventKind};
pub use dispatcher::{Dispatcher, SharedDispatcher};
pub use ecs::{
    Driver, DriverId, DriverStatus, RideId, RideRequest, RideStatus, Rider, RiderId, TripLeg,
};
pub use error::{DispatchError, DispatchResult};
pub use scenario::DispatchConfig;
pub use spatial::Location;
