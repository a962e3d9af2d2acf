use dispatch_core::dispatcher::Dispatcher;
use dispatch_core::ecs::{RideId, RiderId};
use dispatch_core::scenario::{DispatchConfig, MatchingAlgorithmType};
use dispatch_core::spatial::Location;

pub use dispatch_core::test_helpers::{driver_id as driver, ride_id as ride};

/// Builder for reproducible test dispatchers.
#[derive(Clone, Debug, Default)]
pub struct TestDispatcherBuilder {
    config: DispatchConfig,
    drivers: Vec<(String, Location)>,
    riders: Vec<(String, Location)>,
}

impl TestDispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_rejection_attempts(mut self, attempts: usize) -> Self {
        self.config = self.config.with_max_rejection_attempts(attempts);
        self
    }

    pub fn with_matching_algorithm(mut self, algorithm: MatchingAlgorithmType) -> Self {
        self.config = self.config.with_matching_algorithm(algorithm);
        self
    }

    pub fn with_driver(mut self, id: &str, x: i64, y: i64) -> Self {
        self.drivers.push((id.to_owned(), Location::new(x, y)));
        self
    }

    pub fn with_rider(mut self, id: &str, x: i64, y: i64) -> Self {
        self.riders.push((id.to_owned(), Location::new(x, y)));
        self
    }

    pub fn build(self) -> Dispatcher {
        let mut dispatcher = Dispatcher::new(self.config);
        for (id, location) in self.drivers {
            dispatcher.create_driver(id, location).expect("driver");
        }
        for (id, location) in self.riders {
            dispatcher.create_rider(id, location).expect("rider");
        }
        dispatcher
    }
}

/// Requests a ride from the rider's current location.
pub fn request_at_rider(
    dispatcher: &mut Dispatcher,
    ride: &str,
    rider: &str,
    dropoff: Location,
) -> RideId {
    let pickup = dispatcher
        .rider(&RiderId::new(rider))
        .map(|r| r.location)
        .expect("rider exists");
    dispatcher
        .request_ride(ride, rider, pickup, dropoff)
        .expect("ride request")
        .id
}
