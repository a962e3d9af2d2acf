use crate::ecs::{Driver, DriverId};
use crate::spatial::Location;

/// An eligible driver as seen by a matching algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCandidate {
    pub driver_id: DriverId,
    pub location: Location,
    pub assigned_rides: u32,
}

impl From<&Driver> for DriverCandidate {
    fn from(driver: &Driver) -> Self {
        Self {
            driver_id: driver.id.clone(),
            location: driver.location,
            assigned_rides: driver.assigned_rides,
        }
    }
}

/// Weighted parts of a driver's score. Lower totals are better.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreComponents {
    pub eta_cost: f64,
    pub fairness_cost: f64,
}

impl ScoreComponents {
    pub fn total(&self) -> f64 {
        self.eta_cost + self.fairness_cost
    }
}

/// A scored driver-request pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub driver_id: DriverId,
    /// Grid units from the driver to pickup.
    pub eta: u64,
    pub components: ScoreComponents,
}

impl MatchCandidate {
    pub fn score(&self) -> f64 {
        self.components.total()
    }
}

/// Best first: lowest score, then lowest driver id.
pub(crate) fn sort_best_first(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| {
        a.score()
            .total_cmp(&b.score())
            .then_with(|| a.driver_id.cmp(&b.driver_id))
    });
}
