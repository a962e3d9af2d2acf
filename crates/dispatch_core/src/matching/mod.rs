pub mod algorithm;
pub mod nearest;
pub mod types;
pub mod weighted;

use bevy_ecs::prelude::Resource;

pub use algorithm::MatchingAlgorithm;
pub use nearest::NearestDriverMatching;
pub use types::{DriverCandidate, MatchCandidate, ScoreComponents};
pub use weighted::FairnessWeightedMatching;

use crate::ecs::{DriverId, RideRequest};
use crate::scenario::{DispatchConfig, MatchingAlgorithmType};
use crate::store::EntityStore;

/// Resource wrapper for the matching algorithm trait object.
#[derive(Resource)]
pub struct MatchingAlgorithmResource(pub Box<dyn MatchingAlgorithm>);

impl MatchingAlgorithmResource {
    pub fn new(algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        Self(algorithm)
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        match config.matching_algorithm {
            MatchingAlgorithmType::FairnessWeighted => Self::new(Box::new(
                FairnessWeightedMatching::new(config.eta_weight, config.fairness_weight),
            )),
            MatchingAlgorithmType::Nearest => Self::new(Box::new(NearestDriverMatching)),
        }
    }
}

impl std::ops::Deref for MatchingAlgorithmResource {
    type Target = dyn MatchingAlgorithm;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Available drivers that have not declined `request`, in driver id order.
pub fn eligible_candidates(store: &EntityStore, request: &RideRequest) -> Vec<DriverCandidate> {
    store
        .drivers()
        .filter(|driver| driver.is_available() && !request.was_rejected_by(&driver.id))
        .map(DriverCandidate::from)
        .collect()
}

/// Runs the configured matching algorithm for `request`.
///
/// Read-only: nothing in the store changes.
pub fn find_best_driver(store: &EntityStore, request: &RideRequest) -> Option<DriverId> {
    let candidates = eligible_candidates(store, request);
    if candidates.is_empty() {
        return None;
    }
    let algorithm = store.world().resource::<MatchingAlgorithmResource>();
    algorithm.find_match(request.pickup, &candidates)
}
