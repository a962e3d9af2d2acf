use crate::ecs::DriverId;
use crate::spatial::Location;

use super::types::{DriverCandidate, MatchCandidate};

/// Scores eligible drivers for a pickup point.
///
/// Candidates arrive already filtered: available, and not among the drivers
/// that declined the request. Implementations only rank them.
pub trait MatchingAlgorithm: Send + Sync {
    /// Every candidate with its score, best first.
    fn rank(&self, pickup: Location, candidates: &[DriverCandidate]) -> Vec<MatchCandidate>;

    /// The best candidate, or `None` when there are no candidates.
    fn find_match(&self, pickup: Location, candidates: &[DriverCandidate]) -> Option<DriverId> {
        self.rank(pickup, candidates)
            .into_iter()
            .next()
            .map(|candidate| candidate.driver_id)
    }
}
