use crate::spatial::{manhattan_distance, Location};

use super::algorithm::MatchingAlgorithm;
use super::types::{sort_best_first, DriverCandidate, MatchCandidate, ScoreComponents};

/// Nearest-driver matching: ranks purely by grid distance to pickup.
///
/// Useful as a baseline against the fairness-weighted scorer. Ride counts are
/// ignored; ties go to the lowest driver id.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestDriverMatching;

impl MatchingAlgorithm for NearestDriverMatching {
    fn rank(&self, pickup: Location, candidates: &[DriverCandidate]) -> Vec<MatchCandidate> {
        let mut ranked: Vec<MatchCandidate> = candidates
            .iter()
            .map(|candidate| {
                let eta = manhattan_distance(candidate.location, pickup);
                MatchCandidate {
                    driver_id: candidate.driver_id.clone(),
                    eta,
                    components: ScoreComponents {
                        eta_cost: eta as f64,
                        fairness_cost: 0.0,
                    },
                }
            })
            .collect();
        sort_best_first(&mut ranked);
        ranked
    }
}
