use crate::spatial::{manhattan_distance, Location};

use super::algorithm::MatchingAlgorithm;
use super::types::{sort_best_first, DriverCandidate, MatchCandidate, ScoreComponents};

/// Weighted ETA / ride-count matching.
///
/// Each candidate gets
///
/// ```text
/// score = eta_weight * (eta / max_eta) + fairness_weight * (1 - assigned_rides / max_rides)
/// ```
///
/// where `max_eta` and `max_rides` are taken over the candidate set and floored
/// at 1. The lowest score wins; exact ties go to the lowest driver id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairnessWeightedMatching {
    pub eta_weight: f64,
    pub fairness_weight: f64,
}

impl FairnessWeightedMatching {
    pub fn new(eta_weight: f64, fairness_weight: f64) -> Self {
        Self {
            eta_weight,
            fairness_weight,
        }
    }
}

impl Default for FairnessWeightedMatching {
    fn default() -> Self {
        Self::new(0.7, 0.3)
    }
}

impl MatchingAlgorithm for FairnessWeightedMatching {
    fn rank(&self, pickup: Location, candidates: &[DriverCandidate]) -> Vec<MatchCandidate> {
        let etas: Vec<u64> = candidates
            .iter()
            .map(|candidate| manhattan_distance(candidate.location, pickup))
            .collect();
        let max_eta = etas.iter().copied().max().unwrap_or(0).max(1) as f64;
        let max_rides = candidates
            .iter()
            .map(|candidate| candidate.assigned_rides)
            .max()
            .unwrap_or(0)
            .max(1) as f64;

        let mut ranked: Vec<MatchCandidate> = candidates
            .iter()
            .zip(etas)
            .map(|(candidate, eta)| {
                let normalized_eta = eta as f64 / max_eta;
                let normalized_rides = f64::from(candidate.assigned_rides) / max_rides;
                MatchCandidate {
                    driver_id: candidate.driver_id.clone(),
                    eta,
                    components: ScoreComponents {
                        eta_cost: self.eta_weight * normalized_eta,
                        fairness_cost: self.fairness_weight * (1.0 - normalized_rides),
                    },
                }
            })
            .collect();
        sort_best_first(&mut ranked);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DriverId;

    fn candidate(id: &str, x: i64, y: i64, assigned_rides: u32) -> DriverCandidate {
        DriverCandidate {
            driver_id: DriverId::new(id),
            location: Location::new(x, y),
            assigned_rides,
        }
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn selects_closer_driver_when_ride_counts_match() {
        let matcher = FairnessWeightedMatching::default();
        let pickup = Location::new(0, 0);
        let drivers = vec![candidate("far", 10, 0, 0), candidate("near", 1, 1, 0)];

        assert_eq!(matcher.find_match(pickup, &drivers), Some(DriverId::new("near")));
    }

    #[test]
    fn scores_follow_weighted_formula() {
        let matcher = FairnessWeightedMatching::default();
        let pickup = Location::new(0, 0);
        // max_eta = 5, max_rides = 10
        let drivers = vec![candidate("a", 5, 0, 10), candidate("b", 3, 0, 0)];

        let ranked = matcher.rank(pickup, &drivers);
        let a = ranked
            .iter()
            .find(|c| c.driver_id == DriverId::new("a"))
            .expect("a ranked");
        let b = ranked
            .iter()
            .find(|c| c.driver_id == DriverId::new("b"))
            .expect("b ranked");

        assert_eq!(a.eta, 5);
        assert!(approx_eq(a.components.eta_cost, 0.7));
        assert!(approx_eq(a.components.fairness_cost, 0.0));
        assert_eq!(b.eta, 3);
        assert!(approx_eq(b.score(), 0.7 * 0.6 + 0.3));
        // 0.70 < 0.72: the weighting is a blend, not distance-first.
        assert_eq!(ranked[0].driver_id, DriverId::new("a"));
    }

    #[test]
    fn floors_keep_scores_defined_for_identical_drivers() {
        let matcher = FairnessWeightedMatching::default();
        let pickup = Location::new(4, 4);
        let drivers = vec![candidate("d2", 4, 4, 0), candidate("d1", 4, 4, 0)];

        let ranked = matcher.rank(pickup, &drivers);
        assert_eq!(ranked.len(), 2);
        for entry in &ranked {
            assert!(entry.score().is_finite());
            assert!(approx_eq(entry.score(), 0.3));
        }
        assert_eq!(ranked[0].driver_id, DriverId::new("d1"));
    }

    #[test]
    fn ties_break_on_lowest_driver_id_regardless_of_input_order() {
        let matcher = FairnessWeightedMatching::default();
        let pickup = Location::new(0, 0);
        let forward = vec![candidate("d1", 2, 0, 1), candidate("d3", 0, 2, 1)];
        let backward = vec![candidate("d3", 0, 2, 1), candidate("d1", 2, 0, 1)];

        assert_eq!(matcher.find_match(pickup, &forward), Some(DriverId::new("d1")));
        assert_eq!(matcher.find_match(pickup, &backward), Some(DriverId::new("d1")));
    }

    #[test]
    fn no_candidates_yields_no_match() {
        let matcher = FairnessWeightedMatching::default();
        assert!(matcher.rank(Location::new(0, 0), &[]).is_empty());
        assert_eq!(matcher.find_match(Location::new(0, 0), &[]), None);
    }
}
