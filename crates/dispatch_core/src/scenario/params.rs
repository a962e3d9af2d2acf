use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::spatial::GridInfo;

/// Default number of distinct driver rejections before a request fails.
pub const DEFAULT_MAX_REJECTION_ATTEMPTS: usize = 3;

/// Type of matching algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingAlgorithmType {
    #[default]
    FairnessWeighted,
    Nearest,
}

/// Driver-side accept/decline behaviour on the auto-assign path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverDecisionConfig {
    /// Matched drivers decline pickups farther than this many grid units.
    /// `None` means every matched driver accepts.
    pub max_pickup_distance: Option<u64>,
}

impl DriverDecisionConfig {
    pub fn accepts(&self, pickup_distance: u64) -> bool {
        self.max_pickup_distance
            .map_or(true, |limit| pickup_distance <= limit)
    }
}

/// Dispatch tuning, loaded once per session.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use dispatch_core::scenario::DispatchConfig;
///
/// let config: DispatchConfig =
///     serde_json::from_str(r#"{ "max_rejection_attempts": 5 }"#).unwrap();
/// assert_eq!(config.max_rejection_attempts, 5);
/// assert_eq!(config.eta_weight, 0.7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub eta_weight: f64,
    pub fairness_weight: f64,
    pub max_rejection_attempts: usize,
    pub matching_algorithm: MatchingAlgorithmType,
    pub driver_decision: DriverDecisionConfig,
    pub grid: GridInfo,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            eta_weight: 0.7,
            fairness_weight: 0.3,
            max_rejection_attempts: DEFAULT_MAX_REJECTION_ATTEMPTS,
            matching_algorithm: MatchingAlgorithmType::default(),
            driver_decision: DriverDecisionConfig::default(),
            grid: GridInfo::default(),
        }
    }
}

impl DispatchConfig {
    pub fn with_weights(mut self, eta_weight: f64, fairness_weight: f64) -> Self {
        self.eta_weight = eta_weight;
        self.fairness_weight = fairness_weight;
        self
    }

    pub fn with_max_rejection_attempts(mut self, attempts: usize) -> Self {
        self.max_rejection_attempts = attempts;
        self
    }

    pub fn with_matching_algorithm(mut self, algorithm: MatchingAlgorithmType) -> Self {
        self.matching_algorithm = algorithm;
        self
    }

    pub fn with_max_pickup_distance(mut self, distance: u64) -> Self {
        self.driver_decision.max_pickup_distance = Some(distance);
        self
    }

    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.grid = GridInfo { width, height };
        self
    }
}

/// Parameters for seeding a scenario with random drivers and riders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioParams {
    pub num_drivers: usize,
    pub num_riders: usize,
    /// Seed for RNG (for reproducibility).
    pub seed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_drivers: 10,
            num_riders: 20,
            seed: 0,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_drivers(mut self, num_drivers: usize) -> Self {
        self.num_drivers = num_drivers;
        self
    }

    pub fn with_riders(mut self, num_riders: usize) -> Self {
        self.num_riders = num_riders;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let raw = r#"{
            "matching_algorithm": "nearest",
            "driver_decision": { "max_pickup_distance": 20 }
        }"#;
        let config: DispatchConfig = serde_json::from_str(raw).expect("config");
        assert_eq!(config.matching_algorithm, MatchingAlgorithmType::Nearest);
        assert_eq!(config.driver_decision.max_pickup_distance, Some(20));
        assert_eq!(config.max_rejection_attempts, DEFAULT_MAX_REJECTION_ATTEMPTS);
        assert_eq!(config.grid, GridInfo::default());
    }

    #[test]
    fn driver_decision_accepts_within_limit() {
        let open = DriverDecisionConfig::default();
        assert!(open.accepts(1_000));

        let limited = DriverDecisionConfig {
            max_pickup_distance: Some(20),
        };
        assert!(limited.accepts(20));
        assert!(!limited.accepts(21));
    }
}
