//! Scenario setup: dispatch configuration and seeded random worlds.

mod build;
mod params;

pub use build::{build_scenario, random_destination, random_location};
pub use params::{
    DispatchConfig, DriverDecisionConfig, MatchingAlgorithmType, ScenarioParams,
    DEFAULT_MAX_REJECTION_ATTEMPTS,
};
