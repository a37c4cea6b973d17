//! Scenario configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Telemetry address assigned to agent 0 when no explicit list is given;
/// further agents count up from here.
pub const BASE_AGENT_ADDRESS: u32 = 14540;

/// Everything a simulation run is parameterized by.
///
/// `Default` is the reference scenario: two agents over a 100 m square split
/// into a 20×20 grid, markers fading in 20 one-second sweeps. Invalid values
/// are rejected by [`validate`](SimulationConfig::validate) before anything
/// starts.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side of the square working area, meters.
    pub side_length_m: f64,
    /// Patches per side of the field grid.
    pub grid_size: usize,
    /// Intensity every pheromone loses per decay tick.
    pub evaporation_rate: f64,
    /// Total number of agents, leader included.
    pub agent_count: usize,
    /// Explicit telemetry addresses; length must equal `agent_count`.
    pub agent_addresses: Option<Vec<u32>>,
    /// Climb over the spawn altitude commanded at activation; sampled
    /// targets fly at this level too.
    pub cruise_altitude_m: f64,
    /// How long the leader waits at a sampled target before sensing.
    pub leader_dwell: Duration,
    /// Searching followers poll the field at this interval.
    pub follower_poll: Duration,
    /// Holding followers re-affirm the hold at this (longer) interval.
    pub hold_reaffirm: Duration,
    /// Cadence of the global decay sweep.
    pub decay_tick: Duration,
    /// Wait between fleet activation and behavior start.
    pub settle: Duration,
    /// Minimum discovery reading that makes the leader mark the field.
    pub discovery_threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            side_length_m: 100.0,
            grid_size: 20,
            evaporation_rate: 0.05,
            agent_count: 2,
            agent_addresses: None,
            cruise_altitude_m: 2.5,
            leader_dwell: Duration::from_secs(5),
            follower_poll: Duration::from_secs(1),
            hold_reaffirm: Duration::from_secs(10),
            decay_tick: Duration::from_secs(1),
            settle: Duration::from_secs(2),
            discovery_threshold: 0.5,
        }
    }
}

/// Rejected configurations. Construction fails fast; the simulation never
/// starts on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("side length must be positive, got {0}")]
    NonPositiveSideLength(f64),
    #[error("grid size must be positive")]
    ZeroGridSize,
    #[error("evaporation rate must be in (0, 1], got {0}")]
    EvaporationRateOutOfRange(f64),
    #[error("at least one agent is required")]
    NoAgents,
    #[error("expected {expected} agent addresses, got {got}")]
    AddressCountMismatch { expected: usize, got: usize },
    #[error("interval `{0}` must be positive")]
    NonPositiveInterval(&'static str),
    #[error("discovery threshold must be in (0, 1], got {0}")]
    DiscoveryThresholdOutOfRange(f64),
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl SimulationConfig {
    /// Parses a scenario from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every construction-time rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.side_length_m > 0.0) {
            return Err(ConfigError::NonPositiveSideLength(self.side_length_m));
        }
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if !(self.evaporation_rate > 0.0 && self.evaporation_rate <= 1.0) {
            return Err(ConfigError::EvaporationRateOutOfRange(self.evaporation_rate));
        }
        if self.agent_count == 0 {
            return Err(ConfigError::NoAgents);
        }
        if let Some(addresses) = &self.agent_addresses {
            if addresses.len() != self.agent_count {
                return Err(ConfigError::AddressCountMismatch {
                    expected: self.agent_count,
                    got: addresses.len(),
                });
            }
        }
        for (name, interval) in [
            ("leader_dwell", self.leader_dwell),
            ("follower_poll", self.follower_poll),
            ("hold_reaffirm", self.hold_reaffirm),
            ("decay_tick", self.decay_tick),
            ("settle", self.settle),
        ] {
            if interval.is_zero() {
                return Err(ConfigError::NonPositiveInterval(name));
            }
        }
        if !(self.discovery_threshold > 0.0 && self.discovery_threshold <= 1.0) {
            return Err(ConfigError::DiscoveryThresholdOutOfRange(
                self.discovery_threshold,
            ));
        }
        Ok(())
    }

    /// Telemetry addresses in agent order: the configured list, or the
    /// deterministic incremental scheme starting at [`BASE_AGENT_ADDRESS`].
    pub fn agent_addresses(&self) -> Vec<u32> {
        match &self.agent_addresses {
            Some(addresses) => addresses.clone(),
            None => (0..self.agent_count)
                .map(|i| BASE_AGENT_ADDRESS + i as u32)
                .collect(),
        }
    }
}
