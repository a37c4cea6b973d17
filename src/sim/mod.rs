//! Simulation assembly: configuration, cancellation, the coordination loop.

pub mod config;
pub mod engine;
pub mod recruitment_test;
pub mod shutdown;

pub use config::{ConfigError, SimulationConfig, BASE_AGENT_ADDRESS};
pub use engine::{RunState, Simulation};
pub use shutdown::{Shutdown, ShutdownHandle};
