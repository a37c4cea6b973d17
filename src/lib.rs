//! Stigmergy Core: decentralized fleet coordination through a shared
//! pheromone field.
//!
//! Agents never message each other. A leader drops decaying markers where
//! its search succeeds; followers random-walk the working area until they
//! cross a foreign marker, then stop, mark the same cell and hold. Each
//! recruit becomes a beacon that recruits the next. The only shared state is
//! the field itself, swept by a periodic decay routine so stale trails fade
//! on their own.
//!
//! The crate splits along that structure: [`geo`] for positions and the
//! working boundary, [`field`] for markers and the grid, [`fleet`] for the
//! external vehicle/renderer seams (plus an in-memory backend), [`behavior`]
//! for the leader and follower state machines, and [`sim`] for configuration
//! and the coordination loop that supervises every task.

pub mod behavior;
pub mod field;
pub mod fleet;
pub mod geo;
pub mod sim;

pub use behavior::{Follower, FollowerState, Leader, LEADER_ID};
pub use field::{Field, FieldSnapshot, Patch, Pheromone, SharedField};
pub use fleet::{
    DiscoverySensor, FleetError, FleetLifecycle, LogRenderer, MovementCommand, NullRenderer,
    PositionSource, ProximitySensor, Renderer, SimulatedFleet, VirtualSensor,
};
pub use geo::{deg_to_m, m_to_deg, Boundary, Position, METERS_PER_DEGREE};
pub use sim::{
    ConfigError, RunState, Shutdown, ShutdownHandle, Simulation, SimulationConfig,
    BASE_AGENT_ADDRESS,
};

/// Installs a global tracing subscriber honoring `RUST_LOG`.
///
/// Embedders call this once at startup; anything that brings its own
/// subscriber just skips it. Repeated calls are harmless.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
