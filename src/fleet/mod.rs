//! External fleet interfaces.
//!
//! The engine never talks to a flight stack directly: telemetry, movement
//! and lifecycle commands go through these seams, so a real vehicle link and
//! the in-memory [`SimulatedFleet`] backend are interchangeable.

pub mod render;
pub mod sensor;
pub mod sim;

pub use render::{LogRenderer, NullRenderer};
pub use sensor::{DiscoverySensor, ProximitySensor, VirtualSensor};
pub use sim::SimulatedFleet;

use async_trait::async_trait;
use thiserror::Error;

use crate::field::FieldSnapshot;
use crate::geo::Position;

/// Transient fleet I/O failures.
///
/// All of these are recoverable: the affected agent task logs the fault and
/// retries on its next loop iteration. None of them abort the simulation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FleetError {
    /// Telemetry for the agent is currently unavailable.
    #[error("telemetry connection lost for agent {0}")]
    ConnectionLost(usize),
    /// The flight stack refused the command.
    #[error("command rejected for agent {0}")]
    CommandRejected(usize),
    /// The command was sent but not acknowledged in time.
    #[error("command timed out for agent {0}")]
    Timeout(usize),
}

/// Telemetry reads. A fresh [`Position`] is produced on every call; there
/// is no implicit caching, call sites that want a stable snapshot keep the
/// value they fetched.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self, agent: usize) -> Result<Position, FleetError>;
}

/// Movement commands.
#[async_trait]
pub trait MovementCommand: Send + Sync {
    /// Sends the agent toward `target`. The heading is derived from the
    /// bearing between `previous` and `target`.
    async fn goto(&self, agent: usize, target: Position, previous: Position)
        -> Result<(), FleetError>;

    /// Tells the agent to keep station at its current location. Holding
    /// followers re-affirm this periodically.
    async fn hold(&self, agent: usize) -> Result<(), FleetError>;
}

/// Coarse-grained start/stop of the whole agent set.
#[async_trait]
pub trait FleetLifecycle: Send + Sync {
    /// Arms and activates every vehicle.
    async fn activate_all(&self) -> Result<(), FleetError>;

    /// Grounds the whole fleet.
    async fn deactivate_all(&self) -> Result<(), FleetError>;
}

/// Best-effort sink for field snapshots.
///
/// Implementations should return quickly; failures are logged by the decay
/// routine and never stop the simulation.
pub trait Renderer: Send + Sync {
    fn publish(&self, snapshot: &FieldSnapshot) -> anyhow::Result<()>;
}
