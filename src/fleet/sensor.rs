//! Discovery sensing.
//!
//! The leader decides whether to mark the field through a named sensor seam
//! rather than a bare callable, so the virtual-sensing reference behavior
//! and a real proximity scan are swappable implementations of one trait.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rand_distr::{Distribution, UnitDisc};

use crate::geo::Position;

use super::{FleetError, PositionSource};

/// Scalar proximity signal in `[0, 1]`: 1.0 on top of the target, decaying
/// with distance. The leader releases a pheromone when a reading clears its
/// configured threshold.
#[async_trait]
pub trait DiscoverySensor: Send + Sync {
    async fn sense(&self, agent: usize) -> Result<f64, FleetError>;
}

/// Virtual sensing: the reference leader always "finds" the region it flew
/// to, so every reading is 1.0 and every cycle marks.
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualSensor;

#[async_trait]
impl DiscoverySensor for VirtualSensor {
    async fn sense(&self, _agent: usize) -> Result<f64, FleetError> {
        Ok(1.0)
    }
}

/// Proximity variant: `exp(-distance / characteristic_length)` against a
/// hidden target the swarm has to converge on.
pub struct ProximitySensor {
    target: Position,
    characteristic_length_m: f64,
    positions: Arc<dyn PositionSource>,
}

impl ProximitySensor {
    pub fn new(
        target: Position,
        characteristic_length_m: f64,
        positions: Arc<dyn PositionSource>,
    ) -> Self {
        ProximitySensor {
            target,
            characteristic_length_m,
            positions,
        }
    }

    /// Spawns a hidden target uniformly inside a disc of `max_radius_m`
    /// around `reference`, at the reference altitude.
    pub fn spawn_target<R: Rng + ?Sized>(
        reference: &Position,
        max_radius_m: f64,
        rng: &mut R,
    ) -> Position {
        let [dx, dy]: [f64; 2] = UnitDisc.sample(rng);
        reference.increment_m(dx * max_radius_m, dy * max_radius_m, 0.0)
    }

    pub fn target(&self) -> Position {
        self.target
    }
}

#[async_trait]
impl DiscoverySensor for ProximitySensor {
    async fn sense(&self, agent: usize) -> Result<f64, FleetError> {
        let position = self.positions.current_position(agent).await?;
        let distance = position.distance_2d_m(&self.target);
        Ok((-distance / self.characteristic_length_m).exp())
    }
}
