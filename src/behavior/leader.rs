//! Leader behavior: search-and-mark.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::field::SharedField;
use crate::fleet::{DiscoverySensor, FleetError, MovementCommand, PositionSource};
use crate::geo::Boundary;
use crate::sim::Shutdown;

/// The searching-and-marking agent.
///
/// Runs a continuous cycle with no terminal state: pick a random target
/// inside the boundary, fly there, dwell long enough to arrive, read the
/// discovery sensor, and release a pheromone at the target when the reading
/// clears the threshold. With the virtual sensor every cycle marks; with the
/// proximity variant only cycles near the hidden target do.
pub struct Leader {
    id: usize,
    field: SharedField,
    boundary: Boundary,
    positions: Arc<dyn PositionSource>,
    movement: Arc<dyn MovementCommand>,
    sensor: Arc<dyn DiscoverySensor>,
    dwell: Duration,
    discovery_threshold: f64,
    target_altitude_m: f64,
    shutdown: Shutdown,
    rng: StdRng,
}

impl Leader {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        field: SharedField,
        boundary: Boundary,
        positions: Arc<dyn PositionSource>,
        movement: Arc<dyn MovementCommand>,
        sensor: Arc<dyn DiscoverySensor>,
        dwell: Duration,
        discovery_threshold: f64,
        target_altitude_m: f64,
        shutdown: Shutdown,
        rng: StdRng,
    ) -> Self {
        Leader {
            id,
            field,
            boundary,
            positions,
            movement,
            sensor,
            dwell,
            discovery_threshold,
            target_altitude_m,
            shutdown,
            rng,
        }
    }

    /// One search-and-mark cycle: pick a target, fly there, dwell, sense,
    /// mark. Returns early without marking when shutdown fires during the
    /// dwell.
    pub async fn cycle(&mut self) -> Result<(), FleetError> {
        let previous = self.positions.current_position(self.id).await?;
        let target = self
            .boundary
            .random_position_inside(&mut self.rng, self.target_altitude_m);
        self.movement.goto(self.id, target, previous).await?;

        // give the vehicle time to arrive before reading the sensor
        if !self.shutdown.sleep(self.dwell).await {
            return Ok(());
        }

        let discovery = self.sensor.sense(self.id).await?;
        if discovery >= self.discovery_threshold {
            self.field.lock().add_pheromone(&target, self.id);
            debug!(agent = self.id, discovery, "pheromone released at target");
        } else {
            debug!(agent = self.id, discovery, "nothing discovered at target");
        }
        Ok(())
    }

    /// Drives the cycle until shutdown. Transient fleet faults are logged
    /// and retried on the next cycle, never escalated.
    pub async fn run(mut self) {
        info!(agent = self.id, "leader task started");
        loop {
            if self.shutdown.is_triggered() {
                break;
            }
            if let Err(error) = self.cycle().await {
                warn!(agent = self.id, %error, "leader cycle failed, retrying");
                // pace the retry so a dead link does not busy-spin
                if !self.shutdown.sleep(self.dwell).await {
                    break;
                }
            }
        }
        info!(agent = self.id, "leader task stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::LEADER_ID;
    use crate::field::Field;
    use crate::fleet::{FleetLifecycle, SimulatedFleet, VirtualSensor};
    use crate::geo::Position;
    use crate::sim::ShutdownHandle;
    use rand::SeedableRng;

    fn spawn() -> Position {
        Position::new(47.397742, 8.545594, 488.0)
    }

    fn leader_over(fleet: Arc<SimulatedFleet>, handle: &ShutdownHandle) -> (Leader, SharedField) {
        let boundary = Boundary::around(&spawn(), 100.0);
        let field = Field::shared(20, boundary, 0.05);
        let leader = Leader::new(
            LEADER_ID,
            field.clone(),
            boundary,
            fleet.clone(),
            fleet,
            Arc::new(VirtualSensor),
            Duration::from_secs(1),
            0.5,
            490.5,
            handle.subscribe(),
            StdRng::seed_from_u64(7),
        );
        (leader, field)
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_marks_the_sampled_target() {
        let fleet = Arc::new(SimulatedFleet::new(&[14540], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let handle = ShutdownHandle::new();
        let (mut leader, field) = leader_over(fleet.clone(), &handle);

        leader.cycle().await.unwrap();

        // the vehicle sits on the sampled target and the marker is there
        let target = fleet.refresh_positions()[0];
        let field = field.lock();
        let markers = field.pheromones_at(&target);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].released_by(), LEADER_ID);
        assert!(field.has_foreign_pheromone(&target, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_surfaces_fleet_faults_without_marking() {
        // never activated: telemetry is down
        let fleet = Arc::new(SimulatedFleet::new(&[14540], spawn(), 2.5));
        let handle = ShutdownHandle::new();
        let (mut leader, field) = leader_over(fleet, &handle);

        assert_eq!(
            leader.cycle().await,
            Err(FleetError::ConnectionLost(LEADER_ID))
        );
        assert_eq!(field.lock().snapshot().active_patches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let fleet = Arc::new(SimulatedFleet::new(&[14540], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let handle = ShutdownHandle::new();
        let (leader, _field) = leader_over(fleet, &handle);

        let task = tokio::spawn(leader.run());
        tokio::time::sleep(Duration::from_secs(3)).await;
        handle.trigger();
        task.await.unwrap();
    }
}
