//! Follower behavior: random walk, then hold.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::field::SharedField;
use crate::fleet::{FleetError, MovementCommand, PositionSource};
use crate::geo::Boundary;
use crate::sim::Shutdown;

/// Behavioral state of a follower. The transition is one-way for the run:
/// a recruited follower stays put until shutdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowerState {
    /// Random-walking the boundary, polling for foreign markers.
    Searching,
    /// Recruited: holding position as a beacon for the rest of the swarm.
    Holding,
}

/// A recruitable agent.
///
/// While `Searching` it polls the field at its current position on every
/// tick: a foreign marker means another agent was here recently, so the
/// follower marks the same cell (propagating the signal), stops and holds.
/// Otherwise it flies to a fresh uniformly random position and keeps
/// looking. While `Holding` it only re-affirms the hold on a longer
/// interval.
pub struct Follower {
    id: usize,
    field: SharedField,
    boundary: Boundary,
    positions: Arc<dyn PositionSource>,
    movement: Arc<dyn MovementCommand>,
    poll: Duration,
    hold_reaffirm: Duration,
    target_altitude_m: f64,
    shutdown: Shutdown,
    rng: StdRng,
    state: FollowerState,
}

impl Follower {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        field: SharedField,
        boundary: Boundary,
        positions: Arc<dyn PositionSource>,
        movement: Arc<dyn MovementCommand>,
        poll: Duration,
        hold_reaffirm: Duration,
        target_altitude_m: f64,
        shutdown: Shutdown,
        rng: StdRng,
    ) -> Self {
        Follower {
            id,
            field,
            boundary,
            positions,
            movement,
            poll,
            hold_reaffirm,
            target_altitude_m,
            shutdown,
            rng,
            state: FollowerState::Searching,
        }
    }

    pub fn state(&self) -> FollowerState {
        self.state
    }

    /// One searching tick: check the current cell for foreign markers,
    /// recruit or walk on. Returns the state after the tick.
    ///
    /// The check and the recruitment release happen under one field lock
    /// acquisition, so the marker that triggered the transition cannot decay
    /// away between the two.
    pub async fn step(&mut self) -> Result<FollowerState, FleetError> {
        let current = self.positions.current_position(self.id).await?;

        let recruited = {
            let mut field = self.field.lock();
            if field.has_foreign_pheromone(&current, self.id) {
                field.add_pheromone(&current, self.id);
                true
            } else {
                false
            }
        };

        if recruited {
            self.state = FollowerState::Holding;
            info!(agent = self.id, "foreign pheromone found, recruiting");
        } else {
            let target = self
                .boundary
                .random_position_inside(&mut self.rng, self.target_altitude_m);
            self.movement.goto(self.id, target, current).await?;
        }
        Ok(self.state)
    }

    /// Drives the state machine until shutdown. Transient fleet faults are
    /// logged and retried on the next tick.
    pub async fn run(mut self) {
        info!(agent = self.id, "follower task started");
        loop {
            if self.shutdown.is_triggered() {
                break;
            }
            match self.state {
                FollowerState::Searching => {
                    match self.step().await {
                        // recruited: issue the hold right away, no poll wait
                        Ok(FollowerState::Holding) => continue,
                        Ok(FollowerState::Searching) => {}
                        Err(error) => {
                            warn!(agent = self.id, %error, "follower tick failed, retrying");
                        }
                    }
                    if !self.shutdown.sleep(self.poll).await {
                        break;
                    }
                }
                FollowerState::Holding => {
                    if let Err(error) = self.movement.hold(self.id).await {
                        warn!(agent = self.id, %error, "hold re-affirmation failed");
                    }
                    if !self.shutdown.sleep(self.hold_reaffirm).await {
                        break;
                    }
                }
            }
        }
        info!(agent = self.id, "follower task stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::fleet::{FleetLifecycle, SimulatedFleet};
    use crate::geo::Position;
    use crate::sim::ShutdownHandle;
    use rand::SeedableRng;

    fn spawn() -> Position {
        Position::new(47.397742, 8.545594, 488.0)
    }

    fn follower_over(
        id: usize,
        fleet: Arc<SimulatedFleet>,
        field: SharedField,
        handle: &ShutdownHandle,
    ) -> Follower {
        let boundary = *field.lock().boundary();
        Follower::new(
            id,
            field,
            boundary,
            fleet.clone(),
            fleet,
            Duration::from_secs(1),
            Duration::from_secs(10),
            490.5,
            handle.subscribe(),
            StdRng::seed_from_u64(11),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn searching_walks_when_the_cell_is_clean() {
        let fleet = Arc::new(SimulatedFleet::new(&[14540, 14541], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let field = Field::shared(20, Boundary::around(&spawn(), 100.0), 0.05);
        let handle = ShutdownHandle::new();
        let mut follower = follower_over(1, fleet.clone(), field, &handle);

        let before = fleet.refresh_positions()[1];
        assert_eq!(follower.step().await.unwrap(), FollowerState::Searching);
        let after = fleet.refresh_positions()[1];
        assert_ne!(before, after, "a clean cell must trigger a new walk leg");
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_marker_recruits_and_makes_a_beacon() {
        let fleet = Arc::new(SimulatedFleet::new(&[14540, 14541], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let field = Field::shared(20, Boundary::around(&spawn(), 100.0), 0.05);
        let handle = ShutdownHandle::new();

        // the leader marked the cell the follower happens to be in
        let here = fleet.refresh_positions()[1];
        field.lock().add_pheromone(&here, 0);

        let mut follower = follower_over(1, fleet.clone(), field.clone(), &handle);
        assert_eq!(follower.step().await.unwrap(), FollowerState::Holding);

        // the recruit left its own marker next to the leader's
        let guard = field.lock();
        assert_eq!(guard.pheromones_at(&here).len(), 2);
        assert!(guard.has_foreign_pheromone(&here, 0));
        // and stayed put
        drop(guard);
        assert_eq!(fleet.refresh_positions()[1], here);
    }

    #[tokio::test(start_paused = true)]
    async fn own_marker_alone_never_recruits() {
        let fleet = Arc::new(SimulatedFleet::new(&[14540, 14541], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let field = Field::shared(20, Boundary::around(&spawn(), 100.0), 0.05);
        let handle = ShutdownHandle::new();

        let here = fleet.refresh_positions()[1];
        field.lock().add_pheromone(&here, 1); // the follower's own

        let mut follower = follower_over(1, fleet, field, &handle);
        assert_eq!(follower.step().await.unwrap(), FollowerState::Searching);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown_from_either_state() {
        let fleet = Arc::new(SimulatedFleet::new(&[14540, 14541], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let field = Field::shared(20, Boundary::around(&spawn(), 100.0), 0.05);
        let handle = ShutdownHandle::new();

        let searching = follower_over(1, fleet.clone(), field.clone(), &handle);
        let task = tokio::spawn(searching.run());
        tokio::time::sleep(Duration::from_secs(2)).await;
        handle.trigger();
        task.await.unwrap();
    }
}
