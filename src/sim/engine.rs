//! The coordination loop.
//!
//! Owns the pheromone field and supervises every concurrent task of a run:
//! one leader, one follower per remaining agent, and the periodic decay
//! routine. After startup control is fully decentralized: the loop only
//! spawns tasks and waits for them to wind down on shutdown.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::behavior::{Follower, Leader, LEADER_ID};
use crate::field::{Field, SharedField};
use crate::fleet::{
    DiscoverySensor, FleetLifecycle, MovementCommand, PositionSource, Renderer,
};
use crate::geo::Boundary;

use super::config::SimulationConfig;
use super::shutdown::Shutdown;
use super::ConfigError;

/// Lifecycle of one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Terminated,
}

/// One simulation run over a fleet.
///
/// Construction validates the configuration and wires the external
/// collaborators; [`run`](Simulation::run) does everything else. The
/// boundary and the field only exist once the first agent's spawn position
/// is known, which is why they are built inside `run` rather than here.
pub struct Simulation {
    config: SimulationConfig,
    positions: Arc<dyn PositionSource>,
    movement: Arc<dyn MovementCommand>,
    lifecycle: Arc<dyn FleetLifecycle>,
    sensor: Arc<dyn DiscoverySensor>,
    renderer: Arc<dyn Renderer>,
    state: RunState,
    field: Option<SharedField>,
}

impl Simulation {
    /// Fails fast on an invalid configuration; nothing is started here.
    pub fn new(
        config: SimulationConfig,
        positions: Arc<dyn PositionSource>,
        movement: Arc<dyn MovementCommand>,
        lifecycle: Arc<dyn FleetLifecycle>,
        sensor: Arc<dyn DiscoverySensor>,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Simulation {
            config,
            positions,
            movement,
            lifecycle,
            sensor,
            renderer,
            state: RunState::NotStarted,
            field: None,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The shared field of the current run, once `run` has built it.
    pub fn field(&self) -> Option<SharedField> {
        self.field.clone()
    }

    /// Runs the simulation until `shutdown` fires, then joins every task and
    /// grounds the fleet.
    pub async fn run(&mut self, shutdown: Shutdown) -> anyhow::Result<()> {
        self.state = RunState::Running;
        let result = self.run_inner(shutdown).await;
        self.state = RunState::Terminated;
        result
    }

    async fn run_inner(&mut self, shutdown: Shutdown) -> anyhow::Result<()> {
        let mut startup = shutdown.clone();
        info!(agents = self.config.agent_count, "activating fleet");
        self.lifecycle.activate_all().await?;

        // let the fleet settle before trusting the spawn position
        startup.sleep(self.config.settle).await;

        // spawn telemetry faults are as transient as any other fleet fault:
        // keep retrying until the fix arrives or shutdown fires
        let spawn = loop {
            if startup.is_triggered() {
                self.lifecycle.deactivate_all().await?;
                return Ok(());
            }
            match self.positions.current_position(LEADER_ID).await {
                Ok(position) => break position,
                Err(error) => {
                    warn!(%error, "spawn telemetry unavailable, retrying");
                    startup.sleep(self.config.settle).await;
                }
            }
        };
        let boundary = Boundary::around(&spawn, self.config.side_length_m);
        let field = Field::shared(self.config.grid_size, boundary, self.config.evaporation_rate);
        self.field = Some(field.clone());
        let target_altitude_m = spawn.absolute_altitude_m + self.config.cruise_altitude_m;
        info!(
            side_m = self.config.side_length_m,
            grid = self.config.grid_size,
            "boundary fixed around spawn, launching agent tasks"
        );

        let mut tasks = JoinSet::new();

        let leader = Leader::new(
            LEADER_ID,
            field.clone(),
            boundary,
            self.positions.clone(),
            self.movement.clone(),
            self.sensor.clone(),
            self.config.leader_dwell,
            self.config.discovery_threshold,
            target_altitude_m,
            shutdown.clone(),
            StdRng::from_entropy(),
        );
        tasks.spawn(leader.run());

        for id in 1..self.config.agent_count {
            let follower = Follower::new(
                id,
                field.clone(),
                boundary,
                self.positions.clone(),
                self.movement.clone(),
                self.config.follower_poll,
                self.config.hold_reaffirm,
                target_altitude_m,
                shutdown.clone(),
                StdRng::from_entropy(),
            );
            tasks.spawn(follower.run());
        }

        tasks.spawn(decay_routine(
            field,
            self.config.decay_tick,
            self.renderer.clone(),
            shutdown,
        ));

        // every task exits on its own once the signal fires
        while tasks.join_next().await.is_some() {}

        self.lifecycle.deactivate_all().await?;
        info!("simulation terminated");
        Ok(())
    }
}

/// The one writer that touches every patch: sweeps the whole field at a
/// fixed cadence under the exclusive lock, then publishes the snapshot with
/// the lock already released.
async fn decay_routine(
    field: SharedField,
    cadence: Duration,
    renderer: Arc<dyn Renderer>,
    mut shutdown: Shutdown,
) {
    info!(?cadence, "decay routine started");
    let mut ticker = tokio::time::interval(cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.triggered() => break,
        }
        let snapshot = {
            let mut field = field.lock();
            field.decay_sweep();
            field.snapshot()
        };
        if let Err(error) = renderer.publish(&snapshot) {
            warn!(%error, "renderer publish failed, ignoring");
        }
    }
    info!("decay routine stopped");
}
