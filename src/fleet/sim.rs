//! In-memory fleet backend.
//!
//! Stands in for a real flight stack in tests and demos: vehicles are table
//! entries, movement is an (optionally delayed) teleport to the commanded
//! target, telemetry reads the table. Deactivated vehicles answer telemetry
//! with [`FleetError::ConnectionLost`], which is how tests exercise the
//! recoverable-fault paths.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::geo::Position;

use super::{FleetError, FleetLifecycle, MovementCommand, PositionSource};

#[derive(Clone, Copy, Debug)]
struct Vehicle {
    address: u32,
    position: Position,
    active: bool,
}

/// Simulated agent fleet.
///
/// Positions live behind one lock; the separate `last snapshot` table backs
/// the explicit refresh/accessor split: [`refresh_positions`] reads the
/// vehicles and caches the result, [`positions`] only ever returns what the
/// last refresh saw.
///
/// [`refresh_positions`]: SimulatedFleet::refresh_positions
/// [`positions`]: SimulatedFleet::positions
pub struct SimulatedFleet {
    vehicles: RwLock<Vec<Vehicle>>,
    last_snapshot: RwLock<Vec<Position>>,
    cruise_altitude_m: f64,
    command_latency: Duration,
}

impl SimulatedFleet {
    /// One parked, inactive vehicle per address, all at `spawn`.
    /// `cruise_altitude_m` is the climb over spawn commanded at activation.
    pub fn new(addresses: &[u32], spawn: Position, cruise_altitude_m: f64) -> Self {
        info!(vehicles = addresses.len(), "creating simulated fleet");
        let vehicles = addresses
            .iter()
            .map(|&address| Vehicle {
                address,
                position: spawn,
                active: false,
            })
            .collect::<Vec<_>>();
        let last_snapshot = vehicles.iter().map(|v| v.position).collect();
        SimulatedFleet {
            vehicles: RwLock::new(vehicles),
            last_snapshot: RwLock::new(last_snapshot),
            cruise_altitude_m,
            command_latency: Duration::ZERO,
        }
    }

    /// Adds a fixed acknowledgment delay to every movement command.
    pub fn with_command_latency(mut self, latency: Duration) -> Self {
        self.command_latency = latency;
        self
    }

    pub fn agent_count(&self) -> usize {
        self.vehicles.read().len()
    }

    /// Reads every vehicle and caches the result as the current snapshot.
    pub fn refresh_positions(&self) -> Vec<Position> {
        let fresh: Vec<Position> = self.vehicles.read().iter().map(|v| v.position).collect();
        *self.last_snapshot.write() = fresh.clone();
        fresh
    }

    /// The snapshot taken by the last [`refresh_positions`] call, without
    /// touching the vehicles.
    ///
    /// [`refresh_positions`]: SimulatedFleet::refresh_positions
    pub fn positions(&self) -> Vec<Position> {
        self.last_snapshot.read().clone()
    }

    /// Teleports one vehicle. Test scripting hook: drives an agent onto a
    /// chosen patch without waiting for its random walk to get there.
    pub fn place(&self, agent: usize, position: Position) {
        if let Some(vehicle) = self.vehicles.write().get_mut(agent) {
            vehicle.position = position;
        }
    }
}

#[async_trait]
impl PositionSource for SimulatedFleet {
    async fn current_position(&self, agent: usize) -> Result<Position, FleetError> {
        let vehicles = self.vehicles.read();
        match vehicles.get(agent) {
            Some(vehicle) if vehicle.active => Ok(vehicle.position),
            _ => Err(FleetError::ConnectionLost(agent)),
        }
    }
}

#[async_trait]
impl MovementCommand for SimulatedFleet {
    async fn goto(
        &self,
        agent: usize,
        target: Position,
        previous: Position,
    ) -> Result<(), FleetError> {
        if !self.command_latency.is_zero() {
            tokio::time::sleep(self.command_latency).await;
        }
        let yaw_deg = target.goto_yaw_deg(&previous);
        let mut vehicles = self.vehicles.write();
        match vehicles.get_mut(agent) {
            Some(vehicle) if vehicle.active => {
                debug!(agent, address = vehicle.address, yaw_deg, "goto");
                vehicle.position = target;
                Ok(())
            }
            _ => Err(FleetError::CommandRejected(agent)),
        }
    }

    async fn hold(&self, agent: usize) -> Result<(), FleetError> {
        let vehicles = self.vehicles.read();
        match vehicles.get(agent) {
            Some(vehicle) if vehicle.active => {
                debug!(agent, address = vehicle.address, "holding station");
                Ok(())
            }
            _ => Err(FleetError::CommandRejected(agent)),
        }
    }
}

#[async_trait]
impl FleetLifecycle for SimulatedFleet {
    async fn activate_all(&self) -> Result<(), FleetError> {
        let mut vehicles = self.vehicles.write();
        info!(vehicles = vehicles.len(), "arming and activating fleet");
        for vehicle in vehicles.iter_mut() {
            vehicle.active = true;
            vehicle.position = vehicle.position.increment_m(0.0, 0.0, self.cruise_altitude_m);
        }
        Ok(())
    }

    async fn deactivate_all(&self) -> Result<(), FleetError> {
        let mut vehicles = self.vehicles.write();
        info!(vehicles = vehicles.len(), "deactivating fleet");
        for vehicle in vehicles.iter_mut() {
            vehicle.active = false;
        }
        Ok(())
    }
}
