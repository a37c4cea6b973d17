//! End-to-end recruitment scenarios.
//!
//! Drives the real behaviors over the simulated fleet and a shared field:
//! the leader marks a region, a follower stumbles onto the marker, recruits,
//! and becomes a beacon itself, without any agent-to-agent messaging.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::behavior::{Follower, FollowerState, Leader, LEADER_ID};
    use crate::field::Field;
    use crate::fleet::{FleetLifecycle, PositionSource, SimulatedFleet, VirtualSensor};
    use crate::geo::{Boundary, Position};
    use crate::sim::ShutdownHandle;

    fn spawn() -> Position {
        Position::new(47.397742, 8.545594, 488.0)
    }

    #[tokio::test(start_paused = true)]
    async fn leader_marks_follower_recruits_and_stays_terminal() {
        crate::init_tracing();
        let fleet = Arc::new(SimulatedFleet::new(&[14540, 14541], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let boundary = Boundary::around(&spawn(), 100.0);
        let field = Field::shared(20, boundary, 0.05);
        let handle = ShutdownHandle::new();

        // the leader flies one full cycle and marks its target
        let mut leader = Leader::new(
            LEADER_ID,
            field.clone(),
            boundary,
            fleet.clone(),
            fleet.clone(),
            Arc::new(VirtualSensor),
            Duration::from_secs(1),
            0.5,
            490.5,
            handle.subscribe(),
            StdRng::seed_from_u64(21),
        );
        leader.cycle().await.unwrap();
        let target = fleet.current_position(LEADER_ID).await.unwrap();
        assert!(field.lock().has_foreign_pheromone(&target, 1));

        // a follower's random walk lands it on the marked cell
        fleet.place(1, target);
        let mut follower = Follower::new(
            1,
            field.clone(),
            boundary,
            fleet.clone(),
            fleet.clone(),
            Duration::from_secs(1),
            Duration::from_secs(10),
            490.5,
            handle.subscribe(),
            StdRng::seed_from_u64(22),
        );
        assert_eq!(follower.step().await.unwrap(), FollowerState::Holding);

        // both markers coexist in the cell, and the recruit is now a beacon
        // from everyone else's point of view
        {
            let guard = field.lock();
            assert_eq!(guard.pheromones_at(&target).len(), 2);
            assert!(guard.has_foreign_pheromone(&target, LEADER_ID));
        }

        // terminal: the follower's own marker never re-triggers anything,
        // even after the leader's marker has fully decayed
        for _ in 0..20 {
            field.lock().decay_sweep();
        }
        assert_eq!(follower.state(), FollowerState::Holding);
        assert!(field.lock().pheromones_at(&target).is_empty());
        assert_eq!(fleet.current_position(1).await.unwrap(), target);
    }

    #[tokio::test(start_paused = true)]
    async fn marker_decays_before_anyone_finds_it() {
        let fleet = Arc::new(SimulatedFleet::new(&[14540, 14541], spawn(), 2.5));
        fleet.activate_all().await.unwrap();
        let boundary = Boundary::around(&spawn(), 100.0);
        let field = Field::shared(20, boundary, 0.05);

        let somewhere = fleet.current_position(0).await.unwrap();
        field.lock().add_pheromone(&somewhere, LEADER_ID);

        // nobody visits for a full lifetime: the trail goes cold
        for _ in 0..20 {
            field.lock().decay_sweep();
        }
        let handle = ShutdownHandle::new();
        let mut follower = Follower::new(
            1,
            field.clone(),
            boundary,
            fleet.clone(),
            fleet.clone(),
            Duration::from_secs(1),
            Duration::from_secs(10),
            490.5,
            handle.subscribe(),
            StdRng::seed_from_u64(5),
        );
        fleet.place(1, somewhere);
        assert_eq!(follower.step().await.unwrap(), FollowerState::Searching);
    }

    #[tokio::test(start_paused = true)]
    async fn whole_swarm_recruits_through_a_chain_of_beacons() {
        // three followers; only the first ever sees the leader's marker, the
        // others recruit off follower beacons. Discovery propagates with no
        // direct communication anywhere
        let fleet = Arc::new(SimulatedFleet::new(
            &[14540, 14541, 14542, 14543],
            spawn(),
            2.5,
        ));
        fleet.activate_all().await.unwrap();
        let boundary = Boundary::around(&spawn(), 100.0);
        let field = Field::shared(20, boundary, 0.05);
        let handle = ShutdownHandle::new();

        let rendezvous = spawn().increment_m(20.0 + 1e-3, 20.0 + 1e-3, 2.5);
        field.lock().add_pheromone(&rendezvous, LEADER_ID);

        for id in 1..4 {
            fleet.place(id, rendezvous);
            let mut follower = Follower::new(
                id,
                field.clone(),
                boundary,
                fleet.clone(),
                fleet.clone(),
                Duration::from_secs(1),
                Duration::from_secs(10),
                490.5,
                handle.subscribe(),
                StdRng::seed_from_u64(id as u64),
            );
            assert_eq!(follower.step().await.unwrap(), FollowerState::Holding);
            // age the field between arrivals; the leader's original marker
            // is long gone by the time the last follower shows up
            for _ in 0..8 {
                field.lock().decay_sweep();
            }
        }

        // the chain outlived the original marker
        let guard = field.lock();
        let survivors = guard.pheromones_at(&rendezvous);
        assert!(!survivors.is_empty());
        assert!(survivors.iter().all(|p| p.released_by() != LEADER_ID));
    }
}
