//! Agent behaviors.
//!
//! One independently timed task per agent. The leader searches and marks;
//! followers random-walk until they cross a foreign marker, then hold and
//! become beacons themselves. Neither ever messages the other: every effect
//! travels through the shared field.

pub mod follower;
pub mod leader;

pub use follower::{Follower, FollowerState};
pub use leader::Leader;

/// Agent index reserved for the leader role.
pub const LEADER_ID: usize = 0;
