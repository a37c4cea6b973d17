//! Geometry: geodesic positions, the square working area, patch indexing.
//!
//! Everything here is pure and immutable after construction, so agent tasks
//! share it freely without synchronization.

pub mod boundary;
pub mod position;

pub use boundary::Boundary;
pub use position::{deg_to_m, m_to_deg, Position, METERS_PER_DEGREE};
