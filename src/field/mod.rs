//! The shared pheromone field: markers, grid cells, decay.
//!
//! The field is the only shared mutable state in the whole engine; every
//! coordination effect between agents flows through it.

pub mod grid;
pub mod patch;
pub mod pheromone;
pub mod snapshot;

pub use grid::{Field, SharedField};
pub use patch::Patch;
pub use pheromone::Pheromone;
pub use snapshot::FieldSnapshot;
