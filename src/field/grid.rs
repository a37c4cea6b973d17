//! The field grid.
//!
//! A fixed `grid_size × grid_size` partition of the working area, one
//! [`Patch`] per cell, flattened into a single owned array with
//! bounds-checked row/col accessors. Sized once at construction and never
//! resized.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::geo::{Boundary, Position};

use super::patch::Patch;
use super::pheromone::Pheromone;
use super::snapshot::FieldSnapshot;

/// The shared pheromone field.
///
/// All coordination between agents flows through this structure, so it sits
/// behind one exclusive lock (see [`SharedField`]): every operation below is
/// short and synchronous, and callers never hold the lock across an await.
#[derive(Debug)]
pub struct Field {
    grid_size: usize,
    evaporation_rate: f64,
    boundary: Boundary,
    patches: Vec<Patch>, // row-major, grid_size × grid_size
}

/// Handle agent tasks and the decay routine share.
pub type SharedField = Arc<Mutex<Field>>;

impl Field {
    /// Allocates an empty `grid_size × grid_size` field over `boundary`.
    /// Markers released here evaporate at `evaporation_rate` per sweep.
    pub fn new(grid_size: usize, boundary: Boundary, evaporation_rate: f64) -> Self {
        Field {
            grid_size,
            evaporation_rate,
            boundary,
            patches: vec![Patch::default(); grid_size * grid_size],
        }
    }

    /// Wraps a new field in its shared lock.
    pub fn shared(grid_size: usize, boundary: Boundary, evaporation_rate: f64) -> SharedField {
        Arc::new(Mutex::new(Field::new(grid_size, boundary, evaporation_rate)))
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Bounds-checked access to one cell.
    pub fn patch(&self, row: usize, col: usize) -> Option<&Patch> {
        if row >= self.grid_size || col >= self.grid_size {
            return None;
        }
        self.patches.get(row * self.grid_size + col)
    }

    /// Resolves the cell a position belongs to.
    ///
    /// Positions that strayed outside the boundary clamp to the nearest edge
    /// cell: an agent a few meters past the square keeps participating from
    /// the border patch instead of faulting.
    fn patch_index(&self, position: &Position) -> usize {
        let (row, col) = self.boundary.patch_coords(position, self.grid_size);
        let max = self.grid_size as i64 - 1;
        if row < 0 || row > max || col < 0 || col > max {
            debug!(row, col, "position outside boundary, clamping to edge patch");
        }
        let row = row.clamp(0, max) as usize;
        let col = col.clamp(0, max) as usize;
        row * self.grid_size + col
    }

    /// Deposits a fresh marker owned by `released_by` at the cell containing
    /// `position`.
    ///
    /// Markers from different owners coexist in one cell; keeping a single
    /// owner from stacking releases between sweeps is the behavior layer's
    /// policy, not the field's.
    pub fn add_pheromone(&mut self, position: &Position, released_by: usize) {
        let index = self.patch_index(position);
        self.patches[index].add(Pheromone::release(released_by, self.evaporation_rate));
    }

    /// Ages every marker on the field one cycle and drops the evaporated
    /// ones. Runs under the field's exclusive lock for the whole pass.
    pub fn decay_sweep(&mut self) {
        for patch in &mut self.patches {
            patch.tick();
        }
    }

    /// Live markers at the cell containing `position`.
    pub fn pheromones_at(&self, position: &Position) -> &[Pheromone] {
        self.patches[self.patch_index(position)].pheromones()
    }

    /// Whether the cell containing `position` holds a marker released by
    /// someone other than `self_id`.
    pub fn has_foreign_pheromone(&self, position: &Position, self_id: usize) -> bool {
        self.patches[self.patch_index(position)].has_foreign(self_id)
    }

    /// Captures the per-cell intensity matrix for publishing.
    pub fn snapshot(&self) -> FieldSnapshot {
        let intensities = self.patches.iter().map(Patch::total_intensity).collect();
        FieldSnapshot::new(self.grid_size, intensities)
    }
}
