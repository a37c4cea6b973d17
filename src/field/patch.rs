//! One cell of the field grid.

use super::pheromone::Pheromone;

/// The live pheromones deposited on one grid cell, in insertion order.
///
/// Owned exclusively by the [`Field`](super::Field); mutated only by marker
/// releases and the decay sweep.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    pheromones: Vec<Pheromone>,
}

impl Patch {
    pub fn add(&mut self, pheromone: Pheromone) {
        self.pheromones.push(pheromone);
    }

    pub fn pheromones(&self) -> &[Pheromone] {
        &self.pheromones
    }

    /// Ages every marker one cycle and drops the ones that evaporated.
    pub fn tick(&mut self) {
        self.pheromones.retain_mut(|p| p.tick());
    }

    /// Whether any live marker here was released by someone other than
    /// `self_id`. This is the discovery predicate driving recruitment.
    pub fn has_foreign(&self, self_id: usize) -> bool {
        self.pheromones.iter().any(|p| p.released_by() != self_id)
    }

    /// Summed intensity of everything alive in this cell.
    pub fn total_intensity(&self) -> f64 {
        self.pheromones.iter().map(|p| p.intensity()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pheromones.is_empty()
    }
}
