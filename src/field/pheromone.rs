//! Decaying pheromone markers.

/// One marker deposited on the field.
///
/// Intensity starts at 1.0 on release and loses `evaporation_rate` per decay
/// tick, so a marker survives exactly `ceil(1 / rate)` sweeps. With the
/// default rate of 0.05 and a one-second sweep cadence that is a 20 s
/// lifetime.
#[derive(Clone, Copy, Debug)]
pub struct Pheromone {
    intensity: f64,
    evaporation_rate: f64,
    released_by: usize,
}

impl Pheromone {
    /// Releases a fresh marker owned by the given agent.
    pub fn release(released_by: usize, evaporation_rate: f64) -> Self {
        Pheromone {
            intensity: 1.0,
            evaporation_rate,
            released_by,
        }
    }

    /// Ages the marker by one decay cycle.
    ///
    /// Returns whether the marker is still active. Must be called exactly
    /// once per global sweep: any other cadence changes the marker's
    /// effective lifetime.
    pub fn tick(&mut self) -> bool {
        self.intensity -= self.evaporation_rate;
        self.intensity > 0.0
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Index of the agent that released this marker.
    pub fn released_by(&self) -> usize {
        self.released_by
    }
}
