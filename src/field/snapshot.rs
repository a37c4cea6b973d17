//! Field snapshots for publishing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-cell intensity totals captured after a decay sweep.
///
/// This is the renderer's whole world: a row-major matrix of summed marker
/// intensities plus the capture time. Cheap to clone, serializable, and
/// detached from the live field so publishing never holds the field lock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSnapshot {
    grid_size: usize,
    intensities: Vec<f64>,
    captured_at: DateTime<Utc>,
}

impl FieldSnapshot {
    pub(crate) fn new(grid_size: usize, intensities: Vec<f64>) -> Self {
        FieldSnapshot {
            grid_size,
            intensities,
            captured_at: Utc::now(),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Summed intensity of one cell, bounds-checked.
    pub fn intensity(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.grid_size || col >= self.grid_size {
            return None;
        }
        self.intensities.get(row * self.grid_size + col).copied()
    }

    /// Summed intensity over the whole field.
    pub fn total_intensity(&self) -> f64 {
        self.intensities.iter().sum()
    }

    /// Number of cells currently holding any marker.
    pub fn active_patches(&self) -> usize {
        self.intensities.iter().filter(|&&i| i > 0.0).count()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_mirror_the_matrix() {
        let mut intensities = vec![0.0; 9];
        intensities[5] = 0.75; // row 1, col 2
        let snapshot = FieldSnapshot::new(3, intensities);
        assert_eq!(snapshot.intensity(1, 2), Some(0.75));
        assert_eq!(snapshot.intensity(2, 1), Some(0.0));
        assert_eq!(snapshot.intensity(3, 0), None);
        assert_eq!(snapshot.active_patches(), 1);
        assert!((snapshot.total_intensity() - 0.75).abs() < 1e-12);
        assert!(snapshot.captured_at() <= Utc::now());
    }

    #[test]
    fn snapshots_serialize_for_external_renderers() {
        let snapshot = FieldSnapshot::new(2, vec![0.0, 1.0, 0.5, 0.0]);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FieldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.grid_size(), 2);
        assert_eq!(back.intensity(0, 1), Some(1.0));
    }
}
