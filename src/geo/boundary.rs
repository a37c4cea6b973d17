//! The square working area.
//!
//! Computed once at simulation start from the spawn position of the first
//! agent and never modified again. All bounds are planar meter offsets on
//! the (latitude, longitude) axes.

use rand::Rng;

use super::position::{deg_to_m, m_to_deg, Position};

/// Axis-aligned square region the whole simulation runs in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    side_m: f64,
    lower_lat_m: f64,
    lower_lon_m: f64,
}

impl Boundary {
    /// Builds the square of side `side_m` centered on `center`.
    ///
    /// The center's meter coordinates are floor-truncated before the corners
    /// are laid out, so sub-meter telemetry jitter at spawn produces the same
    /// boundary.
    pub fn around(center: &Position, side_m: f64) -> Self {
        let center_lat_m = deg_to_m(center.latitude_deg).floor();
        let center_lon_m = deg_to_m(center.longitude_deg).floor();
        let half = side_m / 2.0;
        Boundary {
            side_m,
            lower_lat_m: center_lat_m - half,
            lower_lon_m: center_lon_m - half,
        }
    }

    pub fn side_m(&self) -> f64 {
        self.side_m
    }

    /// Lower corner offset, (latitude axis, longitude axis).
    pub fn lower_bound_m(&self) -> (f64, f64) {
        (self.lower_lat_m, self.lower_lon_m)
    }

    /// The four corner offsets: upper-left, upper-right, lower-left,
    /// lower-right.
    pub fn corners_m(&self) -> [(f64, f64); 4] {
        let (lo_lat, lo_lon) = (self.lower_lat_m, self.lower_lon_m);
        let (hi_lat, hi_lon) = (lo_lat + self.side_m, lo_lon + self.side_m);
        [
            (lo_lat, hi_lon),
            (hi_lat, hi_lon),
            (lo_lat, lo_lon),
            (hi_lat, lo_lon),
        ]
    }

    /// Whether a position falls inside the square. Altitude is ignored.
    pub fn contains(&self, position: &Position) -> bool {
        let (lat_m, lon_m) = position.meters();
        lat_m >= self.lower_lat_m
            && lat_m < self.lower_lat_m + self.side_m
            && lon_m >= self.lower_lon_m
            && lon_m < self.lower_lon_m + self.side_m
    }

    /// Side length of one patch when the square is split into
    /// `grid_size × grid_size` cells.
    pub fn patch_len_m(&self, grid_size: usize) -> f64 {
        (self.side_m / grid_size as f64).ceil()
    }

    /// Maps a position to raw (row, col) grid indices.
    ///
    /// Pure partition arithmetic: two positions inside the same geometric
    /// cell always map to the same pair, and positions outside the square
    /// produce indices outside `[0, grid_size)`; callers decide whether to
    /// clamp or reject.
    pub fn patch_coords(&self, position: &Position, grid_size: usize) -> (i64, i64) {
        let patch_len = self.patch_len_m(grid_size);
        let (lat_m, lon_m) = position.meters();
        let row = ((lat_m - self.lower_lat_m) / patch_len).floor() as i64;
        let col = ((lon_m - self.lower_lon_m) / patch_len).floor() as i64;
        (row, col)
    }

    /// Uniform random position inside the square, at the given absolute
    /// altitude.
    ///
    /// Samples integer meter offsets, the granularity targets are actually
    /// commanded at.
    pub fn random_position_inside<R: Rng + ?Sized>(&self, rng: &mut R, altitude_m: f64) -> Position {
        let steps = (self.side_m as i64).max(1);
        let lat_m = self.lower_lat_m + rng.gen_range(0..steps) as f64;
        let lon_m = self.lower_lon_m + rng.gen_range(0..steps) as f64;
        Position::new(m_to_deg(lat_m), m_to_deg(lon_m), altitude_m)
    }
}
