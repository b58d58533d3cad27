//! Circular statistics for magnitude + direction observations

use serde::{Deserialize, Serialize};

/// Accumulated orthogonal components of a vector series.
///
/// A sample `(m, θ)` contributes `(m cos θ, m sin θ)`. The count covers
/// every non-null magnitude, including samples without a direction, so
/// calm readings dilute the resultant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorAccumulator {
    pub sum_x: f64,
    pub sum_y: f64,
    pub count: u64,
}

impl VectorAccumulator {
    pub fn from_parts(sum_x: f64, sum_y: f64, count: u64) -> Self {
        Self {
            sum_x,
            sum_y,
            count,
        }
    }

    /// Add one sample; `direction` is in compass degrees
    pub fn add(&mut self, magnitude: f64, direction: Option<f64>) {
        self.count += 1;
        if let Some(dir) = direction {
            let radians = dir.to_radians();
            self.sum_x += magnitude * radians.cos();
            self.sum_y += magnitude * radians.sin();
        }
    }

    pub fn merge(&mut self, other: &VectorAccumulator) {
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.count += other.count;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Magnitude of the mean vector
    pub fn magnitude(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum_x.hypot(self.sum_y) / self.count as f64)
    }

    /// Direction of the resultant in `[0, 360)`; `None` when it cancels out
    pub fn direction(&self) -> Option<f64> {
        if self.count == 0 || (self.sum_x == 0.0 && self.sum_y == 0.0) {
            return None;
        }
        let degrees = self.sum_y.atan2(self.sum_x).to_degrees().rem_euclid(360.0);
        // rem_euclid can round a tiny negative angle up to exactly 360
        Some(if degrees >= 360.0 { 0.0 } else { degrees })
    }
}
