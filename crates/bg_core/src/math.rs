//! 2D vector math for the battlefield.
//!
//! Positions are real-valued (`f64`); determinism here means same-process,
//! same-seed reproducibility, not cross-machine bit-identical lockstep replay
//! (see `DESIGN.md` for why this departs from a fixed-point representation).

use serde::{Deserialize, Serialize};

/// A point or displacement on the battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance (avoids the sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Bearing in degrees from `self` to `other`, measured counter-clockwise from +x.
    #[must_use]
    pub fn bearing_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// Unit vector at the given bearing in degrees.
    #[must_use]
    pub fn from_bearing(degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    /// Clamp both coordinates into `[0, max_x] x [0, max_y]`.
    #[must_use]
    pub fn clamp_bounds(self, max_x: f64, max_y: f64) -> Self {
        Self::new(self.x.clamp(0.0, max_x), self.y.clamp(0.0, max_y))
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    a.distance(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_matches_pythagoras() {
        let a = Vec2::new(3.0, 0.0);
        let b = Vec2::new(0.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_round_trips_through_from_bearing() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let bearing = a.bearing_to(b);
        assert!((bearing - 0.0).abs() < 1e-9);
        let unit = Vec2::from_bearing(bearing);
        assert!((unit.x - 1.0).abs() < 1e-9);
        assert!(unit.y.abs() < 1e-9);
    }

    #[test]
    fn clamp_bounds_keeps_points_on_map() {
        let p = Vec2::new(-5.0, 300.0);
        let clamped = p.clamp_bounds(120.0, 120.0);
        assert_eq!(clamped, Vec2::new(0.0, 120.0));
    }

    #[test]
    fn determinism_same_ops_same_result() {
        let a = Vec2::new(1.0, 2.0) + Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 2.0) + Vec2::new(3.0, 4.0);
        assert_eq!(a, b);
    }
}
