//! Point types for the three coordinate schemes.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// A point in canonical Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether the point lies inside or on the unit circle.
    pub fn in_unit_disk(&self) -> bool {
        self.x * self.x + self.y * self.y <= 1.0
    }
}

/// A point in polar coordinates with radius in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    pub r: f64,
    pub theta: f64,
}

impl PolarPoint {
    pub fn new(r: f64, theta: f64) -> Self {
        Self { r, theta }
    }

    /// Convert to Cartesian: `(r cos θ, r sin θ)`.
    pub fn to_cartesian(&self) -> CartesianPoint {
        CartesianPoint::new(self.r * self.theta.cos(), self.r * self.theta.sin())
    }

    pub fn is_feasible(&self) -> bool {
        (0.0..=1.0).contains(&self.r) && is_canonical_angle(self.theta)
    }
}

/// Point on the unit circle for an angle (implicit `r = 1`).
pub fn angle_to_cartesian(theta: f64) -> CartesianPoint {
    CartesianPoint::new(theta.cos(), theta.sin())
}

/// Whether an angle lies in `[0, 2π)`.
pub fn is_canonical_angle(theta: f64) -> bool {
    (0.0..TAU).contains(&theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let p = PolarPoint::new(0.5, PI / 2.0).to_cartesian();
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_angle_to_cartesian_on_circle() {
        let p = angle_to_cartesian(1.234);
        assert!(((p.x * p.x + p.y * p.y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_feasibility_bounds() {
        assert!(CartesianPoint::new(1.0, 0.0).in_unit_disk());
        assert!(!CartesianPoint::new(0.8, 0.8).in_unit_disk());
        assert!(PolarPoint::new(1.0, 0.0).is_feasible());
        assert!(!PolarPoint::new(1.01, 0.0).is_feasible());
        assert!(!PolarPoint::new(0.5, TAU).is_feasible());
        assert!(!is_canonical_angle(-0.1));
    }
}
