//! Pure geometry helpers
//!
//! Distance and angle math shared by the pattern constructor and the
//! detectors. No state, no side effects.

use serde::{Deserialize, Serialize};

/// A point in 2D space (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Displacement vector from `self` to `other`
    pub fn displacement_to(&self, other: &Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance_to(&b)
}

/// Signed angular difference between two direction vectors, normalized
/// to (-1, 1].
///
/// 0 means identical direction, ±1 opposite direction; the sign encodes
/// the rotational sense from `reference` to `candidate` (positive =
/// counter-clockwise in a y-down coordinate system).
pub fn angle_difference(reference: (f64, f64), candidate: (f64, f64)) -> f64 {
    let a = reference.1.atan2(reference.0);
    let b = candidate.1.atan2(candidate.0);
    let mut diff = (b - a) / std::f64::consts::PI;

    // Wrap into (-1, 1]
    if diff > 1.0 {
        diff -= 2.0;
    } else if diff <= -1.0 {
        diff += 2.0;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-9); // 3-4-5 triangle
    }

    #[test]
    fn test_distance_zero() {
        let a = Point::new(7.0, -2.0);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn test_displacement() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.displacement_to(&b), (3.0, 4.0));
    }

    #[test]
    fn test_angle_difference_identical() {
        let diff = angle_difference((1.0, 0.0), (2.0, 0.0));
        assert!(diff.abs() < 1e-9);
    }

    #[test]
    fn test_angle_difference_opposite() {
        let diff = angle_difference((1.0, 0.0), (-1.0, 0.0));
        assert!((diff.abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_difference_right_angle() {
        let diff = angle_difference((1.0, 0.0), (0.0, 1.0));
        assert!((diff - 0.5).abs() < 1e-9);

        let diff = angle_difference((1.0, 0.0), (0.0, -1.0));
        assert!((diff + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_angle_difference_wraps() {
        // 135 degrees vs -135 degrees: shortest rotation is 90 degrees,
        // not 270, so the wrapped value must stay inside (-1, 1].
        let diff = angle_difference((-1.0, 1.0), (-1.0, -1.0));
        assert!((diff - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_angle_difference_sign_encodes_sense() {
        let cw = angle_difference((0.0, 1.0), (1.0, 0.0));
        let ccw = angle_difference((1.0, 0.0), (0.0, 1.0));
        assert!(cw < 0.0);
        assert!(ccw > 0.0);
        assert!((cw + ccw).abs() < 1e-9);
    }
}
