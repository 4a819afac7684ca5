//! Vector helpers on top of kurbo's `Point` and `Vec2`.
//!
//! kurbo already covers addition, subtraction, scaling, lerp, dot product and
//! distance. This module adds the few operations the editor needs on top:
//! perpendiculars, guarded normalisation and degree-based angles.

use crate::consts::DEGENERATE_EPSILON;
use kurbo::{Point, Vec2};

/// Extra operations on `Vec2`.
pub trait VecExt {
    /// The vector rotated by +90°.
    fn perpendicular(self) -> Vec2;

    /// Unit vector in the same direction, or the input unchanged when its
    /// length is below the degeneracy threshold.
    fn normalized_or_self(self) -> Vec2;

    /// Direction of the vector in degrees, normalised to `[0, 360)`.
    fn angle_degrees(self) -> f64;
}

impl VecExt for Vec2 {
    fn perpendicular(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    fn normalized_or_self(self) -> Vec2 {
        let len = self.hypot();
        if len < DEGENERATE_EPSILON {
            self
        } else {
            self / len
        }
    }

    fn angle_degrees(self) -> f64 {
        normalize_degrees(self.y.atan2(self.x).to_degrees())
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Smallest absolute difference between two angles in degrees, in `[0, 180]`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = normalize_degrees(a - b);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Direction from `from` to `to` in degrees, normalised to `[0, 360)`.
pub fn angle_between(from: Point, to: Point) -> f64 {
    (to - from).angle_degrees()
}

/// The point at `distance` from `origin` along `angle_degrees`.
pub fn polar(origin: Point, angle_degrees: f64, distance: f64) -> Point {
    let rad = angle_degrees.to_radians();
    Point::new(origin.x + distance * rad.cos(), origin.y + distance * rad.sin())
}
