//! Closest-point solver.
//!
//! A coarse scan over `CURVE_SUBDIVISIONS + 1` uniform parameters picks a
//! starting `t`, then Newton-Raphson on `f(t) = (B(t) - q) · B'(t)` refines
//! it. Lines are solved exactly by clamped projection.

use crate::consts::{CURVE_SUBDIVISIONS, DEGENERATE_EPSILON, NEWTON_MAX_ITERATIONS, NEWTON_TOLERANCE};
use crate::curve::Curve;
use kurbo::Point;

/// Result of a closest-point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Curve parameter of the closest point, in `[0, 1]`.
    pub t: f64,
    /// The closest point on the curve.
    pub point: Point,
    /// Euclidean distance from the query to `point`.
    pub distance: f64,
}

impl ClosestPoint {
    fn at(curve: &Curve, query: Point, t: f64) -> Self {
        let point = curve.point_at(t);
        Self {
            t,
            point,
            distance: point.distance(query),
        }
    }
}

/// Find the point on `curve` closest to `query`.
pub fn closest_point(curve: &Curve, query: Point) -> ClosestPoint {
    if let Curve::Line { p0, p1 } = *curve {
        return closest_on_line(curve, p0, p1, query);
    }

    let coarse = coarse_parameter(curve, query);
    let refined = refine(curve, query, coarse);

    let coarse_hit = ClosestPoint::at(curve, query, coarse);
    let refined_hit = ClosestPoint::at(curve, query, refined);
    if refined_hit.distance <= coarse_hit.distance {
        refined_hit
    } else {
        coarse_hit
    }
}

fn closest_on_line(curve: &Curve, p0: Point, p1: Point, query: Point) -> ClosestPoint {
    let d = p1 - p0;
    let len_sq = d.hypot2();
    let t = if len_sq < DEGENERATE_EPSILON {
        0.0
    } else {
        ((query - p0).dot(d) / len_sq).clamp(0.0, 1.0)
    };
    ClosestPoint::at(curve, query, t)
}

/// Parameter of the nearest of the uniform samples `t = i / N`.
fn coarse_parameter(curve: &Curve, query: Point) -> f64 {
    let n = CURVE_SUBDIVISIONS as f64;
    let mut best_t = 0.0;
    let mut best_dist_sq = f64::INFINITY;
    for i in 0..=CURVE_SUBDIVISIONS {
        let t = i as f64 / n;
        let dist_sq = curve.point_at(t).distance_squared(query);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best_t = t;
        }
    }
    best_t
}

/// Newton-Raphson refinement of `t0`. Returns `t0` unchanged if the
/// derivative of `f` becomes stationary.
fn refine(curve: &Curve, query: Point, t0: f64) -> f64 {
    let mut t = t0;
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let offset = curve.point_at(t) - query;
        let d1 = curve.derivative(t);
        let d2 = curve.second_derivative(t);

        let f = offset.dot(d1);
        let df = d1.dot(d1) + offset.dot(d2);
        if df.abs() < DEGENERATE_EPSILON {
            return t0;
        }

        let next = (t - f / df).clamp(0.0, 1.0);
        let step = (next - t).abs();
        t = next;
        if step < NEWTON_TOLERANCE {
            break;
        }
    }
    t
}
