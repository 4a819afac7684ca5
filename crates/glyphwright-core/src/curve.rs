//! Curve kernel: line, quadratic and cubic Bézier segments.
//!
//! A [`Curve`] is immutable; every transform (split, degree elevation,
//! reversal, affine mapping) returns new curves. Parameter `t` is only
//! meaningful on `[0, 1]` and evaluation is exact at both endpoints.

use crate::consts::{CURVE_SUBDIVISIONS, EXTREMA_EPSILON};
use crate::nearest::{self, ClosestPoint};
use crate::vec::VecExt;
use kurbo::{Affine, CubicBez, Line, PathSeg, Point, QuadBez, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A single outline segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Curve {
    /// Straight segment between two on-curve points.
    Line { p0: Point, p1: Point },
    /// Quadratic Bézier with one off-curve control point.
    Quadratic { p0: Point, c: Point, p1: Point },
    /// Cubic Bézier with two off-curve control points.
    Cubic { p0: Point, c0: Point, c1: Point, p1: Point },
}

/// Degree of a curve, without its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveKind {
    Line,
    Quadratic,
    Cubic,
}

impl Curve {
    /// Create a straight segment.
    pub fn line(p0: Point, p1: Point) -> Self {
        Curve::Line { p0, p1 }
    }

    /// Create a quadratic with one control point.
    pub fn quadratic(p0: Point, c: Point, p1: Point) -> Self {
        Curve::Quadratic { p0, c, p1 }
    }

    /// Create a cubic with two control points.
    pub fn cubic(p0: Point, c0: Point, c1: Point, p1: Point) -> Self {
        Curve::Cubic { p0, c0, c1, p1 }
    }

    /// Get the degree of this curve.
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Line { .. } => CurveKind::Line,
            Curve::Quadratic { .. } => CurveKind::Quadratic,
            Curve::Cubic { .. } => CurveKind::Cubic,
        }
    }

    /// The on-curve start point.
    pub fn start(&self) -> Point {
        match *self {
            Curve::Line { p0, .. } | Curve::Quadratic { p0, .. } | Curve::Cubic { p0, .. } => p0,
        }
    }

    /// The on-curve end point.
    pub fn end(&self) -> Point {
        match *self {
            Curve::Line { p1, .. } | Curve::Quadratic { p1, .. } | Curve::Cubic { p1, .. } => p1,
        }
    }

    /// All defining points in outline order (start, controls, end).
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Curve::Line { p0, p1 } => vec![p0, p1],
            Curve::Quadratic { p0, c, p1 } => vec![p0, c, p1],
            Curve::Cubic { p0, c0, c1, p1 } => vec![p0, c0, c1, p1],
        }
    }

    /// Off-curve control points only.
    pub fn control_points(&self) -> Vec<Point> {
        match *self {
            Curve::Line { .. } => Vec::new(),
            Curve::Quadratic { c, .. } => vec![c],
            Curve::Cubic { c0, c1, .. } => vec![c0, c1],
        }
    }

    /// Evaluate the curve at `t` using Bernstein blending.
    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = match *self {
            Curve::Line { p0, p1 } => p0.to_vec2() * mt + p1.to_vec2() * t,
            Curve::Quadratic { p0, c, p1 } => {
                p0.to_vec2() * (mt * mt) + c.to_vec2() * (2.0 * mt * t) + p1.to_vec2() * (t * t)
            }
            Curve::Cubic { p0, c0, c1, p1 } => {
                p0.to_vec2() * (mt * mt * mt)
                    + c0.to_vec2() * (3.0 * mt * mt * t)
                    + c1.to_vec2() * (3.0 * mt * t * t)
                    + p1.to_vec2() * (t * t * t)
            }
        };
        v.to_point()
    }

    /// First derivative with respect to `t`.
    pub fn derivative(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        match *self {
            Curve::Line { p0, p1 } => p1 - p0,
            Curve::Quadratic { p0, c, p1 } => (c - p0) * (2.0 * mt) + (p1 - c) * (2.0 * t),
            Curve::Cubic { p0, c0, c1, p1 } => {
                (c0 - p0) * (3.0 * mt * mt) + (c1 - c0) * (6.0 * mt * t) + (p1 - c1) * (3.0 * t * t)
            }
        }
    }

    /// Second derivative with respect to `t`. Zero for lines and constant for
    /// quadratics.
    pub fn second_derivative(&self, t: f64) -> Vec2 {
        match *self {
            Curve::Line { .. } => Vec2::ZERO,
            Curve::Quadratic { p0, c, p1 } => (p1.to_vec2() - c.to_vec2() * 2.0 + p0.to_vec2()) * 2.0,
            Curve::Cubic { p0, c0, c1, p1 } => {
                let a = c1.to_vec2() - c0.to_vec2() * 2.0 + p0.to_vec2();
                let b = p1.to_vec2() - c1.to_vec2() * 2.0 + c0.to_vec2();
                a * (6.0 * (1.0 - t)) + b * (6.0 * t)
            }
        }
    }

    /// Tangent vector at `t` (the unnormalised first derivative).
    pub fn tangent(&self, t: f64) -> Vec2 {
        self.derivative(t)
    }

    /// Unit normal at `t`: the unit tangent rotated by +90°. Zero where the
    /// tangent vanishes.
    pub fn normal(&self, t: f64) -> Vec2 {
        let unit = self.tangent(t).normalized_or_self();
        unit.perpendicular()
    }

    /// Approximate arc length: sum of chords over `CURVE_SUBDIVISIONS` equal
    /// parameter steps.
    pub fn length(&self) -> f64 {
        if let Curve::Line { p0, p1 } = *self {
            return p0.distance(p1);
        }
        let n = CURVE_SUBDIVISIONS as f64;
        let mut prev = self.start();
        let mut total = 0.0;
        for i in 1..=CURVE_SUBDIVISIONS {
            let next = self.point_at(i as f64 / n);
            total += prev.distance(next);
            prev = next;
        }
        total
    }

    /// Tight axis-aligned bounding box, computed from the endpoints and the
    /// per-axis derivative roots inside `(0, 1)`.
    pub fn bounds(&self) -> Rect {
        let p0 = self.start();
        let p1 = self.end();
        let mut rect = Rect::from_points(p0, p1);
        for t in self.extrema() {
            rect = rect.union_pt(self.point_at(t));
        }
        rect
    }

    /// Parameters in `(0, 1)` where either coordinate reaches a local extremum.
    pub fn extrema(&self) -> Vec<f64> {
        let mut ts = Vec::new();
        match *self {
            Curve::Line { .. } => {}
            Curve::Quadratic { p0, c, p1 } => {
                ts.extend(quadratic_extremum(p0.x, c.x, p1.x));
                ts.extend(quadratic_extremum(p0.y, c.y, p1.y));
            }
            Curve::Cubic { p0, c0, c1, p1 } => {
                ts.extend(cubic_extrema(p0.x, c0.x, c1.x, p1.x));
                ts.extend(cubic_extrema(p0.y, c0.y, c1.y, p1.y));
            }
        }
        ts
    }

    /// Split at `t` (clamped to `[0, 1]`) with De Casteljau's construction.
    /// Both halves have the same kind as `self`.
    pub fn split_at(&self, t: f64) -> (Curve, Curve) {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Curve::Line { p0, p1 } => {
                let m = self.point_at(t);
                (Curve::line(p0, m), Curve::line(m, p1))
            }
            Curve::Quadratic { p0, c, p1 } => {
                let a = p0.lerp(c, t);
                let b = c.lerp(p1, t);
                let m = a.lerp(b, t);
                (Curve::quadratic(p0, a, m), Curve::quadratic(m, b, p1))
            }
            Curve::Cubic { p0, c0, c1, p1 } => {
                let a = p0.lerp(c0, t);
                let b = c0.lerp(c1, t);
                let c = c1.lerp(p1, t);
                let d = a.lerp(b, t);
                let e = b.lerp(c, t);
                let m = d.lerp(e, t);
                (Curve::cubic(p0, a, d, m), Curve::cubic(m, e, c, p1))
            }
        }
    }

    /// Lossless elevation to a cubic. Lines place their controls at the
    /// thirds so the parameterisation is preserved.
    pub fn to_cubic(&self) -> Curve {
        match *self {
            Curve::Line { p0, p1 } => Curve::cubic(p0, p0.lerp(p1, 1.0 / 3.0), p0.lerp(p1, 2.0 / 3.0), p1),
            Curve::Quadratic { p0, c, p1 } => quadratic_to_cubic(p0, c, p1),
            cubic @ Curve::Cubic { .. } => cubic,
        }
    }

    /// The same shape traversed from end to start.
    pub fn reversed(&self) -> Curve {
        match *self {
            Curve::Line { p0, p1 } => Curve::line(p1, p0),
            Curve::Quadratic { p0, c, p1 } => Curve::quadratic(p1, c, p0),
            Curve::Cubic { p0, c0, c1, p1 } => Curve::cubic(p1, c1, c0, p0),
        }
    }

    /// Apply an affine transform to every defining point.
    pub fn transform(&self, affine: Affine) -> Curve {
        match *self {
            Curve::Line { p0, p1 } => Curve::line(affine * p0, affine * p1),
            Curve::Quadratic { p0, c, p1 } => Curve::quadratic(affine * p0, affine * c, affine * p1),
            Curve::Cubic { p0, c0, c1, p1 } => {
                Curve::cubic(affine * p0, affine * c0, affine * c1, affine * p1)
            }
        }
    }

    /// `count` evenly spaced points from `t = 0` to `t = 1` inclusive.
    ///
    /// The iterator is cheap to clone, so a consumer can restart it.
    pub fn sample(&self, count: usize) -> Samples {
        Samples {
            curve: *self,
            count,
            index: 0,
        }
    }

    /// Closest point on the curve to `query`.
    pub fn closest_point(&self, query: Point) -> ClosestPoint {
        nearest::closest_point(self, query)
    }

    /// Convert into kurbo's path segment for path building and rendering.
    pub fn to_path_seg(&self) -> PathSeg {
        match *self {
            Curve::Line { p0, p1 } => PathSeg::Line(Line::new(p0, p1)),
            Curve::Quadratic { p0, c, p1 } => PathSeg::Quad(QuadBez::new(p0, c, p1)),
            Curve::Cubic { p0, c0, c1, p1 } => PathSeg::Cubic(CubicBez::new(p0, c0, c1, p1)),
        }
    }
}

impl From<Curve> for PathSeg {
    fn from(curve: Curve) -> Self {
        curve.to_path_seg()
    }
}

impl From<PathSeg> for Curve {
    fn from(seg: PathSeg) -> Self {
        match seg {
            PathSeg::Line(l) => Curve::line(l.p0, l.p1),
            PathSeg::Quad(q) => Curve::quadratic(q.p0, q.p1, q.p2),
            PathSeg::Cubic(c) => Curve::cubic(c.p0, c.p1, c.p2, c.p3),
        }
    }
}

/// Degree-elevate a quadratic: `c0 = lerp(p0, c, 2/3)`, `c1 = lerp(p1, c, 2/3)`.
pub fn quadratic_to_cubic(p0: Point, c: Point, p1: Point) -> Curve {
    Curve::cubic(p0, p0.lerp(c, 2.0 / 3.0), p1.lerp(c, 2.0 / 3.0), p1)
}

/// Iterator over evenly spaced points of a curve. See [`Curve::sample`].
#[derive(Debug, Clone)]
pub struct Samples {
    curve: Curve,
    count: usize,
    index: usize,
}

impl Iterator for Samples {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.index >= self.count {
            return None;
        }
        let t = if self.count == 1 {
            0.0
        } else {
            self.index as f64 / (self.count - 1) as f64
        };
        self.index += 1;
        Some(self.curve.point_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples {}

/// Root of the quadratic's derivative on one axis:
/// `2(1-t)(c - p0) + 2t(p1 - c) = 0`.
fn quadratic_extremum(p0: f64, c: f64, p1: f64) -> Option<f64> {
    let denom = p0 - 2.0 * c + p1;
    if denom.abs() < EXTREMA_EPSILON {
        return None;
    }
    let t = (p0 - c) / denom;
    inside_unit(t)
}

/// Roots of the cubic's derivative on one axis, `at² + bt + c = 0`.
fn cubic_extrema(p0: f64, c0: f64, c1: f64, p1: f64) -> Vec<f64> {
    let a = -3.0 * p0 + 9.0 * c0 - 9.0 * c1 + 3.0 * p1;
    let b = 6.0 * p0 - 12.0 * c0 + 6.0 * c1;
    let c = -3.0 * p0 + 3.0 * c0;

    if a.abs() < EXTREMA_EPSILON {
        if b.abs() < EXTREMA_EPSILON {
            return Vec::new();
        }
        return inside_unit(-c / b).into_iter().collect();
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    let sqrt_d = discriminant.sqrt();
    [(-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a)]
        .into_iter()
        .filter_map(inside_unit)
        .collect()
}

fn inside_unit(t: f64) -> Option<f64> {
    (t > 0.0 && t < 1.0).then_some(t)
}
