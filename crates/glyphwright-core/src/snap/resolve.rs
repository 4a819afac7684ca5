//! Per-kind snap resolvers.
//!
//! Each resolver returns a [`Resolution`]; an infinite distance means the
//! target does not apply to the query point at all.

use super::{Grid, LineSnapMode, SnapKind};
use crate::consts::DEGENERATE_EPSILON;
use crate::curve::Curve;
use crate::vec::{angle_between, angular_difference, polar};
use kurbo::{Point, Vec2};

/// Where a single target would move the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub point: Point,
    /// Distance from the query to `point`; infinite for no match.
    pub distance: f64,
}

impl Resolution {
    fn to(query: Point, point: Point) -> Self {
        Self {
            point,
            distance: query.distance(point),
        }
    }

    /// No match; the query point is carried through unchanged.
    pub fn miss(query: Point) -> Self {
        Self {
            point: query,
            distance: f64::INFINITY,
        }
    }

    pub fn is_match(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Dispatch to the resolver for `kind`.
pub fn resolve(query: Point, kind: &SnapKind) -> Resolution {
    match kind {
        SnapKind::Point(target) => to_point(query, *target),
        SnapKind::Line { segment, mode } => to_line(query, segment, *mode),
        SnapKind::Grid(grid) => to_grid(query, grid),
        SnapKind::Angle {
            anchor,
            angles,
            tolerance_deg,
        } => to_angle(query, *anchor, angles, *tolerance_deg),
        SnapKind::Extension { point, direction } => to_extension(query, *point, *direction),
    }
}

pub fn to_point(query: Point, target: Point) -> Resolution {
    Resolution::to(query, target)
}

/// Round each axis to the nearest grid line. A non-positive spacing never
/// matches.
pub fn to_grid(query: Point, grid: &Grid) -> Resolution {
    let sx = grid.spacing;
    let sy = grid.spacing_y.unwrap_or(grid.spacing);
    if sx <= 0.0 || sy <= 0.0 {
        return Resolution::miss(query);
    }
    let origin = grid.origin.unwrap_or(Point::ZERO);
    let snapped = Point::new(
        origin.x + ((query.x - origin.x) / sx).round() * sx,
        origin.y + ((query.y - origin.y) / sy).round() * sy,
    );
    Resolution::to(query, snapped)
}

/// Rotate `query` about `anchor` onto the nearest allowed angle, keeping its
/// distance from the anchor. Matches only within `tolerance_deg`.
pub fn to_angle(query: Point, anchor: Point, angles: &[f64], tolerance_deg: f64) -> Resolution {
    let raw = angle_between(anchor, query);
    let nearest = angles
        .iter()
        .copied()
        .map(|a| (a, angular_difference(raw, a)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match nearest {
        Some((angle, diff)) if diff <= tolerance_deg => {
            let radius = anchor.distance(query);
            Resolution::to(query, polar(anchor, angle, radius))
        }
        _ => Resolution::miss(query),
    }
}

pub fn to_line(query: Point, segment: &Curve, mode: LineSnapMode) -> Resolution {
    match mode {
        LineSnapMode::Nearest => {
            let nearest = segment.closest_point(query);
            Resolution::to(query, nearest.point)
        }
        LineSnapMode::EndpointOnly => {
            let start = Resolution::to(query, segment.start());
            let end = Resolution::to(query, segment.end());
            if end.distance < start.distance { end } else { start }
        }
        LineSnapMode::Perpendicular => {
            let nearest = segment.closest_point(query);
            if nearest.t > 0.0 && nearest.t < 1.0 {
                Resolution::to(query, nearest.point)
            } else {
                Resolution::miss(query)
            }
        }
    }
}

/// Project onto the infinite line through `origin` along `direction`.
pub fn to_extension(query: Point, origin: Point, direction: Vec2) -> Resolution {
    let len_sq = direction.hypot2();
    if len_sq < DEGENERATE_EPSILON {
        return Resolution::miss(query);
    }
    let s = (query - origin).dot(direction) / len_sq;
    Resolution::to(query, origin + direction * s)
}
