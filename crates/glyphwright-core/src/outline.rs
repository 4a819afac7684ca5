//! Glyph outline snapshot.
//!
//! The document store lives outside this crate. Tools hand over a [`Glyph`]
//! snapshot, from which hit and snap targets are built fresh for each query.

use crate::curve::Curve;
use crate::hit_test::{HitShape, HitTarget};
use crate::segment::Segment;
use crate::snap::{SnapKind, SnapTarget};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for a contour point.
pub type PointId = Uuid;

/// Unique identifier for a contour.
pub type ContourId = Uuid;

/// Whether a point lies on the outline or shapes it as a control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointType {
    #[default]
    OnCurve,
    OffCurve,
}

/// A point of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourPoint {
    pub id: PointId,
    pub position: Point,
    pub point_type: PointType,
    #[serde(default)]
    pub smooth: bool,
}

impl ContourPoint {
    /// Create a corner point with a fresh id.
    pub fn new(position: Point, point_type: PointType) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            point_type,
            smooth: false,
        }
    }

    /// Create an on-curve point.
    pub fn on_curve(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointType::OnCurve)
    }

    /// Create an off-curve (control) point.
    pub fn off_curve(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointType::OffCurve)
    }

    pub fn is_on_curve(&self) -> bool {
        self.point_type == PointType::OnCurve
    }
}

/// Ids of the contour points a segment was built from, in outline order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPoints {
    pub contour: ContourId,
    pub points: Vec<PointId>,
}

impl SegmentPoints {
    /// First on-curve point of the segment.
    pub fn start(&self) -> Option<PointId> {
        self.points.first().copied()
    }

    /// Last on-curve point of the segment.
    pub fn end(&self) -> Option<PointId> {
        self.points.last().copied()
    }
}

/// A contour segment tagged with its point ids.
pub type OutlineSegment = Segment<SegmentPoints>;

/// An ordered, possibly closed sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contour {
    pub id: ContourId,
    pub points: Vec<ContourPoint>,
    #[serde(default)]
    pub closed: bool,
}

impl Default for Contour {
    fn default() -> Self {
        Self::new()
    }
}

impl Contour {
    /// Create an empty, open contour.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            closed: false,
        }
    }

    /// Create a contour from existing points, keeping their ids.
    pub fn from_points(points: Vec<ContourPoint>, closed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            closed,
        }
    }

    /// Append a point and return its id.
    pub fn add_point(&mut self, x: f64, y: f64, point_type: PointType, smooth: bool) -> PointId {
        let mut point = ContourPoint::new(Point::new(x, y), point_type);
        point.smooth = smooth;
        self.points.push(point);
        point.id
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of the point with `id`.
    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    /// The point before `index`, wrapping around on closed contours.
    pub fn previous(&self, index: usize) -> Option<&ContourPoint> {
        if index >= self.points.len() {
            return None;
        }
        if index > 0 {
            self.points.get(index - 1)
        } else if self.closed && self.points.len() > 1 {
            self.points.last()
        } else {
            None
        }
    }

    /// The point after `index`, wrapping around on closed contours.
    pub fn next(&self, index: usize) -> Option<&ContourPoint> {
        let len = self.points.len();
        if index >= len {
            return None;
        }
        if index + 1 < len {
            self.points.get(index + 1)
        } else if self.closed && len > 1 {
            self.points.first()
        } else {
            None
        }
    }

    /// Iterate the contour's line, quadratic and cubic segments.
    pub fn segments(&self) -> SegmentIter<'_> {
        SegmentIter::new(self)
    }

    /// Tight bounds of every segment, or of the lone point for a
    /// single-point contour. `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let mut bounds = self.segments().map(|s| s.bounds()).reduce(|a, b| a.union(b));
        if bounds.is_none() {
            bounds = self.points.first().map(|p| Rect::from_points(p.position, p.position));
        }
        bounds
    }

    /// Build a kurbo path for rendering or tessellation.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut started = false;
        for segment in self.segments() {
            if !started {
                path.move_to(segment.curve.start());
                started = true;
            }
            match segment.curve {
                Curve::Line { p1, .. } => path.line_to(p1),
                Curve::Quadratic { c, p1, .. } => path.quad_to(c, p1),
                Curve::Cubic { c0, c1, p1, .. } => path.curve_to(c0, c1, p1),
            }
        }
        if started && self.closed {
            path.close_path();
        }
        path
    }
}

/// Classifies consecutive contour points into segments.
///
/// `on → on` is a line, `on → off → on` a quadratic and
/// `on → off → off → on` a cubic. Closed contours wrap around to the first
/// point. Runs that fit none of these shapes are skipped.
pub struct SegmentIter<'a> {
    contour: &'a Contour,
    pos: usize,
    limit: usize,
}

impl<'a> SegmentIter<'a> {
    fn new(contour: &'a Contour) -> Self {
        let len = contour.points.len();
        let limit = if contour.closed { len } else { len.saturating_sub(1) };
        Self { contour, pos: 0, limit }
    }

    fn get(&self, idx: usize) -> Option<&'a ContourPoint> {
        let points = &self.contour.points;
        if idx < points.len() {
            points.get(idx)
        } else if self.contour.closed && !points.is_empty() {
            points.get(idx % points.len())
        } else {
            None
        }
    }

    fn tag(&self, pts: &[&ContourPoint]) -> SegmentPoints {
        SegmentPoints {
            contour: self.contour.id,
            points: pts.iter().map(|p| p.id).collect(),
        }
    }
}

impl Iterator for SegmentIter<'_> {
    type Item = OutlineSegment;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.limit {
            let a = self.get(self.pos)?;
            let b = self.get(self.pos + 1)?;

            if !a.is_on_curve() {
                self.pos += 1;
                continue;
            }

            if b.is_on_curve() {
                self.pos += 1;
                let curve = Curve::line(a.position, b.position);
                return Some(Segment::tagged(curve, self.tag(&[a, b])));
            }

            if let Some(c) = self.get(self.pos + 2) {
                if c.is_on_curve() {
                    self.pos += 2;
                    let curve = Curve::quadratic(a.position, b.position, c.position);
                    return Some(Segment::tagged(curve, self.tag(&[a, b, c])));
                }
                if let Some(d) = self.get(self.pos + 3).filter(|d| d.is_on_curve()) {
                    self.pos += 3;
                    let curve = Curve::cubic(a.position, b.position, c.position, d.position);
                    return Some(Segment::tagged(curve, self.tag(&[a, b, c, d])));
                }
            }

            self.pos += 1;
        }
        None
    }
}

/// Location of a point inside a glyph.
#[derive(Debug, Clone, Copy)]
pub struct PointLocation<'a> {
    pub contour: &'a Contour,
    pub index: usize,
}

impl<'a> PointLocation<'a> {
    /// Get the located point.
    pub fn point(&self) -> &'a ContourPoint {
        &self.contour.points[self.index]
    }

    /// Neighbour before the point, wrapping on closed contours.
    pub fn previous(&self) -> Option<&'a ContourPoint> {
        self.contour.previous(self.index)
    }

    /// Neighbour after the point, wrapping on closed contours.
    pub fn next(&self) -> Option<&'a ContourPoint> {
        self.contour.next(self.index)
    }
}

/// Identity of a hit target built from a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutlineTarget {
    Point(PointId),
    Segment(SegmentPoints),
}

/// Snapshot of one glyph's outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Glyph {
    pub name: String,
    #[serde(default)]
    pub contours: Vec<Contour>,
}

impl Glyph {
    /// Hit priority of on-curve points.
    pub const ON_CURVE_PRIORITY: i32 = 2;
    /// Hit priority of off-curve points.
    pub const OFF_CURVE_PRIORITY: i32 = 1;
    /// Hit priority of segments.
    pub const SEGMENT_PRIORITY: i32 = 0;

    /// Create an empty glyph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contours: Vec::new(),
        }
    }

    /// Append a contour and return its id.
    pub fn add_contour(&mut self, contour: Contour) -> ContourId {
        let id = contour.id;
        self.contours.push(contour);
        id
    }

    /// Contour and index of the point with `id`.
    pub fn find_point(&self, id: PointId) -> Option<PointLocation<'_>> {
        self.contours.iter().find_map(|contour| {
            contour
                .index_of(id)
                .map(|index| PointLocation { contour, index })
        })
    }

    /// Look up a point by id.
    pub fn point(&self, id: PointId) -> Option<&ContourPoint> {
        self.find_point(id).map(|loc| loc.point())
    }

    /// Every point of every contour, in outline order.
    pub fn points(&self) -> impl Iterator<Item = &ContourPoint> {
        self.contours.iter().flat_map(|c| c.points.iter())
    }

    /// Tagged segments of every contour.
    pub fn segments(&self) -> impl Iterator<Item = OutlineSegment> + '_ {
        self.contours.iter().flat_map(|c| c.segments())
    }

    /// Union of all contour bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.contours.iter().filter_map(Contour::bounds).reduce(|a, b| a.union(b))
    }

    fn point_priority(point: &ContourPoint) -> i32 {
        if point.is_on_curve() {
            Self::ON_CURVE_PRIORITY
        } else {
            Self::OFF_CURVE_PRIORITY
        }
    }

    /// Hit targets for every point; on-curve points outrank off-curve ones.
    pub fn point_hit_targets(&self) -> Vec<HitTarget<OutlineTarget>> {
        self.points()
            .map(|p| HitTarget::new(OutlineTarget::Point(p.id), Self::point_priority(p), HitShape::Point(p.position)))
            .collect()
    }

    /// Hit targets for every segment, below all points.
    pub fn segment_hit_targets(&self) -> Vec<HitTarget<OutlineTarget>> {
        self.segments()
            .map(|s| {
                HitTarget::new(
                    OutlineTarget::Segment(s.tag),
                    Self::SEGMENT_PRIORITY,
                    HitShape::Segment(s.curve),
                )
            })
            .collect()
    }

    /// Points followed by segments.
    pub fn hit_targets(&self) -> Vec<HitTarget<OutlineTarget>> {
        let mut targets = self.point_hit_targets();
        targets.extend(self.segment_hit_targets());
        targets
    }

    /// Point snap targets for every point not in `excluded`.
    pub fn point_snap_targets(&self, excluded: &HashSet<PointId>) -> Vec<SnapTarget<PointId>> {
        self.points()
            .filter(|p| !excluded.contains(&p.id))
            .map(|p| SnapTarget::new(p.id, SnapKind::Point(p.position)).with_priority(Self::point_priority(p)))
            .collect()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
