//! A curve with an attached identity tag.
//!
//! Pure geometry uses `Segment<()>`; editing code tags each segment with the
//! ids of the contour points it was built from (see
//! [`SegmentPoints`](crate::outline::SegmentPoints)). All math lives on
//! [`Curve`], so tagged and untagged segments share one implementation.

use crate::curve::{Curve, CurveKind};
use crate::nearest::ClosestPoint;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment<Tag = ()> {
    pub curve: Curve,
    pub tag: Tag,
}

impl Segment<()> {
    /// An untagged segment.
    pub fn new(curve: Curve) -> Self {
        Self { curve, tag: () }
    }
}

impl<Tag> Segment<Tag> {
    /// A segment carrying `tag`.
    pub fn tagged(curve: Curve, tag: Tag) -> Self {
        Self { curve, tag }
    }

    /// Get the degree of the underlying curve.
    pub fn kind(&self) -> CurveKind {
        self.curve.kind()
    }

    /// Evaluate the curve at `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        self.curve.point_at(t)
    }

    /// Tight bounding box, including extrema.
    pub fn bounds(&self) -> Rect {
        self.curve.bounds()
    }

    /// Approximate arc length.
    pub fn length(&self) -> f64 {
        self.curve.length()
    }

    /// Nearest point on the curve to `query`.
    pub fn closest_point(&self, query: Point) -> ClosestPoint {
        self.curve.closest_point(query)
    }

    /// Replace the tag, keeping the geometry.
    pub fn map_tag<U>(self, f: impl FnOnce(Tag) -> U) -> Segment<U> {
        Segment {
            curve: self.curve,
            tag: f(self.tag),
        }
    }
}

impl<Tag: Clone> Segment<Tag> {
    /// Split at `t`; both halves keep the tag.
    pub fn split_at(&self, t: f64) -> (Segment<Tag>, Segment<Tag>) {
        let (left, right) = self.curve.split_at(t);
        (Segment::tagged(left, self.tag.clone()), Segment::tagged(right, self.tag.clone()))
    }
}

impl From<Curve> for Segment<()> {
    fn from(curve: Curve) -> Self {
        Segment::new(curve)
    }
}
