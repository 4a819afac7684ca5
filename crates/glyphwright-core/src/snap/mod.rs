//! Snap targets and best-match resolution.
//!
//! Targets are built by the caller for each query. [`find`] resolves every
//! eligible target through its per-kind resolver and keeps the nearest,
//! breaking near-ties by priority exactly like hit-testing does.

pub mod resolve;
pub mod session;

pub use resolve::Resolution;
pub use session::{GuideLine, SessionConfig, SessionSnap, SnapIndicator, SnapManager, SnapSession};

use crate::curve::Curve;
use crate::hit_test::{nearest_distance, rank_cmp};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// How a line target attracts the query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineSnapMode {
    /// Unconstrained closest point on the segment.
    #[default]
    Nearest,
    /// Closest point, but only when its foot lies strictly inside the segment.
    Perpendicular,
    /// The nearer of the two endpoints.
    EndpointOnly,
}

/// A rectangular grid. `spacing_y` defaults to `spacing`, `origin` to (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub spacing: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Point>,
}

impl Grid {
    /// A square grid anchored at the origin.
    pub fn uniform(spacing: f64) -> Self {
        Self {
            spacing,
            spacing_y: None,
            origin: None,
        }
    }
}

/// Geometry a snap target attracts towards.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapKind {
    Point(Point),
    Line { segment: Curve, mode: LineSnapMode },
    Grid(Grid),
    /// Allowed directions (degrees) from `anchor`.
    Angle {
        anchor: Point,
        angles: Vec<f64>,
        tolerance_deg: f64,
    },
    /// Infinite rail through `point` along `direction`.
    Extension { point: Point, direction: Vec2 },
}

/// Discriminant of [`SnapKind`], used for type filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapType {
    Point,
    Line,
    Grid,
    Angle,
    Extension,
}

impl SnapKind {
    pub fn snap_type(&self) -> SnapType {
        match self {
            SnapKind::Point(_) => SnapType::Point,
            SnapKind::Line { .. } => SnapType::Line,
            SnapKind::Grid(_) => SnapType::Grid,
            SnapKind::Angle { .. } => SnapType::Angle,
            SnapKind::Extension { .. } => SnapType::Extension,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapTarget<Id> {
    pub id: Id,
    /// Higher wins when distances tie.
    pub priority: i32,
    /// Text shown next to the snap indicator.
    pub label: Option<String>,
    pub kind: SnapKind,
}

impl<Id> SnapTarget<Id> {
    /// Create a target with priority 0 and no label.
    pub fn new(id: Id, kind: SnapKind) -> Self {
        Self {
            id,
            priority: 0,
            label: None,
            kind,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn snap_type(&self) -> SnapType {
        self.kind.snap_type()
    }

    /// Where this target would move `point`, ignoring any threshold.
    pub fn resolve(&self, point: Point) -> Resolution {
        resolve::resolve(point, &self.kind)
    }
}

/// Result of a snap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult<'a, Id> {
    pub snapped: bool,
    /// Snapped position, or the query point unchanged when `!snapped`.
    pub point: Point,
    pub target: Option<&'a SnapTarget<Id>>,
    /// Distance moved; zero when nothing snapped.
    pub distance: f64,
    pub label: Option<&'a str>,
}

impl<'a, Id> SnapResult<'a, Id> {
    /// No snap; the point passes through.
    pub fn none(point: Point) -> Self {
        Self {
            snapped: false,
            point,
            target: None,
            distance: 0.0,
            label: None,
        }
    }

    fn matched(target: &'a SnapTarget<Id>, resolution: Resolution) -> Self {
        Self {
            snapped: true,
            point: resolution.point,
            target: Some(target),
            distance: resolution.distance,
            label: target.label.as_deref(),
        }
    }
}

/// Options for [`find`] and [`find_all`].
pub struct SnapOptions<'a, Id> {
    /// Matches must lie strictly closer than this.
    pub threshold: f64,
    pub type_filter: Option<&'a [SnapType]>,
    pub filter: Option<&'a dyn Fn(&SnapTarget<Id>) -> bool>,
}

impl<'a, Id> SnapOptions<'a, Id> {
    /// Options accepting every target.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            type_filter: None,
            filter: None,
        }
    }

    /// Only consider targets of these kinds.
    pub fn with_types(mut self, types: &'a [SnapType]) -> Self {
        self.type_filter = Some(types);
        self
    }

    /// Skip targets for which `filter` returns false.
    pub fn with_filter(mut self, filter: &'a dyn Fn(&SnapTarget<Id>) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    fn accepts(&self, target: &SnapTarget<Id>) -> bool {
        self.type_filter.is_none_or(|types| types.contains(&target.snap_type()))
            && self.filter.is_none_or(|f| f(target))
    }
}

/// Best match among `targets`, or an unsnapped result.
pub fn find<'a, Id>(
    point: Point,
    targets: &'a [SnapTarget<Id>],
    options: &SnapOptions<'_, Id>,
) -> SnapResult<'a, Id> {
    let candidates: Vec<_> = matches(point, targets, options).collect();
    let best = nearest_distance(candidates.iter().map(|(_, r)| r.distance)).and_then(|nearest| {
        candidates.into_iter().min_by(|(ta, ra), (tb, rb)| {
            rank_cmp(nearest, (ra.distance, ta.priority), (rb.distance, tb.priority))
        })
    });
    match best {
        Some((target, resolution)) => SnapResult::matched(target, resolution),
        None => SnapResult::none(point),
    }
}

/// Every match within the threshold, ranked like [`find`]: matches within
/// the tie-break band of the nearest come first by priority, the rest follow
/// nearest first. The first entry is always the [`find`] result.
pub fn find_all<'a, Id>(
    point: Point,
    targets: &'a [SnapTarget<Id>],
    options: &SnapOptions<'_, Id>,
) -> Vec<SnapResult<'a, Id>> {
    let mut candidates: Vec<_> = matches(point, targets, options).collect();
    if let Some(nearest) = nearest_distance(candidates.iter().map(|(_, r)| r.distance)) {
        candidates.sort_by(|(ta, ra), (tb, rb)| {
            rank_cmp(nearest, (ra.distance, ta.priority), (rb.distance, tb.priority))
        });
    }
    candidates
        .into_iter()
        .map(|(target, resolution)| SnapResult::matched(target, resolution))
        .collect()
}

fn matches<'a, 'o, 'f, Id>(
    point: Point,
    targets: &'a [SnapTarget<Id>],
    options: &'o SnapOptions<'f, Id>,
) -> impl Iterator<Item = (&'a SnapTarget<Id>, Resolution)> {
    targets
        .iter()
        .filter(move |target| options.accepts(target))
        .filter_map(move |target| {
            let resolution = target.resolve(point);
            (resolution.distance < options.threshold).then_some((target, resolution))
        })
}
