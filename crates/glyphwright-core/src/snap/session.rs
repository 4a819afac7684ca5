//! Per-drag snapping state.
//!
//! A [`SnapSession`] lives for exactly one drag gesture. It resolves the
//! reference point once at the start, then snaps each pointer move either to
//! constrained angles around the reference (modifier held) or to axis rails
//! and other points (modifier released).

use super::resolve::to_angle;
use super::{Grid, SnapKind, SnapOptions, SnapTarget, find};
use crate::consts::{
    DEFAULT_ANGLE_HYSTERESIS_DEG, DEFAULT_ANGLE_INCREMENT_DEG, DEFAULT_SNAP_THRESHOLD,
    DEGENERATE_EPSILON,
};
use crate::outline::{Glyph, PointId};
use crate::vec::{angle_between, angular_difference, normalize_degrees};
use kurbo::{Point, Vec2};
use log::{debug, trace, warn};
use std::collections::HashSet;

/// Snapping parameters for one session, in UPM and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Maximum distance for axis and point snaps.
    pub threshold: f64,
    /// Allowed angles are the multiples of this increment.
    pub angle_increment_deg: f64,
    /// Extra slack given to the previously accepted angle.
    pub hysteresis_deg: f64,
    pub axis_snap: bool,
    pub point_snap: bool,
    /// Design grid competing with axis and point snaps.
    pub grid: Option<Grid>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            angle_increment_deg: DEFAULT_ANGLE_INCREMENT_DEG,
            hysteresis_deg: DEFAULT_ANGLE_HYSTERESIS_DEG,
            axis_snap: true,
            point_snap: true,
            grid: None,
        }
    }
}

/// A guide line to draw as snap feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub from: Point,
    pub to: Point,
}

/// What the renderer should draw for the current snap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapIndicator {
    pub lines: Vec<GuideLine>,
    pub markers: Vec<Point>,
}

/// Outcome of one pointer move.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnap {
    pub snapped_point: Point,
    pub indicator: Option<SnapIndicator>,
}

impl SessionSnap {
    fn raw(point: Point) -> Self {
        Self {
            snapped_point: point,
            indicator: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Snapping state for a single drag gesture.
#[derive(Debug, Clone)]
pub struct SnapSession {
    reference: Point,
    excluded: HashSet<PointId>,
    previous_angle: Option<f64>,
    config: SessionConfig,
    point_targets: Vec<SnapTarget<PointId>>,
    axis_targets: Vec<SnapTarget<Axis>>,
}

impl SnapSession {
    /// Start a session for dragging `dragged`. Points in `excluded` (plus
    /// `dragged` itself) are never snapped to.
    pub fn begin(
        glyph: &Glyph,
        dragged: PointId,
        drag_start: Point,
        excluded: &[PointId],
        config: SessionConfig,
    ) -> Self {
        let reference = resolve_reference(glyph, dragged, drag_start);
        let excluded: HashSet<PointId> = excluded.iter().copied().chain([dragged]).collect();
        let point_targets = glyph.point_snap_targets(&excluded);
        let axis_targets = vec![
            SnapTarget::new(
                Axis::Horizontal,
                SnapKind::Extension {
                    point: reference,
                    direction: Vec2::new(1.0, 0.0),
                },
            )
            .with_label("horizontal"),
            SnapTarget::new(
                Axis::Vertical,
                SnapKind::Extension {
                    point: reference,
                    direction: Vec2::new(0.0, 1.0),
                },
            )
            .with_label("vertical"),
        ];

        debug!(
            "snap session begin: dragged={dragged} reference=({:.2}, {:.2}) targets={}",
            reference.x,
            reference.y,
            point_targets.len()
        );

        Self {
            reference,
            excluded,
            previous_angle: None,
            config,
            point_targets,
            axis_targets,
        }
    }

    pub fn reference(&self) -> Point {
        self.reference
    }

    /// The last angle accepted while the modifier was held.
    pub fn previous_angle(&self) -> Option<f64> {
        self.previous_angle
    }

    pub fn is_excluded(&self, id: PointId) -> bool {
        self.excluded.contains(&id)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Snap one pointer position.
    pub fn snap(&mut self, point: Point, modifier_active: bool) -> SessionSnap {
        let result = if modifier_active {
            self.snap_angle(point)
        } else {
            self.snap_axis_or_point(point)
        };
        trace!(
            "snap ({:.2}, {:.2}) -> ({:.2}, {:.2}) modifier={modifier_active}",
            point.x, point.y, result.snapped_point.x, result.snapped_point.y
        );
        result
    }

    /// Finish the gesture.
    pub fn end(self) {
        debug!("snap session end: last angle={:?}", self.previous_angle);
    }

    fn snap_angle(&mut self, point: Point) -> SessionSnap {
        let increment = self.config.angle_increment_deg;
        if increment <= 0.0 || self.reference.distance_squared(point) < DEGENERATE_EPSILON {
            return SessionSnap::raw(point);
        }

        let raw = angle_between(self.reference, point);
        let nearest = normalize_degrees((raw / increment).round() * increment);
        let chosen = match self.previous_angle {
            Some(prev)
                if angular_difference(raw, prev)
                    <= angular_difference(raw, nearest) + self.config.hysteresis_deg =>
            {
                prev
            }
            _ => nearest,
        };
        self.previous_angle = Some(chosen);

        // Tolerance 180 always matches.
        let snapped = to_angle(point, self.reference, &[chosen], 180.0).point;
        SessionSnap {
            snapped_point: snapped,
            indicator: Some(SnapIndicator {
                lines: vec![GuideLine {
                    from: self.reference,
                    to: snapped,
                }],
                markers: vec![self.reference],
            }),
        }
    }

    fn snap_axis_or_point(&self, point: Point) -> SessionSnap {
        let threshold = self.config.threshold;
        let mut best: Option<(f64, SessionSnap)> = None;
        let mut consider = |candidate: SessionSnap| {
            let distance = candidate.snapped_point.distance(point);
            if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((distance, candidate));
            }
        };

        if self.config.point_snap {
            let result = find(point, &self.point_targets, &SnapOptions::new(threshold));
            if result.snapped {
                consider(SessionSnap {
                    snapped_point: result.point,
                    indicator: Some(SnapIndicator {
                        lines: Vec::new(),
                        markers: vec![result.point],
                    }),
                });
            }
        }

        if self.config.axis_snap {
            let result = find(point, &self.axis_targets, &SnapOptions::new(threshold));
            if result.snapped {
                consider(SessionSnap {
                    snapped_point: result.point,
                    indicator: Some(SnapIndicator {
                        lines: vec![GuideLine {
                            from: self.reference,
                            to: result.point,
                        }],
                        markers: vec![result.point],
                    }),
                });
            }
        }

        if let Some(grid) = self.config.grid {
            let target = [SnapTarget::new((), SnapKind::Grid(grid))];
            let result = find(point, &target, &SnapOptions::new(threshold));
            if result.snapped {
                consider(SessionSnap {
                    snapped_point: result.point,
                    indicator: Some(SnapIndicator {
                        lines: Vec::new(),
                        markers: vec![result.point],
                    }),
                });
            }
        }

        best.map_or_else(|| SessionSnap::raw(point), |(_, snap)| snap)
    }
}

/// Reference point for dragging `dragged`.
///
/// On-curve points use `drag_start`. Off-curve points reference their
/// preceding on-curve neighbour, or failing that the following one, which
/// covers both controls of an `anchor → control → control → anchor` run.
pub fn resolve_reference(glyph: &Glyph, dragged: PointId, drag_start: Point) -> Point {
    let Some(location) = glyph.find_point(dragged) else {
        debug!("dragged point {dragged} not in glyph {}", glyph.name);
        return drag_start;
    };
    if location.point().is_on_curve() {
        return drag_start;
    }
    if let Some(prev) = location.previous().filter(|p| p.is_on_curve()) {
        return prev.position;
    }
    if let Some(next) = location.next().filter(|p| p.is_on_curve()) {
        return next.position;
    }
    warn!("off-curve point {dragged} has no on-curve neighbour; using drag start");
    drag_start
}

/// Owns the session of the active drag gesture, if any.
#[derive(Debug, Default)]
pub struct SnapManager {
    session: Option<SnapSession>,
}

impl SnapManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session, replacing any active one.
    pub fn begin(
        &mut self,
        glyph: &Glyph,
        dragged: PointId,
        drag_start: Point,
        excluded: &[PointId],
        config: SessionConfig,
    ) {
        if let Some(previous) = self.session.take() {
            debug!("replacing active snap session");
            previous.end();
        }
        self.session = Some(SnapSession::begin(glyph, dragged, drag_start, excluded, config));
    }

    /// Snap through the active session; the point passes through unchanged
    /// when no gesture is active.
    pub fn snap(&mut self, point: Point, modifier_active: bool) -> SessionSnap {
        match self.session.as_mut() {
            Some(session) => session.snap(point, modifier_active),
            None => SessionSnap::raw(point),
        }
    }

    pub fn end(&mut self) {
        if let Some(session) = self.session.take() {
            session.end();
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SnapSession> {
        self.session.as_ref()
    }
}
