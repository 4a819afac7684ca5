//! Hit-testing of points, segments and rectangles.
//!
//! Single-target tests return a [`Proximity`]; collection queries resolve
//! the best [`HitResult`] by distance, breaking near-ties by priority.

use crate::consts::TIE_BREAK_EPSILON;
use crate::curve::Curve;
use kurbo::{Point, Rect};
use std::cmp::Ordering;

/// Geometry of a hit target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Point(Point),
    Segment(Curve),
    Rect(Rect),
}

/// Something under the cursor that can be hit.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTarget<Id> {
    /// Caller-supplied identity.
    pub id: Id,
    /// Higher wins when distances tie.
    pub priority: i32,
    pub shape: HitShape,
}

impl<Id> HitTarget<Id> {
    pub fn new(id: Id, priority: i32, shape: HitShape) -> Self {
        Self { id, priority, shape }
    }
}

/// Outcome of testing one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub hit: bool,
    /// Distance from the test point to the shape, always `>= 0`.
    pub distance: f64,
    /// Nearest point on the shape, or the test point itself on a miss.
    pub closest_point: Point,
    /// Curve parameter of `closest_point` for segment hits.
    pub t: Option<f64>,
}

impl Proximity {
    fn resolve(test: Point, closest: Point, distance: f64, t: Option<f64>, radius: f64) -> Self {
        if distance < radius {
            Self {
                hit: true,
                distance,
                closest_point: closest,
                t,
            }
        } else {
            Self {
                hit: false,
                distance,
                closest_point: test,
                t: None,
            }
        }
    }
}

/// A hit against a member of a target collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult<'a, Id> {
    pub hit: bool,
    pub distance: f64,
    pub closest_point: Point,
    pub target: &'a HitTarget<Id>,
    pub t: Option<f64>,
}

/// Options for collection queries.
pub struct HitOptions<'a, Id> {
    pub radius: f64,
    pub filter: Option<&'a dyn Fn(&HitTarget<Id>) -> bool>,
}

impl<'a, Id> HitOptions<'a, Id> {
    /// Options with no filter.
    pub fn new(radius: f64) -> Self {
        Self { radius, filter: None }
    }

    /// Skip targets for which `filter` returns false.
    pub fn with_filter(mut self, filter: &'a dyn Fn(&HitTarget<Id>) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    fn accepts(&self, target: &HitTarget<Id>) -> bool {
        self.filter.is_none_or(|f| f(target))
    }
}

/// Whether `test` lies strictly within `radius` of `target`.
pub fn point(test: Point, target: Point, radius: f64) -> bool {
    test.distance_squared(target) < radius * radius
}

/// Proximity of `test` to a curve; a hit requires `distance < radius`.
pub fn segment(test: Point, curve: &Curve, radius: f64) -> Proximity {
    let nearest = curve.closest_point(test);
    Proximity::resolve(test, nearest.point, nearest.distance, Some(nearest.t), radius)
}

/// [`segment`] for a straight segment.
pub fn line_segment(test: Point, p0: Point, p1: Point, radius: f64) -> Proximity {
    segment(test, &Curve::line(p0, p1), radius)
}

/// Proximity of `test` to the outline of `rect`.
pub fn rect_boundary(test: Point, rect: Rect, radius: f64) -> Proximity {
    let (closest, distance) = nearest_on_boundary(test, rect);
    Proximity::resolve(test, closest, distance, None, radius)
}

/// Inclusive containment: points on the edges are inside.
pub fn rect_contains(test: Point, rect: Rect) -> bool {
    let rect = rect.abs();
    test.x >= rect.x0 && test.x <= rect.x1 && test.y >= rect.y0 && test.y <= rect.y1
}

/// Best hit among `targets`: the highest priority among hits within
/// `TIE_BREAK_EPSILON` of the nearest one, then the nearer of those.
/// `None` if nothing is hit.
pub fn collection<'a, Id>(
    test: Point,
    targets: &'a [HitTarget<Id>],
    options: &HitOptions<'_, Id>,
) -> Option<HitResult<'a, Id>> {
    let results: Vec<_> = hits(test, targets, options).collect();
    let nearest = nearest_distance(results.iter().map(|r| r.distance))?;
    results.into_iter().min_by(|a, b| {
        rank_cmp(nearest, (a.distance, a.target.priority), (b.distance, b.target.priority))
    })
}

/// Every hit within the radius, nearest first. Priority is ignored.
pub fn all_in_radius<'a, Id>(
    test: Point,
    targets: &'a [HitTarget<Id>],
    options: &HitOptions<'_, Id>,
) -> Vec<HitResult<'a, Id>> {
    let mut results: Vec<_> = hits(test, targets, options).collect();
    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    results
}

/// Targets fully inside `rect` (marquee selection).
///
/// Segments count only when both endpoints are inside; a segment that merely
/// crosses the rectangle is not selected.
pub fn in_rect<Id>(rect: Rect, targets: &[HitTarget<Id>]) -> Vec<&HitTarget<Id>> {
    targets
        .iter()
        .filter(|target| match target.shape {
            HitShape::Point(p) => rect_contains(p, rect),
            HitShape::Segment(curve) => {
                rect_contains(curve.start(), rect) && rect_contains(curve.end(), rect)
            }
            HitShape::Rect(inner) => {
                let inner = inner.abs();
                rect_contains(Point::new(inner.x0, inner.y0), rect)
                    && rect_contains(Point::new(inner.x1, inner.y1), rect)
            }
        })
        .collect()
}

/// Test one target. Rectangles are hit from inside (distance 0) or near
/// their outline.
pub fn evaluate<Id>(test: Point, target: &HitTarget<Id>, radius: f64) -> Proximity {
    match target.shape {
        HitShape::Point(p) => {
            let distance = test.distance(p);
            Proximity::resolve(test, p, distance, None, radius)
        }
        HitShape::Segment(curve) => segment(test, &curve, radius),
        HitShape::Rect(rect) => {
            if rect_contains(test, rect) {
                Proximity::resolve(test, test, 0.0, None, radius)
            } else {
                rect_boundary(test, rect, radius)
            }
        }
    }
}

pub(crate) fn nearest_distance(distances: impl Iterator<Item = f64>) -> Option<f64> {
    distances.min_by(f64::total_cmp)
}

/// Orders `(distance, priority)` candidates so the winner comes first.
///
/// Candidates within `TIE_BREAK_EPSILON` of `nearest` lead, highest priority
/// first; everything else follows by distance. Ranking against the single
/// nearest distance keeps the order independent of input order.
pub(crate) fn rank_cmp(nearest: f64, a: (f64, i32), b: (f64, i32)) -> Ordering {
    let in_band = |distance: f64| distance - nearest < TIE_BREAK_EPSILON;
    let (a_band, b_band) = (in_band(a.0), in_band(b.0));
    b_band
        .cmp(&a_band)
        .then_with(|| if a_band { b.1.cmp(&a.1) } else { Ordering::Equal })
        .then_with(|| a.0.total_cmp(&b.0))
        .then_with(|| b.1.cmp(&a.1))
}

fn hits<'a, 'o, 'f, Id>(
    test: Point,
    targets: &'a [HitTarget<Id>],
    options: &'o HitOptions<'f, Id>,
) -> impl Iterator<Item = HitResult<'a, Id>> {
    targets
        .iter()
        .filter(move |target| options.accepts(target))
        .filter_map(move |target| {
            let p = evaluate(test, target, options.radius);
            p.hit.then_some(HitResult {
                hit: true,
                distance: p.distance,
                closest_point: p.closest_point,
                target,
                t: p.t,
            })
        })
}

fn nearest_on_boundary(test: Point, rect: Rect) -> (Point, f64) {
    let rect = rect.abs();
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let mut best = (corners[0], f64::INFINITY);
    for i in 0..4 {
        let edge = Curve::line(corners[i], corners[(i + 1) % 4]);
        let nearest = edge.closest_point(test);
        if nearest.distance < best.1 {
            best = (nearest.point, nearest.distance);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_point_strict_radius() {
        assert!(!point(pt(0.0, 0.0), pt(3.0, 4.0), 5.0));
        assert!(point(pt(0.0, 0.0), pt(3.0, 4.0), 5.01));
    }

    #[test]
    fn test_segment_boundary_is_a_miss() {
        let hit = line_segment(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0), 3.0);
        assert!(!hit.hit);
        assert_eq!(hit.closest_point, pt(5.0, 3.0));
        assert!((hit.distance - 3.0).abs() < 1e-12);

        let hit = line_segment(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0), 3.0001);
        assert!(hit.hit);
        assert_eq!(hit.closest_point, pt(5.0, 0.0));
        assert_eq!(hit.t, Some(0.5));
    }

    #[test]
    fn test_curve_segment() {
        let curve = Curve::quadratic(pt(0.0, 0.0), pt(50.0, 100.0), pt(100.0, 0.0));
        let hit = segment(pt(50.0, 52.0), &curve, 4.0);
        assert!(hit.hit);
        assert!((hit.distance - 2.0).abs() < 1e-6);
        assert!(hit.t.is_some());
    }

    #[test]
    fn test_rect_boundary_and_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let near = rect_boundary(pt(5.0, 11.0), rect, 2.0);
        assert!(near.hit);
        assert_eq!(near.closest_point, pt(5.0, 10.0));

        let centre = rect_boundary(pt(5.0, 5.0), rect, 2.0);
        assert!(!centre.hit);
        assert!((centre.distance - 5.0).abs() < 1e-12);

        assert!(rect_contains(pt(10.0, 10.0), rect));
        assert!(rect_contains(pt(0.0, 5.0), rect));
        assert!(!rect_contains(pt(10.01, 5.0), rect));
    }

    #[test]
    fn test_collection_priority_tie_break() {
        let targets = vec![
            HitTarget::new("a", 1, HitShape::Point(pt(5.0, 0.0))),
            HitTarget::new("b", 100, HitShape::Point(pt(0.0, 5.0))),
        ];
        let best = collection(pt(0.0, 0.0), &targets, &HitOptions::new(6.0)).unwrap();
        assert_eq!(best.target.id, "b");
        assert!((best.distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_collection_epsilon_band() {
        // 0.0005 apart: inside the band, priority decides.
        let targets = vec![
            HitTarget::new("near", 0, HitShape::Point(pt(2.0, 0.0))),
            HitTarget::new("important", 5, HitShape::Point(pt(2.0005, 0.0))),
            // 0.5 further: distance decides regardless of priority.
            HitTarget::new("far", 50, HitShape::Point(pt(2.5, 0.0))),
        ];
        let best = collection(pt(0.0, 0.0), &targets, &HitOptions::new(10.0)).unwrap();
        assert_eq!(best.target.id, "important");
    }

    #[test]
    fn test_collection_ignores_target_order() {
        // "mid" is inside the band around "near"; "chained" is only inside
        // the band around "mid" and must never win.
        let mut targets = vec![
            HitTarget::new("near", 0, HitShape::Point(pt(2.0, 0.0))),
            HitTarget::new("mid", 5, HitShape::Point(pt(2.0008, 0.0))),
            HitTarget::new("chained", 10, HitShape::Point(pt(2.0016, 0.0))),
        ];
        let options = HitOptions::new(10.0);
        let forward = collection(pt(0.0, 0.0), &targets, &options).unwrap().target.id;
        targets.reverse();
        let reversed = collection(pt(0.0, 0.0), &targets, &options).unwrap().target.id;
        assert_eq!(forward, "mid");
        assert_eq!(reversed, "mid");
    }

    #[test]
    fn test_rank_cmp_band_then_distance() {
        let nearest = 1.0;
        assert_eq!(rank_cmp(nearest, (1.0005, 9), (1.0, 0)), Ordering::Less);
        assert_eq!(rank_cmp(nearest, (1.0, 0), (1.5, 9)), Ordering::Less);
        assert_eq!(rank_cmp(nearest, (1.0, 3), (1.0005, 3)), Ordering::Less);
        assert_eq!(rank_cmp(nearest, (2.0, 1), (2.0, 4)), Ordering::Greater);
    }

    #[test]
    fn test_collection_miss_and_filter() {
        let targets = vec![
            HitTarget::new(1, 0, HitShape::Point(pt(1.0, 0.0))),
            HitTarget::new(2, 0, HitShape::Point(pt(3.0, 0.0))),
        ];
        assert!(collection(pt(50.0, 50.0), &targets, &HitOptions::new(5.0)).is_none());

        let only_two = |t: &HitTarget<i32>| t.id == 2;
        let options = HitOptions::new(5.0).with_filter(&only_two);
        let best = collection(pt(0.0, 0.0), &targets, &options).unwrap();
        assert_eq!(best.target.id, 2);
    }

    #[test]
    fn test_all_in_radius_sorted_by_distance_only() {
        let targets = vec![
            HitTarget::new("far", 99, HitShape::Point(pt(4.0, 0.0))),
            HitTarget::new("seg", 0, HitShape::Segment(Curve::line(pt(-5.0, 1.0), pt(5.0, 1.0)))),
            HitTarget::new("out", 0, HitShape::Point(pt(40.0, 0.0))),
            HitTarget::new("box", 0, HitShape::Rect(Rect::new(-1.0, -1.0, 1.0, 1.0))),
        ];
        let all = all_in_radius(pt(0.0, 0.0), &targets, &HitOptions::new(5.0));
        let ids: Vec<_> = all.iter().map(|r| r.target.id).collect();
        assert_eq!(ids, vec!["box", "seg", "far"]);
        assert!(all.iter().all(|r| r.hit && r.distance >= 0.0));
    }

    #[test]
    fn test_in_rect() {
        let marquee = Rect::new(0.0, 0.0, 10.0, 10.0);
        let targets = vec![
            HitTarget::new("inside", 0, HitShape::Point(pt(5.0, 5.0))),
            HitTarget::new("outside", 0, HitShape::Point(pt(15.0, 5.0))),
            HitTarget::new("contained", 0, HitShape::Segment(Curve::line(pt(1.0, 1.0), pt(9.0, 9.0)))),
            HitTarget::new("crossing", 0, HitShape::Segment(Curve::line(pt(-5.0, 5.0), pt(15.0, 5.0)))),
            HitTarget::new("box", 0, HitShape::Rect(Rect::new(2.0, 2.0, 8.0, 8.0))),
            HitTarget::new("big box", 0, HitShape::Rect(Rect::new(2.0, 2.0, 18.0, 8.0))),
        ];
        let ids: Vec<_> = in_rect(marquee, &targets).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["inside", "contained", "box"]);
    }
}
