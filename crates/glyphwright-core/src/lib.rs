//! Glyphwright Core Library
//!
//! Curve kernel, hit-testing and snapping for the Glyphwright outline editor.

pub mod consts;
pub mod curve;
pub mod hit_test;
pub mod nearest;
pub mod outline;
pub mod segment;
pub mod settings;
pub mod snap;
pub mod vec;
pub mod viewport;

pub use curve::{Curve, CurveKind, Samples, quadratic_to_cubic};
pub use hit_test::{HitOptions, HitResult, HitShape, HitTarget, Proximity};
pub use nearest::{ClosestPoint, closest_point};
pub use outline::{Contour, ContourId, ContourPoint, Glyph, OutlineTarget, PointId, PointType, SegmentPoints};
pub use segment::Segment;
pub use settings::{EditorSettings, SettingsError, SettingsResult};
pub use snap::{
    Grid, LineSnapMode, SessionConfig, SessionSnap, SnapIndicator, SnapKind, SnapManager, SnapOptions,
    SnapResult, SnapSession, SnapTarget, SnapType,
};
pub use vec::VecExt;
pub use viewport::Viewport;
