//! Numeric constants shared by the curve kernel, the closest-point solver,
//! hit-testing and snapping.

/// Number of equal parameter steps used for chord-length approximation and
/// for the coarse closest-point search (which samples `CURVE_SUBDIVISIONS + 1`
/// parameters, endpoints included).
pub const CURVE_SUBDIVISIONS: usize = 32;

/// Distances closer than this are treated as equal when breaking ties by
/// priority.
pub const TIE_BREAK_EPSILON: f64 = 0.001;

/// Newton-Raphson stops once the parameter step drops below this.
pub const NEWTON_TOLERANCE: f64 = 1e-6;

/// Upper bound on Newton-Raphson iterations per query.
pub const NEWTON_MAX_ITERATIONS: usize = 8;

/// Derivative magnitudes below this are considered stationary.
pub const DEGENERATE_EPSILON: f64 = 1e-10;

/// Leading coefficients below this make the extrema equation drop a degree.
pub const EXTREMA_EPSILON: f64 = 1e-12;

/// Default hit radius in screen pixels.
pub const DEFAULT_HIT_RADIUS: f64 = 8.0;

/// Default snap threshold in screen pixels.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;

/// Default spacing between allowed angles for constrained dragging.
pub const DEFAULT_ANGLE_INCREMENT_DEG: f64 = 45.0;

/// Extra angular margin the previously accepted angle keeps over a closer
/// candidate before the session switches.
pub const DEFAULT_ANGLE_HYSTERESIS_DEG: f64 = 5.0;
