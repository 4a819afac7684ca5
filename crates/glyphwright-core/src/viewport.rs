//! Screen ↔ UPM conversion.
//!
//! Font units grow upwards while screen pixels grow downwards, so the view
//! transform flips the y axis in addition to panning and zooming.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

const MIN_ZOOM: f64 = 0.02;
const MAX_ZOOM: f64 = 64.0;

/// Pan and zoom of the glyph view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Screen position of the UPM origin.
    pub offset: Vec2,
    /// Screen pixels per font unit.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(offset: Vec2, zoom: f64) -> Self {
        Self {
            offset,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// UPM → screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale_non_uniform(self.zoom, -self.zoom)
    }

    /// Screen → UPM.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale_non_uniform(1.0 / self.zoom, -1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_upm(&self, screen: Point) -> Point {
        self.inverse_transform() * screen
    }

    pub fn upm_to_screen(&self, upm: Point) -> Point {
        self.transform() * upm
    }

    /// Convert a screen-pixel tolerance (hit radius, snap threshold) to UPM,
    /// so it stays the same size on screen at every zoom level.
    pub fn tolerance_to_upm(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let anchor = self.screen_to_upm(screen);
        self.zoom = zoom;
        self.offset += screen - self.upm_to_screen(anchor);
    }

    /// Centre `bounds` (UPM) in a view of `size` pixels with `padding` on
    /// every side.
    pub fn fit_to_bounds(&mut self, bounds: Rect, size: Size, padding: f64) {
        if bounds.width() <= 0.0 && bounds.height() <= 0.0 {
            *self = Self::default();
            return;
        }
        let available = Size::new(
            (size.width - padding * 2.0).max(1.0),
            (size.height - padding * 2.0).max(1.0),
        );
        let sx = available.width / bounds.width().max(f64::EPSILON);
        let sy = available.height / bounds.height().max(f64::EPSILON);
        self.zoom = sx.min(sy).clamp(MIN_ZOOM, MAX_ZOOM);

        let centre = bounds.center();
        self.offset = Vec2::new(
            size.width / 2.0 - centre.x * self.zoom,
            size.height / 2.0 + centre.y * self.zoom,
        );
    }
}
