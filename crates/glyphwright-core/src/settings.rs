//! Editor tolerances and snapping preferences.
//!
//! Pixel values are screen-space; [`EditorSettings::session_config`] and
//! [`EditorSettings::hit_radius`] convert them into UPM for a given viewport.

use crate::consts::{
    DEFAULT_ANGLE_HYSTERESIS_DEG, DEFAULT_ANGLE_INCREMENT_DEG, DEFAULT_HIT_RADIUS,
    DEFAULT_SNAP_THRESHOLD,
};
use crate::snap::{Grid, SessionConfig};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HitSettings {
    /// Hit radius in screen pixels.
    pub radius: f64,
}

impl Default for HitSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_HIT_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapSettings {
    /// Snap threshold in screen pixels.
    pub threshold: f64,
    pub angle_increment_deg: f64,
    pub hysteresis_deg: f64,
    pub axis_snap: bool,
    pub point_snap: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            angle_increment_deg: DEFAULT_ANGLE_INCREMENT_DEG,
            hysteresis_deg: DEFAULT_ANGLE_HYSTERESIS_DEG,
            axis_snap: true,
            point_snap: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    pub hit: HitSettings,
    pub snap: SnapSettings,
    /// Optional design grid, in UPM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
}

impl EditorSettings {
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> SettingsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Read and validate settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        let checks = [
            (self.hit.radius > 0.0, "hit.radius must be positive"),
            (self.snap.threshold > 0.0, "snap.threshold must be positive"),
            (
                self.snap.angle_increment_deg > 0.0 && self.snap.angle_increment_deg <= 180.0,
                "snap.angleIncrementDeg must be in (0, 180]",
            ),
            (self.snap.hysteresis_deg >= 0.0, "snap.hysteresisDeg must not be negative"),
            (
                self.grid.is_none_or(|g| g.spacing > 0.0 && g.spacing_y.is_none_or(|y| y > 0.0)),
                "grid spacing must be positive",
            ),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, message)) => {
                log::warn!("rejecting editor settings: {message}");
                Err(SettingsError::Invalid((*message).to_string()))
            }
            None => Ok(()),
        }
    }

    /// Hit radius in UPM at the current zoom.
    pub fn hit_radius(&self, viewport: &Viewport) -> f64 {
        viewport.tolerance_to_upm(self.hit.radius)
    }

    /// Snap session parameters in UPM at the current zoom.
    pub fn session_config(&self, viewport: &Viewport) -> SessionConfig {
        SessionConfig {
            threshold: viewport.tolerance_to_upm(self.snap.threshold),
            angle_increment_deg: self.snap.angle_increment_deg,
            hysteresis_deg: self.snap.hysteresis_deg,
            axis_snap: self.snap.axis_snap,
            point_snap: self.snap.point_snap,
            grid: self.grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = EditorSettings::default();
        assert_eq!(settings.hit.radius, 8.0);
        assert_eq!(settings.snap.threshold, 10.0);
        assert_eq!(settings.snap.angle_increment_deg, 45.0);
        assert!(settings.snap.axis_snap && settings.snap.point_snap);
        assert!(settings.grid.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = EditorSettings::from_json(r#"{"snap": {"angleIncrementDeg": 15}}"#).unwrap();
        assert_eq!(settings.snap.angle_increment_deg, 15.0);
        assert_eq!(settings.snap.threshold, 10.0);
        assert_eq!(settings.hit, HitSettings::default());
    }

    #[test]
    fn test_json_round_trip_with_grid() {
        let settings = EditorSettings {
            grid: Some(Grid {
                spacing: 50.0,
                spacing_y: Some(25.0),
                origin: None,
            }),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"spacingY\": 25.0"));
        assert!(!json.contains("origin"));
        assert_eq!(EditorSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EditorSettings::from_json(r#"{"hit": {"radius": 0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = EditorSettings::from_json(r#"{"grid": {"spacing": 10, "spacingY": -1}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = EditorSettings::from_json("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"hit": {{"radius": 12}}, "snap": {{"axisSnap": false}}}}"#).unwrap();
        let settings = EditorSettings::load(file.path()).unwrap();
        assert_eq!(settings.hit.radius, 12.0);
        assert!(!settings.snap.axis_snap);

        let err = EditorSettings::load(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_tolerances_follow_zoom() {
        let settings = EditorSettings::default();
        let view = Viewport::new(Vec2::ZERO, 2.0);
        assert!((settings.hit_radius(&view) - 4.0).abs() < 1e-12);
        let config = settings.session_config(&view);
        assert!((config.threshold - 5.0).abs() < 1e-12);
        assert_eq!(config.angle_increment_deg, 45.0);
        assert!(config.grid.is_none());
    }
}
