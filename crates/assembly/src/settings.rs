//! Tree-wide configuration.

use std::f64::consts::PI;

use arbor_kernel::Vec3;
use arbor_parts::BuildSettings;
use serde::{Deserialize, Serialize};

use crate::types::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Drag translation increment. Zero disables snapping.
    pub translation_snap: f64,
    /// Drag rotation increment in radians. Zero disables snapping.
    pub rotation_snap: f64,
    pub build: BuildSettings,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            translation_snap: 0.5,
            rotation_snap: PI / 12.0,
            build: BuildSettings::default(),
        }
    }
}

impl TreeSettings {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: TreeSettings =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let b = &self.build;
        if b.arc_points < 2 || b.arc_points % 2 != 0 {
            return Err(SettingsError::OddArcResolution);
        }
        let positive = [
            ("plate_thickness", b.plate_thickness),
            ("monitor_spacing", b.monitor_spacing),
            ("coincidence", b.coincidence),
        ];
        let non_negative = [
            ("clearance", b.clearance),
            ("translation_snap", self.translation_snap),
            ("rotation_snap", self.rotation_snap),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::NonPositive { field, value });
            }
        }
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

/// Whole increments contained in `value`, rounded toward zero.
pub(crate) fn snap(value: f64, increment: f64) -> f64 {
    if increment > 0.0 {
        (value / increment).trunc() * increment
    } else {
        value
    }
}

/// Per-axis [`snap`].
pub(crate) fn snap_vec(v: Vec3, increment: f64) -> Vec3 {
    Vec3::new(
        snap(v.x, increment),
        snap(v.y, increment),
        snap(v.z, increment),
    )
}
