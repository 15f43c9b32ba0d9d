//! Render settings and preferences
//!
//! Persisted as JSON next to the level files. Missing fields take their
//! defaults, so older settings files keep loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BOUNCE_LIMIT, FOV, MAX_BOUNCES, MAX_DEPTH, MIN_BRIGHTNESS, MIRROR_REFLECTANCE, SCREEN_ROWS,
    SHADE_FALLOFF,
};
use crate::renderer::{FrameParams, Screen, Shading};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Rays cast per frame
    pub fn columns(&self) -> u32 {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 200,
            QualityPreset::High => 400,
        }
    }
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Column count to use instead of the preset's
    pub column_override: Option<u32>,
    /// Output rows
    pub screen_height: u32,

    // === Camera ===
    /// Horizontal field of view in degrees
    pub fov_degrees: f64,
    /// Mirror bounces per column before a surface is drawn opaque
    pub max_bounces: u32,
    /// Draw distance in cells
    pub max_depth: f64,

    // === Shading ===
    pub shade_falloff: f64,
    pub min_brightness: f64,
    pub mirror_reflectance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            column_override: None,
            screen_height: SCREEN_ROWS,

            fov_degrees: FOV.to_degrees(),
            max_bounces: MAX_BOUNCES,
            max_depth: MAX_DEPTH,

            shade_falloff: SHADE_FALLOFF,
            min_brightness: MIN_BRIGHTNESS,
            mirror_reflectance: MIRROR_REFLECTANCE,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset keeps one bounce
        if preset == QualityPreset::Low {
            self.max_bounces = self.max_bounces.min(1);
        }
    }

    /// Effective column count
    pub fn columns(&self) -> u32 {
        self.column_override.unwrap_or_else(|| self.quality.columns())
    }

    /// Field of view in radians, kept inside (1, 179) degrees
    pub fn fov(&self) -> f64 {
        let degrees = if self.fov_degrees.is_finite() {
            self.fov_degrees.clamp(1.0, 179.0)
        } else {
            FOV.to_degrees()
        };
        degrees.to_radians()
    }

    /// Bounce budget, at most [`BOUNCE_LIMIT`]
    pub fn max_bounces(&self) -> u32 {
        self.max_bounces.min(BOUNCE_LIMIT)
    }

    /// Draw distance in cells; anything but a positive finite value means the default
    pub fn max_depth(&self) -> f64 {
        if self.max_depth.is_finite() && self.max_depth > 0.0 {
            self.max_depth
        } else {
            MAX_DEPTH
        }
    }

    pub fn screen(&self) -> Screen {
        Screen::new(self.columns(), self.screen_height, self.fov())
    }

    /// Shading parameters, clamped to sane ranges
    pub fn shading(&self) -> Shading {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        let min_brightness = finite_or(self.min_brightness, MIN_BRIGHTNESS).clamp(0.0, 1.0);
        Shading {
            falloff: finite_or(self.shade_falloff, SHADE_FALLOFF).max(0.0),
            min_brightness,
            reflectance: finite_or(self.mirror_reflectance, MIRROR_REFLECTANCE).clamp(0.0, 1.0),
        }
    }

    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            screen: self.screen(),
            max_bounces: self.max_bounces(),
            max_depth: self.max_depth(),
            shading: self.shading(),
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(json) = std::fs::read_to_string(path) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(err) => log::warn!("Ignoring malformed settings {}: {err}", path.display()),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("LOW"), Some(QualityPreset::Low));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_columns_follow_preset_unless_overridden() {
        let mut s = Settings::from_preset(QualityPreset::High);
        assert_eq!(s.columns(), 400);
        s.column_override = Some(33);
        assert_eq!(s.columns(), 33);
        assert_eq!(s.screen().width, 33);
    }

    #[test]
    fn test_low_preset_limits_bounces() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_bounces, 1);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_bounces, MAX_BOUNCES);
    }

    #[test]
    fn test_default_fov_is_sixty_degrees() {
        let s = Settings::default();
        assert!((s.fov() - FOV).abs() < 1e-12);
    }

    #[test]
    fn test_fov_is_clamped() {
        let s = Settings {
            fov_degrees: 400.0,
            ..Settings::default()
        };
        assert!((s.fov() - 179f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_shading_is_clamped() {
        let s = Settings {
            min_brightness: 3.0,
            mirror_reflectance: -1.0,
            shade_falloff: f64::NAN,
            ..Settings::default()
        };
        let shading = s.shading();
        assert_eq!(shading.min_brightness, 1.0);
        assert_eq!(shading.reflectance, 0.0);
        assert_eq!(shading.falloff, SHADE_FALLOFF);
    }

    #[test]
    fn test_frame_params_clamp_bounces_and_depth() {
        let s = Settings {
            max_bounces: u32::MAX,
            max_depth: -3.0,
            ..Settings::default()
        };
        let params = s.frame_params();
        assert_eq!(params.max_bounces, BOUNCE_LIMIT);
        assert_eq!(params.max_depth, MAX_DEPTH);

        let s = Settings {
            max_bounces: 5,
            max_depth: 35.0,
            ..Settings::default()
        };
        assert_eq!(s.frame_params().max_bounces, 5);
        assert_eq!(s.frame_params().max_depth, 35.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "max_bounces": 7 }"#).unwrap();
        assert_eq!(s.max_bounces, 7);
        assert_eq!(s.quality, QualityPreset::Medium);
        assert_eq!(s.screen_height, Settings::default().screen_height);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("mirror_maze_settings_{}.json", std::process::id()));
        let s = Settings {
            quality: QualityPreset::Low,
            column_override: Some(120),
            ..Settings::default()
        };
        s.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        assert_eq!(Settings::load("/definitely/not/here.json"), Settings::default());
    }
}
