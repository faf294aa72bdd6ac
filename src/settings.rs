//! Game settings and preferences
//!
//! Read once at startup from JSON; every field falls back to its default.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed level seed; a fresh one per run when absent
    pub seed: Option<u64>,

    // === Audio ===
    pub music_enabled: bool,
    pub sfx_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Visual Effects ===
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (landing dust, bursts)
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no blinking, flashing or bobbing)
    pub reduced_motion: bool,

    // === Headless runner ===
    /// Simulation frames to run natively
    pub frames: u32,
    /// Steer toward the nearest platform above instead of idling
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            music_enabled: true,
            sfx_enabled: true,
            master_volume: 0.5,

            quality: QualityPreset::Medium,
            particles: true,

            reduced_motion: false,

            frames: 3600,
            autopilot: true,
        }
    }
}

impl Settings {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Read and parse a settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(std::io::Error::from)
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings.seed, None);
        assert!(settings.music_enabled);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.max_particles(), 256);
    }

    #[test]
    fn test_partial_json() {
        let settings =
            Settings::from_json(r#"{"seed": 42, "quality": "High", "master_volume": 3.0}"#)
                .unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.max_particles(), 1024);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.sfx_enabled);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{\"frames\": -1}").is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_particles_toggle() {
        let mut settings = Settings::from_json(r#"{"quality": "Low"}"#).unwrap();
        assert_eq!(settings.max_particles(), 64);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_unknown_quality_is_an_error() {
        assert!(Settings::from_json(r#"{"quality": "Ultra"}"#).is_err());
    }
}
