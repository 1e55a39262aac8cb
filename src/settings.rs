//! Game settings and preferences
//!
//! Persisted separately from the top score in LocalStorage. Only ambient
//! effects read these; gameplay never does.

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use crate::error::StoreError;

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

    /// Next preset, wrapping from High back to Low
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum live particles (speed lines + rain) for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 500,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Master switch for all particles
    pub particles: bool,
    /// Speed line bursts on lane change and at high speed
    pub speed_lines: bool,
    /// Background rain streaks
    pub rain: bool,
    /// Flash on obstacle landing
    pub impact_flash: bool,

    // === Accessibility ===
    /// Reduced motion (no speed lines, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            particles: true,
            speed_lines: true,
            rain: true,
            impact_flash: true,

            reduced_motion: false,
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

        // Low preset drops the background rain
        self.rain = preset != QualityPreset::Low;
    }

    /// Effective speed lines (respects reduced_motion)
    pub fn effective_speed_lines(&self) -> bool {
        self.particles && self.speed_lines && !self.reduced_motion
    }

    pub fn effective_rain(&self) -> bool {
        self.particles && self.rain
    }

    /// Effective impact flash (respects reduced_motion)
    pub fn effective_impact_flash(&self) -> bool {
        self.impact_flash && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_dash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = crate::topscore::local_storage()
            .ok()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        if let Some(json) = stored {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Stored settings unreadable ({}), using defaults", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(self).map_err(|e| StoreError::Encode(e.to_string()))?;
        let storage = crate::topscore::local_storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::write(Self::STORAGE_KEY, e))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_suppresses_lines_and_flash() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_speed_lines());
        assert!(!settings.effective_impact_flash());
        assert!(settings.effective_rain());
    }

    #[test]
    fn test_particles_off_caps_at_zero() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert!(!settings.effective_rain());
    }

    #[test]
    fn test_low_preset_drops_rain() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(!settings.rain);
        assert_eq!(settings.max_particles(), 60);

        let mut settings = settings;
        settings.apply_preset(settings.quality.next());
        assert!(settings.rain);
    }

    #[test]
    fn test_preset_cycle() {
        assert_eq!(QualityPreset::Low.next(), QualityPreset::Medium);
        assert_eq!(QualityPreset::High.as_str(), "High");
        assert_eq!(QualityPreset::High.next(), QualityPreset::Low);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "rain": false }"#).unwrap();
        assert!(!settings.rain);
        assert!(settings.speed_lines);
        assert_eq!(settings.quality, QualityPreset::Medium);
    }
}
