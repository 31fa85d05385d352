//! Player settings
//!
//! Audio levels and ambient cue pacing. Kept apart from [`crate::tuning`],
//! which covers how the prey move rather than how the session sounds.

use serde::{Deserialize, Serialize};

use crate::audio::AudioLevels;
use crate::error::{Error, Result};

/// Session settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Catch effect volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Ambient cue volume (0.0 - 1.0)
    pub ambient_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Ambient cues ===
    /// How often an ambient cue is considered (ms)
    pub ambient_interval_ms: f64,
    /// Chance a considered cue actually plays
    pub ambient_chance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 0.5,
            ambient_volume: 0.3,
            muted: false,

            ambient_interval_ms: 1500.0,
            ambient_chance: 0.3,
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if !(0.0..=1.0).contains(&settings.ambient_chance) {
            return Err(Error::InvalidSettings(
                "ambient_chance must be within [0, 1]".into(),
            ));
        }
        if !(settings.ambient_interval_ms > 0.0) {
            return Err(Error::InvalidSettings(
                "ambient_interval_ms must be positive".into(),
            ));
        }
        settings.set_sfx_volume(settings.sfx_volume);
        settings.set_ambient_volume(settings.ambient_volume);
        Ok(settings)
    }

    /// Set catch effect volume (clamped to 0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set ambient volume (clamped to 0.0 - 1.0)
    pub fn set_ambient_volume(&mut self, vol: f32) {
        self.ambient_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Levels handed to the audio sink with every effect
    pub fn audio_levels(&self) -> AudioLevels {
        AudioLevels {
            sfx: self.sfx_volume,
            ambient: self.ambient_volume,
            muted: self.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_setters_clamp() {
        let mut settings = Settings::default();
        settings.set_sfx_volume(1.7);
        settings.set_ambient_volume(-0.2);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.ambient_volume, 0.0);
    }

    #[test]
    fn test_from_json_clamps_and_validates() {
        let settings = Settings::from_json(r#"{ "sfx_volume": 3.0, "muted": true }"#).unwrap();
        assert_eq!(settings.sfx_volume, 1.0);
        assert!(settings.muted);
        assert_eq!(settings.ambient_interval_ms, 1500.0);

        assert!(Settings::from_json(r#"{ "ambient_chance": 2.0 }"#).is_err());
    }
}
