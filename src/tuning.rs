//! Data-driven behavior tuning
//!
//! The motion constants below were tuned by eye against real cats. None of
//! them are load-bearing invariants, so they live in a plain serde struct
//! that can be overridden from JSON. Any field left out of the document keeps
//! its default.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A half-open `[min, min + span)` range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub span: f32,
}

impl Span {
    pub const fn new(min: f32, span: f32) -> Self {
        Self { min, span }
    }

    /// Upper bound (exclusive)
    pub fn max(&self) -> f32 {
        self.min + self.span
    }

    /// Map a unit sample `t ∈ [0, 1)` into the range
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + self.span * t
    }

    fn check(&self, name: &str) -> Result<()> {
        if !(self.min >= 0.0 && self.span >= 0.0 && self.max().is_finite()) {
            return Err(Error::InvalidTuning(format!(
                "{name}: range [{}, {}) must be finite and non-negative",
                self.min,
                self.max()
            )));
        }
        Ok(())
    }
}

/// Laser spark: sits still, then darts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkTuning {
    /// Time between darts (ms)
    pub dwell_ms: Span,
    /// Dart speed (px/tick)
    pub dart_speed: Span,
}

impl Default for SparkTuning {
    fn default() -> Self {
        Self {
            dwell_ms: Span::new(500.0, 1000.0),
            dart_speed: Span::new(10.0, 15.0),
        }
    }
}

/// Dangling string toy: slow pendulum sway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StringTuning {
    /// Angular rate of the sway (rad/ms). The vertical bob runs at twice this.
    pub swing_rate: f32,
    /// Horizontal target offset amplitude (px)
    pub sway_x: f32,
    /// Vertical target offset amplitude (px)
    pub sway_y: f32,
    /// Fraction of the offset to the target applied as velocity each tick
    pub pursuit: f32,
}

impl Default for StringTuning {
    fn default() -> Self {
        Self {
            swing_rate: 0.0015,
            sway_x: 2.0,
            sway_y: 0.5,
            pursuit: 0.1,
        }
    }
}

/// Rodent, bird and fish: dart, pause, jitter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreyTuning {
    /// Time between decisions (ms)
    pub dwell_ms: Span,
    /// Chance that a decision is a pause rather than a dart
    pub pause_probability: f32,
    /// Velocity multiplier applied on a pause
    pub pause_damping: f32,
    /// Dart speed (px/tick)
    pub dart_speed: Span,
    /// Per-axis jitter added every tick (±px/tick)
    pub jitter: f32,
}

impl Default for PreyTuning {
    fn default() -> Self {
        Self {
            dwell_ms: Span::new(1000.0, 2000.0),
            pause_probability: 0.7,
            pause_damping: 0.1,
            dart_speed: Span::new(5.0, 10.0),
            jitter: 0.25,
        }
    }
}

/// Bird "sink and vanish" transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingTuning {
    /// Size multiplier per tick
    pub shrink: f32,
    /// Size below which the entity respawns
    pub vanish_size: f32,
}

impl Default for FallingTuning {
    fn default() -> Self {
        Self {
            shrink: 0.9,
            vanish_size: 1.0,
        }
    }
}

/// Catch burst
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Particles spawned per catch
    pub burst: usize,
    /// Per-axis launch speed (±px/tick)
    pub speed: f32,
    /// Life lost per tick
    pub decay: f32,
    /// Radius (px)
    pub size: Span,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            burst: 20,
            speed: 6.0,
            decay: 0.02,
            size: Span::new(1.0, 4.0),
        }
    }
}

/// All simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Per-axis spawn velocity (±px/tick)
    pub spawn_speed: f32,
    /// Hit radius as a multiple of entity size
    pub hit_radius_factor: f32,
    pub spark: SparkTuning,
    pub string: StringTuning,
    pub prey: PreyTuning,
    pub falling: FallingTuning,
    pub particles: ParticleTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_speed: 5.0,
            hit_radius_factor: 2.0,
            spark: SparkTuning::default(),
            string: StringTuning::default(),
            prey: PreyTuning::default(),
            falling: FallingTuning::default(),
            particles: ParticleTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<()> {
        self.spark.dwell_ms.check("spark.dwell_ms")?;
        self.spark.dart_speed.check("spark.dart_speed")?;
        self.prey.dwell_ms.check("prey.dwell_ms")?;
        self.prey.dart_speed.check("prey.dart_speed")?;
        self.particles.size.check("particles.size")?;

        if !(0.0..=1.0).contains(&self.prey.pause_probability) {
            return Err(Error::InvalidTuning(
                "prey.pause_probability must be within [0, 1]".into(),
            ));
        }
        // Shrink must converge or the falling state never ends
        if !(self.falling.shrink > 0.0 && self.falling.shrink < 1.0) {
            return Err(Error::InvalidTuning(
                "falling.shrink must be within (0, 1)".into(),
            ));
        }
        if !(self.falling.vanish_size > 0.0) {
            return Err(Error::InvalidTuning(
                "falling.vanish_size must be positive".into(),
            ));
        }
        if !(self.particles.decay > 0.0 && self.particles.decay <= 1.0) {
            return Err(Error::InvalidTuning(
                "particles.decay must be within (0, 1]".into(),
            ));
        }
        if !(self.hit_radius_factor > 0.0) {
            return Err(Error::InvalidTuning(
                "hit_radius_factor must be positive".into(),
            ));
        }
        for (name, v) in [
            ("spawn_speed", self.spawn_speed),
            ("prey.jitter", self.prey.jitter),
            ("prey.pause_damping", self.prey.pause_damping),
            ("particles.speed", self.particles.speed),
        ] {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(Error::InvalidTuning(format!(
                    "{name} must be finite and non-negative"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "prey": { "jitter": 0.5 } }"#).unwrap();
        assert_eq!(tuning.prey.jitter, 0.5);
        assert_eq!(tuning.prey.pause_probability, 0.7);
        assert_eq!(tuning.particles.burst, 20);
        assert_eq!(tuning.spark.dwell_ms, Span::new(500.0, 1000.0));
    }

    #[test]
    fn test_non_converging_shrink_is_rejected() {
        let err = Tuning::from_json(r#"{ "falling": { "shrink": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_negative_range_is_rejected() {
        let err =
            Tuning::from_json(r#"{ "spark": { "dart_speed": { "min": -1, "span": 2 } } }"#)
                .unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
