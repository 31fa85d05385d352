//! Audio collaborator
//!
//! The session only ever says "play this"; it never waits on or inspects the
//! result. Sounds are procedurally generated, so there are no asset files.
//! The Web Audio sink is wasm32-only; native builds log instead.

use crate::sim::EntityKind;

/// Mixer channel a sound belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Catch feedback
    Sfx,
    /// Background cues that make the prey "audible"
    Ambient,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Something was caught in the given mode
    Catch(EntityKind),
    /// Short two- or three-note bird chirp
    BirdChirp,
    /// Rapid sawtooth squeaks
    SquirrelChirp,
    /// High square-wave tick
    LaserSpark,
    /// Rising sine blip
    Bubble,
    /// Low triangle wobble
    StringWobble,
}

impl SoundEffect {
    /// Ambient cue that fits a play mode
    pub fn ambient_for(mode: EntityKind) -> Self {
        match mode {
            EntityKind::Spark => SoundEffect::LaserSpark,
            EntityKind::String => SoundEffect::StringWobble,
            EntityKind::Rodent => SoundEffect::SquirrelChirp,
            EntityKind::Bird => SoundEffect::BirdChirp,
            EntityKind::Fish => SoundEffect::Bubble,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            SoundEffect::Catch(_) => Category::Sfx,
            _ => Category::Ambient,
        }
    }
}

/// Volume state handed to a sink with every effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioLevels {
    pub sfx: f32,
    pub ambient: f32,
    pub muted: bool,
}

impl AudioLevels {
    pub fn category_volume(&self, category: Category) -> f32 {
        match category {
            Category::Sfx => self.sfx,
            Category::Ambient => self.ambient,
        }
    }

    /// Final gain for a sound authored at `base`
    pub fn effective(&self, base: f32, category: Category) -> f32 {
        if self.muted {
            0.0
        } else {
            base * self.category_volume(category)
        }
    }

    /// Whether an effect in this category would be heard at all
    pub fn audible(&self, category: Category) -> bool {
        !self.muted && self.category_volume(category) > 0.0
    }
}

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, levels: &AudioLevels);
}

/// Native stand-in that just logs what would have played
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, levels: &AudioLevels) {
        if levels.audible(effect.category()) {
            log::debug!("play {:?} at {:.2}", effect, levels.category_volume(effect.category()));
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioLevels, AudioSink, Category, SoundEffect};
    use crate::sim::EntityKind;

    /// Exponential ramps cannot reach zero
    const SILENT: f32 = 0.001;

    fn random() -> f32 {
        js_sys::Math::random() as f32
    }

    /// Web Audio API output
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Create an oscillator routed through its own gain node
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Attack to `peak` then decay to silence
        fn envelope(gain: &GainNode, t: f64, peak: f32, attack: f64, end: f64) {
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(peak, t + attack).ok();
            gain.gain().exponential_ramp_to_value_at_time(SILENT, t + end).ok();
        }

        /// One oscillator sweeping `from` → `to` under a simple envelope
        #[allow(clippy::too_many_arguments)]
        fn sweep(
            ctx: &AudioContext,
            t: f64,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            peak: f32,
            attack: f64,
            end: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, t + end).ok();
            Self::envelope(&gain, t, peak, attack, end);
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + end).ok();
        }

        fn play_catch(ctx: &AudioContext, mode: EntityKind, levels: &AudioLevels) {
            let Some((osc, gain)) = Self::create_osc(ctx, 440.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            let (osc_type, from, to, sweep) = match mode {
                EntityKind::Bird => (OscillatorType::Sine, 800.0, 1200.0, 0.1),
                EntityKind::Rodent => (OscillatorType::Square, 150.0, 40.0, 0.1),
                EntityKind::Spark => (OscillatorType::Triangle, 1000.0, 2000.0, 0.05),
                EntityKind::Fish => (OscillatorType::Sine, 200.0, 600.0, 0.1),
                EntityKind::String => (OscillatorType::Sawtooth, 400.0, 100.0, 0.1),
            };
            osc.set_type(osc_type);
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, t + sweep).ok();

            let peak = levels.effective(0.1, Category::Sfx);
            let tail = (0.01 * levels.effective(1.0, Category::Sfx)).max(SILENT);
            gain.gain().set_value_at_time(peak, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(tail, t + 0.1).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Rising then falling chirp with a fast vibrato
        fn play_chirp(ctx: &AudioContext, t: f64, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 2000.0, OscillatorType::Sine) else {
                return;
            };
            osc.frequency().set_value_at_time(2000.0 + random() * 1000.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(4000.0 + random() * 1000.0, t + 0.08)
                .ok();
            osc.frequency().exponential_ramp_to_value_at_time(1500.0, t + 0.2).ok();

            if let (Ok(vibrato), Ok(depth)) = (ctx.create_oscillator(), ctx.create_gain()) {
                vibrato.set_type(OscillatorType::Sine);
                vibrato.frequency().set_value_at_time(30.0, t).ok();
                depth.gain().set_value_at_time(100.0, t).ok();
                if vibrato.connect_with_audio_node(&depth).is_ok()
                    && depth.connect_with_audio_param(&osc.frequency()).is_ok()
                {
                    vibrato.start_with_when(t).ok();
                    vibrato.stop_with_when(t + 0.2).ok();
                }
            }

            Self::envelope(&gain, t, vol, 0.05, 0.2);
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        fn play_bird_chirp(ctx: &AudioContext, levels: &AudioLevels) {
            let vol = levels.effective(0.03, Category::Ambient);
            let t = ctx.current_time();
            Self::play_chirp(ctx, t, vol);
            if random() > 0.3 {
                Self::play_chirp(ctx, t + 0.25, vol);
            }
            if random() > 0.6 {
                Self::play_chirp(ctx, t + 0.5, vol);
            }
        }

        fn play_squirrel_chirp(ctx: &AudioContext, levels: &AudioLevels) {
            let vol = levels.effective(0.015, Category::Ambient);
            let t = ctx.current_time();
            let pulses = if random() > 0.5 { 3 } else { 2 };
            for i in 0..pulses {
                let start = t + i as f64 * 0.08;
                let from = 3000.0 + random() * 1000.0;
                Self::sweep(ctx, start, OscillatorType::Sawtooth, from, 200.0, vol, 0.01, 0.04);
            }
        }

        fn play_laser_spark(ctx: &AudioContext, levels: &AudioLevels) {
            let vol = levels.effective(0.01, Category::Ambient);
            let from = 6000.0 + random() * 2000.0;
            Self::sweep(ctx, ctx.current_time(), OscillatorType::Square, from, 2000.0, vol, 0.01, 0.03);
        }

        fn play_bubble(ctx: &AudioContext, levels: &AudioLevels) {
            let vol = levels.effective(0.04, Category::Ambient);
            let from = 400.0 + random() * 200.0;
            let to = 800.0 + random() * 400.0;
            Self::sweep(ctx, ctx.current_time(), OscillatorType::Sine, from, to, vol, 0.02, 0.1);
        }

        fn play_string_wobble(ctx: &AudioContext, levels: &AudioLevels) {
            let vol = levels.effective(0.02, Category::Ambient);
            let from = 100.0 + random() * 50.0;
            Self::sweep(ctx, ctx.current_time(), OscillatorType::Triangle, from, 300.0, vol, 0.05, 0.2);
        }
    }

    impl AudioSink for WebAudioSink {
        fn play(&mut self, effect: SoundEffect, levels: &AudioLevels) {
            if !levels.audible(effect.category()) {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Catch(mode) => Self::play_catch(ctx, mode, levels),
                SoundEffect::BirdChirp => Self::play_bird_chirp(ctx, levels),
                SoundEffect::SquirrelChirp => Self::play_squirrel_chirp(ctx, levels),
                SoundEffect::LaserSpark => Self::play_laser_spark(ctx, levels),
                SoundEffect::Bubble => Self::play_bubble(ctx, levels),
                SoundEffect::StringWobble => Self::play_string_wobble(ctx, levels),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume_scales_by_category() {
        let levels = AudioLevels {
            sfx: 0.5,
            ambient: 0.3,
            muted: false,
        };
        assert!((levels.effective(0.1, Category::Sfx) - 0.05).abs() < 1e-6);
        assert!((levels.effective(0.1, Category::Ambient) - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_mute_silences_everything() {
        let levels = AudioLevels {
            sfx: 1.0,
            ambient: 1.0,
            muted: true,
        };
        assert_eq!(levels.effective(0.1, Category::Sfx), 0.0);
        assert!(!levels.audible(Category::Ambient));
    }

    #[test]
    fn test_zero_category_volume_is_inaudible() {
        let levels = AudioLevels {
            sfx: 0.0,
            ambient: 0.3,
            muted: false,
        };
        assert!(!levels.audible(SoundEffect::Catch(EntityKind::Bird).category()));
        assert!(levels.audible(SoundEffect::BirdChirp.category()));
    }

    #[test]
    fn test_every_mode_has_an_ambient_cue() {
        for mode in EntityKind::ALL {
            assert_eq!(SoundEffect::ambient_for(mode).category(), Category::Ambient);
        }
    }
}
