//! Play session
//!
//! Host-agnostic glue between the simulator and its collaborators: keeps the
//! score, routes catches to the audio sink and paces ambient cues. The
//! browser and native hosts both drive a [`Session`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, SoundEffect};
use crate::settings::Settings;
use crate::sim::{CatchEvent, EntityKind, Simulator, Viewport};
use crate::tuning::Tuning;

pub struct Session {
    sim: Simulator,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    score: u64,
    /// Last time (ms) an ambient cue was considered
    last_ambient: Option<f64>,
    rng: Pcg32,
}

impl Session {
    /// Start a session. Entities spawn once the host reports a nonzero size.
    pub fn new(
        mode: EntityKind,
        tuning: Tuning,
        settings: Settings,
        audio: Box<dyn AudioSink>,
        seed: u64,
    ) -> Self {
        log::info!("Session starting in {} mode (seed {})", mode, seed);
        Self {
            sim: Simulator::new(mode, tuning, seed),
            settings,
            audio,
            score: 0,
            last_ambient: None,
            // Separate stream so sound pacing never perturbs motion
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
        }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    pub fn mode(&self) -> EntityKind {
        self.sim.mode()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Respawn for a new viewport size (no-op when the size is unchanged)
    pub fn resize(&mut self, width: f32, height: f32, now: f64) {
        let viewport = Viewport::new(width, height);
        if viewport == self.sim.viewport() && self.sim.is_ready() {
            return;
        }
        self.sim.initialize(self.sim.mode(), width, height, now);
    }

    /// Switch prey kind, discarding the current entities
    pub fn set_mode(&mut self, mode: EntityKind, now: f64) {
        log::info!("Mode changed: {} -> {}", self.sim.mode(), mode);
        let viewport = self.sim.viewport();
        self.sim.initialize(mode, viewport.width, viewport.height, now);
    }

    /// One animation frame: simulate, then maybe play an ambient cue
    pub fn frame(&mut self, now: f64) {
        self.sim.tick(now);
        self.schedule_ambient(now);
    }

    fn schedule_ambient(&mut self, now: f64) {
        let Some(last) = self.last_ambient else {
            self.last_ambient = Some(now);
            return;
        };
        if now - last < self.settings.ambient_interval_ms {
            return;
        }
        self.last_ambient = Some(now);

        if self.rng.random::<f32>() < self.settings.ambient_chance {
            let cue = SoundEffect::ambient_for(self.sim.mode());
            log::debug!("Ambient cue {:?}", cue);
            self.audio.play(cue, &self.settings.audio_levels());
        }
    }

    /// A pointer or touch contact at viewport coordinates
    pub fn pointer(&mut self, x: f32, y: f32) -> Vec<CatchEvent> {
        let catches = self.sim.hit_test(x, y);
        if !catches.is_empty() {
            let levels = self.settings.audio_levels();
            for catch in &catches {
                self.score += 1;
                self.audio.play(SoundEffect::Catch(catch.kind), &levels);
            }
            log::debug!("Score: {}", self.score);
        }
        catches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioLevels;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sink that records what it was asked to play
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<SoundEffect>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, _levels: &AudioLevels) {
            self.0.borrow_mut().push(effect);
        }
    }

    fn session(mode: EntityKind) -> (Session, Recorder) {
        let recorder = Recorder::default();
        let mut session = Session::new(
            mode,
            Tuning::default(),
            Settings::default(),
            Box::new(recorder.clone()),
            1234,
        );
        session.resize(800.0, 600.0, 0.0);
        (session, recorder)
    }

    #[test]
    fn test_catch_scores_and_plays_effect() {
        let (mut session, recorder) = session(EntityKind::Spark);
        let pos = session.simulator().entities()[0].pos;

        let catches = session.pointer(pos.x, pos.y);
        assert_eq!(catches.len(), 1);
        assert_eq!(session.score(), 1);
        assert_eq!(
            recorder.0.borrow().as_slice(),
            &[SoundEffect::Catch(EntityKind::Spark)]
        );
    }

    #[test]
    fn test_miss_is_silent() {
        let (mut session, recorder) = session(EntityKind::Rodent);
        assert!(session.pointer(-5000.0, -5000.0).is_empty());
        assert_eq!(session.score(), 0);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_resize_same_size_keeps_entities() {
        let (mut session, _) = session(EntityKind::Fish);
        let ids: Vec<u32> = session.simulator().entities().iter().map(|e| e.id).collect();
        session.resize(800.0, 600.0, 10.0);
        let same: Vec<u32> = session.simulator().entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, same);

        session.resize(1024.0, 768.0, 20.0);
        let fresh: Vec<u32> = session.simulator().entities().iter().map(|e| e.id).collect();
        assert!(fresh.iter().all(|id| !ids.contains(id)));
    }

    #[test]
    fn test_spawn_on_late_clock_waits_for_first_decision() {
        let mut session = Session::new(
            EntityKind::Spark,
            Tuning::default(),
            Settings::default(),
            Box::new(Recorder::default()),
            99,
        );
        // Page has been open for two minutes before the first resize
        session.resize(800.0, 600.0, 120_000.0);
        session.frame(120_016.0);

        // Spawn speed is at most 5 per axis; any dart is at least 10
        let spark = &session.simulator().entities()[0];
        assert!(spark.vel.length() < 10.0, "spark darted on its first frame");
    }

    #[test]
    fn test_set_mode_respawns_population() {
        let (mut session, _) = session(EntityKind::Spark);
        session.set_mode(EntityKind::Bird, 5.0);
        assert_eq!(session.mode(), EntityKind::Bird);
        assert_eq!(session.simulator().entities().len(), 3);
    }

    #[test]
    fn test_ambient_cues_are_paced_and_probabilistic() {
        let (mut session, recorder) = session(EntityKind::Bird);
        // 1000 intervals of 1.5 s, sampled at ~60 fps
        let mut now = 0.0;
        while now <= 1500.0 * 1000.0 {
            session.frame(now);
            now += 16.0;
        }

        let cues = recorder.0.borrow();
        assert!(cues.iter().all(|c| *c == SoundEffect::BirdChirp));
        let ratio = cues.len() as f32 / 1000.0;
        assert!((0.24..0.36).contains(&ratio), "ambient ratio {ratio}");
    }
}
