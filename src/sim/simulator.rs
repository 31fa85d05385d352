//! Entity simulator
//!
//! Owns the entity and particle sets. The host drives it with
//! [`Simulator::initialize`] on mode or viewport changes, [`Simulator::tick`]
//! once per animation frame and [`Simulator::hit_test`] for every pointer or
//! touch contact. Nothing else mutates simulation state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::behavior::{self, symmetric};
use super::entity::{Entity, EntityState, PARTICLE_PALETTE, Particle, Viewport};
use super::mode::EntityKind;
use crate::tuning::Tuning;

/// Particle life below this counts as spent (absorbs float drift from repeated decay)
const LIFE_EPSILON: f32 = 1e-4;

/// Emitted once per entity hit by a pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchEvent {
    pub entity_id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
}

pub struct Simulator {
    mode: EntityKind,
    viewport: Viewport,
    tuning: Tuning,
    entities: Vec<Entity>,
    particles: Vec<Particle>,
    rng: Pcg32,
    next_id: u32,
}

impl Simulator {
    /// Create an empty simulator; entities appear on the first
    /// [`initialize`](Self::initialize) with a nonzero viewport.
    pub fn new(mode: EntityKind, tuning: Tuning, seed: u64) -> Self {
        Self {
            mode,
            viewport: Viewport::default(),
            tuning,
            entities: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn mode(&self) -> EntityKind {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether entities have been spawned for the current viewport
    pub fn is_ready(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the entity set with a fresh population for `mode`.
    ///
    /// A zero-sized viewport records the mode and defers spawning until a
    /// call with real dimensions arrives.
    pub fn initialize(&mut self, mode: EntityKind, width: f32, height: f32, now: f64) {
        self.mode = mode;
        self.viewport = Viewport::new(width, height);
        self.entities.clear();

        if self.viewport.is_empty() {
            log::warn!("Viewport is {width}x{height}, deferring {mode} spawn");
            return;
        }

        for _ in 0..mode.population() {
            let id = self.next_entity_id();
            let pos = self.random_position();
            let vel = self.random_velocity();
            let mut entity = Entity::new(id, mode, pos, vel, now);
            entity.rotation = self.rng.random::<f32>() * std::f32::consts::TAU;
            entity.dwell_ms = behavior::draw_dwell(mode, &self.tuning, &mut self.rng);
            self.entities.push(entity);
        }

        log::info!(
            "Spawned {} {} entities in {}x{}",
            self.entities.len(),
            mode,
            width,
            height
        );
    }

    /// Uniform position within `[0, width) × [0, height)`
    fn random_position(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.random::<f32>() * self.viewport.width,
            self.rng.random::<f32>() * self.viewport.height,
        )
    }

    fn random_velocity(&mut self) -> Vec2 {
        let speed = self.tuning.spawn_speed;
        Vec2::new(symmetric(&mut self.rng, speed), symmetric(&mut self.rng, speed))
    }

    /// Return an entity to play at a fresh spot, keeping its id
    fn respawn(&mut self, index: usize, new_velocity: bool) {
        let pos = self.random_position();
        let vel = new_velocity.then(|| self.random_velocity());
        let entity = &mut self.entities[index];
        entity.state = EntityState::Active;
        entity.pos = pos;
        entity.size = entity.kind.base_size();
        if let Some(vel) = vel {
            entity.vel = vel;
        }
    }

    /// Advance entities and particles by one frame
    pub fn tick(&mut self, now: f64) {
        for i in 0..self.entities.len() {
            match self.entities[i].state {
                EntityState::Caught => self.respawn(i, false),
                EntityState::Falling => {
                    let falling = &self.tuning.falling;
                    let entity = &mut self.entities[i];
                    entity.size *= falling.shrink;
                    if entity.size < falling.vanish_size {
                        self.respawn(i, true);
                    }
                }
                EntityState::Active | EntityState::Hiding => {}
            }

            let viewport = self.viewport;
            let entity = &mut self.entities[i];
            if entity.is_active() {
                behavior::steer(entity, now, &self.tuning, &mut self.rng);
                // Steering may overwrite a reflection from the last tick
                reflect(entity, viewport);
            }

            entity.pos += entity.vel;
            reflect(entity, viewport);

            entity.rotation = entity.vel.y.atan2(entity.vel.x);
        }

        self.tick_particles();
    }

    /// Move particles and drop the spent ones
    pub fn tick_particles(&mut self) {
        let decay = self.tuning.particles.decay;
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life -= decay;
        }
        self.particles.retain(|p| p.life > LIFE_EPSILON);
    }

    /// Catch every active entity within reach of `(x, y)`.
    ///
    /// Each hit entity leaves play (birds start falling, everything else is
    /// caught), spawns a particle burst and yields one [`CatchEvent`].
    pub fn hit_test(&mut self, x: f32, y: f32) -> Vec<CatchEvent> {
        let point = Vec2::new(x, y);
        let reach = self.tuning.hit_radius_factor;
        let mut catches = Vec::new();
        let mut bursts = Vec::new();

        for entity in &mut self.entities {
            if !entity.is_active() {
                continue;
            }
            // Written so a NaN coordinate is never within reach
            if !(entity.pos.distance(point) < entity.size * reach) {
                continue;
            }

            entity.state = match entity.kind {
                EntityKind::Bird => EntityState::Falling,
                _ => EntityState::Caught,
            };
            log::debug!("Caught {} #{} at {:?}", entity.kind, entity.id, entity.pos);
            catches.push(CatchEvent {
                entity_id: entity.id,
                kind: entity.kind,
                pos: entity.pos,
            });
            bursts.push((entity.pos, entity.color));
        }

        for (pos, color) in bursts {
            self.spawn_burst(pos, color);
        }

        catches
    }

    fn spawn_burst(&mut self, pos: Vec2, color: [f32; 4]) {
        let t = &self.tuning.particles;
        for _ in 0..t.burst {
            let vel = Vec2::new(symmetric(&mut self.rng, t.speed), symmetric(&mut self.rng, t.speed));
            let pick = self.rng.random_range(0..=PARTICLE_PALETTE.len());
            let size = t.size.lerp(self.rng.random::<f32>());
            self.particles.push(Particle {
                pos,
                vel,
                life: 1.0,
                color: PARTICLE_PALETTE.get(pick).copied().unwrap_or(color),
                size,
            });
        }
    }
}

/// Point velocity back inside on any axis where the entity is outside the viewport
fn reflect(entity: &mut Entity, viewport: Viewport) {
    if entity.pos.x < 0.0 {
        entity.vel.x = entity.vel.x.abs();
    } else if entity.pos.x > viewport.width {
        entity.vel.x = -entity.vel.x.abs();
    }
    if entity.pos.y < 0.0 {
        entity.vel.y = entity.vel.y.abs();
    } else if entity.pos.y > viewport.height {
        entity.vel.y = -entity.vel.y.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn sim(mode: EntityKind) -> Simulator {
        let mut sim = Simulator::new(mode, Tuning::default(), 42);
        sim.initialize(mode, W, H, 0.0);
        sim
    }

    #[test]
    fn test_spark_catch_scenario() {
        let mut sim = sim(EntityKind::Spark);
        assert_eq!(sim.entities().len(), 1);
        assert_eq!(sim.entities()[0].kind, EntityKind::Spark);

        let pos = sim.entities()[0].pos;
        let catches = sim.hit_test(pos.x, pos.y);
        assert_eq!(catches.len(), 1);
        assert_ne!(sim.entities()[0].state, EntityState::Active);
        assert_eq!(sim.particles().len(), 20);
    }

    #[test]
    fn test_caught_entity_respawns_next_tick() {
        let mut sim = sim(EntityKind::Rodent);
        let target = sim.entities()[1].clone();
        let catches = sim.hit_test(target.pos.x, target.pos.y);
        assert!(!catches.is_empty());
        assert_eq!(sim.entities()[1].state, EntityState::Caught);

        sim.tick(16.0);
        let respawned = &sim.entities()[1];
        assert_eq!(respawned.state, EntityState::Active);
        assert_eq!(respawned.id, target.id);
        assert_eq!(respawned.size, EntityKind::Rodent.base_size());
    }

    #[test]
    fn test_bird_falls_shrinks_and_returns() {
        let mut sim = sim(EntityKind::Bird);
        assert_eq!(sim.entities().len(), 3);
        let target = sim.entities()[0].clone();
        sim.hit_test(target.pos.x, target.pos.y);
        assert_eq!(sim.entities()[0].state, EntityState::Falling);

        let mut now = 0.0;
        let mut last_size = sim.entities()[0].size;
        let mut last_fall = target.clone();
        let mut ticks = 0;
        while sim.entities()[0].state == EntityState::Falling {
            now += 16.0;
            sim.tick(now);
            ticks += 1;
            let e = &sim.entities()[0];
            if e.state == EntityState::Falling {
                assert!(e.size < last_size);
                last_size = e.size;
                last_fall = e.clone();
            }
            assert!(ticks < 100, "bird never finished falling");
        }

        let back = &sim.entities()[0];
        assert_eq!(back.state, EntityState::Active);
        assert_eq!(back.id, target.id);
        assert_eq!(back.size, EntityKind::Bird.base_size());
        assert_ne!(back.pos, last_fall.pos);
        assert_ne!(back.vel, last_fall.vel);
        assert_ne!(back.vel, target.vel);
        // 45 * 0.9^n < 1 first holds at n = 37
        assert_eq!(ticks, 37);
    }

    #[test]
    fn test_falling_entity_fades_with_size() {
        let mut sim = sim(EntityKind::Bird);
        let pos = sim.entities()[2].pos;
        sim.hit_test(pos.x, pos.y);
        for i in 0..30 {
            sim.tick(i as f64 * 16.0);
        }
        let e = &sim.entities()[2];
        assert_eq!(e.state, EntityState::Falling);
        assert!(e.alpha() < 1.0);
        assert!((e.alpha() - e.size / 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut sim = sim(EntityKind::Fish);
        let before: Vec<_> = sim.entities().iter().map(|e| e.state).collect();
        // Far outside every entity's reach
        let catches = sim.hit_test(-10_000.0, -10_000.0);
        assert!(catches.is_empty());
        assert!(sim.particles().is_empty());
        let after: Vec<_> = sim.entities().iter().map(|e| e.state).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_nan_pointer_catches_nothing() {
        let mut sim = sim(EntityKind::Fish);
        assert!(sim.hit_test(f32::NAN, f32::NAN).is_empty());
        assert!(sim.hit_test(f32::NAN, 300.0).is_empty());
        assert!(sim.particles().is_empty());
        assert!(sim.entities().iter().all(|e| e.is_active()));
    }

    #[test]
    fn test_reach_is_twice_the_size() {
        let mut sim = sim(EntityKind::Spark);
        sim.entities[0].pos = Vec2::new(400.0, 300.0);
        let reach = EntityKind::Spark.base_size() * 2.0;

        // Exactly at the edge is a miss
        assert!(sim.hit_test(400.0 + reach, 300.0).is_empty());
        assert!(sim.hit_test(400.0, 300.0 - reach).is_empty());
        assert!(sim.entities()[0].is_active());

        assert_eq!(sim.hit_test(400.0 + reach - 0.1, 300.0).len(), 1);
    }

    #[test]
    fn test_rotation_follows_velocity_while_falling() {
        let mut sim = sim(EntityKind::Bird);
        let pos = sim.entities()[0].pos;
        sim.hit_test(pos.x, pos.y);
        for i in 1..=5 {
            sim.tick(i as f64 * 16.0);
            let e = &sim.entities()[0];
            assert_eq!(e.state, EntityState::Falling);
            assert_eq!(e.rotation, e.vel.y.atan2(e.vel.x));
        }
    }

    #[test]
    fn test_only_active_entities_can_be_caught() {
        let mut sim = sim(EntityKind::Spark);
        let pos = sim.entities()[0].pos;
        assert_eq!(sim.hit_test(pos.x, pos.y).len(), 1);
        assert!(sim.hit_test(pos.x, pos.y).is_empty());
        assert_eq!(sim.particles().len(), 20);
    }

    #[test]
    fn test_one_tap_can_catch_several() {
        let mut sim = sim(EntityKind::Fish);
        let center = Vec2::new(400.0, 300.0);
        for (i, e) in sim.entities.iter_mut().enumerate() {
            e.pos = center + Vec2::new(i as f32 * 5.0, 0.0);
        }
        let catches = sim.hit_test(center.x, center.y);
        assert_eq!(catches.len(), 3);
        assert_eq!(sim.particles().len(), 60);
    }

    #[test]
    fn test_particles_burn_out_after_fifty_ticks() {
        let mut sim = sim(EntityKind::Spark);
        let pos = sim.entities()[0].pos;
        sim.hit_test(pos.x, pos.y);

        let mut last_life = 1.0;
        for i in 0..49 {
            sim.tick(i as f64 * 16.0);
            let life = sim.particles()[0].life;
            assert!(life < last_life);
            last_life = life;
        }
        assert_eq!(sim.particles().len(), 20);

        sim.tick(49.0 * 16.0);
        assert!(sim.particles().is_empty());
    }

    #[test]
    fn test_zero_viewport_defers_spawn() {
        let mut sim = Simulator::new(EntityKind::Rodent, Tuning::default(), 1);
        sim.initialize(EntityKind::Rodent, 0.0, 600.0, 0.0);
        assert!(!sim.is_ready());
        sim.tick(16.0);
        assert!(sim.hit_test(0.0, 0.0).is_empty());

        sim.initialize(EntityKind::Rodent, 800.0, 600.0, 32.0);
        assert_eq!(sim.entities().len(), 3);
    }

    #[test]
    fn test_reinitialize_replaces_set_with_new_ids() {
        let mut sim = sim(EntityKind::Rodent);
        let old: Vec<u32> = sim.entities().iter().map(|e| e.id).collect();
        sim.initialize(EntityKind::Spark, W, H, 100.0);
        assert_eq!(sim.entities().len(), 1);
        assert!(!old.contains(&sim.entities()[0].id));
        assert_eq!(sim.mode(), EntityKind::Spark);
    }

    #[test]
    fn test_rotation_follows_velocity() {
        let mut sim = sim(EntityKind::Rodent);
        sim.tick(16.0);
        for e in sim.entities() {
            assert!((e.rotation - e.vel.y.atan2(e.vel.x)).abs() < 1e-6);
        }
    }

    fn any_mode() -> impl Strategy<Value = EntityKind> {
        prop::sample::select(EntityKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_initialize_spawns_population_inside_viewport(
            mode in any_mode(),
            w in 1.0f32..4000.0,
            h in 1.0f32..4000.0,
            seed in any::<u64>(),
        ) {
            let mut sim = Simulator::new(mode, Tuning::default(), seed);
            sim.initialize(mode, w, h, 0.0);
            prop_assert_eq!(sim.entities().len(), mode.population());
            for e in sim.entities() {
                prop_assert!(e.pos.x >= 0.0 && e.pos.x < w);
                prop_assert!(e.pos.y >= 0.0 && e.pos.y < h);
                prop_assert_eq!(e.state, EntityState::Active);
            }
        }

        #[test]
        fn prop_entities_stay_within_one_tick_of_walls(
            mode in any_mode(),
            seed in any::<u64>(),
        ) {
            let mut sim = Simulator::new(mode, Tuning::default(), seed);
            sim.initialize(mode, 320.0, 240.0, 0.0);
            // Fastest possible spark dart plus the prey jitter allowance
            let slack = 30.0;
            for i in 1..=1500 {
                sim.tick(i as f64 * 16.0);
                for e in sim.entities() {
                    prop_assert!(e.pos.x >= -slack && e.pos.x <= 320.0 + slack, "x = {}", e.pos.x);
                    prop_assert!(e.pos.y >= -slack && e.pos.y <= 240.0 + slack, "y = {}", e.pos.y);
                }
            }
        }
    }
}
