//! Per-kind motion models
//!
//! Each kind has one steering function that only touches velocity and the
//! decision clock. Integration and wall reflection are shared and live in
//! the simulator.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::Entity;
use super::mode::EntityKind;
use crate::tuning::{PreyTuning, SparkTuning, StringTuning, Tuning};

/// Update an active entity's velocity for this tick
pub fn steer<R: Rng + ?Sized>(entity: &mut Entity, now: f64, tuning: &Tuning, rng: &mut R) {
    match entity.kind {
        EntityKind::Spark => steer_spark(entity, now, &tuning.spark, rng),
        EntityKind::String => steer_string(entity, now, &tuning.string),
        EntityKind::Rodent | EntityKind::Bird | EntityKind::Fish => {
            steer_prey(entity, now, &tuning.prey, rng)
        }
    }
}

/// Draw the wait before a kind's next decision (zero for kinds that never decide)
pub fn draw_dwell<R: Rng + ?Sized>(kind: EntityKind, tuning: &Tuning, rng: &mut R) -> f64 {
    let span = match kind {
        EntityKind::Spark => tuning.spark.dwell_ms,
        EntityKind::String => return 0.0,
        _ => tuning.prey.dwell_ms,
    };
    span.lerp(rng.random::<f32>()) as f64
}

/// Uniformly random heading at the given speed
fn random_heading<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> Vec2 {
    Vec2::from_angle(rng.random::<f32>() * TAU) * speed
}

/// Symmetric uniform sample in `[-amount, amount)`
#[inline]
pub(crate) fn symmetric<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * amount
}

fn decision_due(entity: &Entity, now: f64) -> bool {
    now - entity.last_change > entity.dwell_ms
}

/// Still until the dwell runs out, then a sudden dart
fn steer_spark<R: Rng + ?Sized>(entity: &mut Entity, now: f64, t: &SparkTuning, rng: &mut R) {
    if !decision_due(entity, now) {
        return;
    }
    let speed = t.dart_speed.lerp(rng.random::<f32>());
    entity.vel = random_heading(rng, speed);
    entity.last_change = now;
    entity.dwell_ms = t.dwell_ms.lerp(rng.random::<f32>()) as f64;
}

/// Smoothed pursuit of an oscillating target just beside the toy.
///
/// `last_change` is the sway's phase origin; it is set at spawn and never
/// advanced, so the swing is continuous across catches.
fn steer_string(entity: &mut Entity, now: f64, t: &StringTuning) {
    let elapsed = (now - entity.last_change) as f32;
    let target = entity.pos
        + Vec2::new(
            (elapsed * t.swing_rate).sin() * t.sway_x,
            (elapsed * t.swing_rate * 2.0).cos() * t.sway_y,
        );
    entity.vel = (target - entity.pos) * t.pursuit;
}

/// Dart or pause at each decision, with jitter every tick
fn steer_prey<R: Rng + ?Sized>(entity: &mut Entity, now: f64, t: &PreyTuning, rng: &mut R) {
    if decision_due(entity, now) {
        if rng.random_bool(t.pause_probability as f64) {
            entity.vel *= t.pause_damping;
        } else {
            let speed = t.dart_speed.lerp(rng.random::<f32>());
            entity.vel = random_heading(rng, speed);
        }
        entity.last_change = now;
        entity.dwell_ms = t.dwell_ms.lerp(rng.random::<f32>()) as f64;
    }

    entity.vel += Vec2::new(symmetric(rng, t.jitter), symmetric(rng, t.jitter));
}
