//! Scene drawing
//!
//! [`draw`] is a pure function of the scene snapshot and elapsed time. It
//! reads the simulator's entities and particles for the duration of one call
//! and keeps nothing between frames; idle animation (pulses, flaps, wiggles)
//! is derived from `time_ms` alone.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use super::painter::Painter;
use super::vertex::colors;
use crate::sim::{Entity, EntityKind, EntityState, Particle, Simulator, Viewport};

/// Fraction of the gradient radius where the background reaches black
const BACKGROUND_FADE: f32 = 0.7;
/// Extra turn drawn on a falling entity (rad per ms)
const TUMBLE_RATE: f64 = 0.012;

/// Everything one frame needs
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub mode: EntityKind,
    pub viewport: Viewport,
    pub entities: &'a [Entity],
    pub particles: &'a [Particle],
    /// Elapsed session time (ms)
    pub time_ms: f64,
}

impl<'a> Scene<'a> {
    pub fn from_simulator(sim: &'a Simulator, time_ms: f64) -> Self {
        Self {
            mode: sim.mode(),
            viewport: sim.viewport(),
            entities: sim.entities(),
            particles: sim.particles(),
            time_ms,
        }
    }
}

/// `sin(time / divisor)`
#[inline]
fn wave(time_ms: f64, divisor: f64) -> f32 {
    (time_ms / divisor).sin() as f32
}

/// Paint a full frame into `painter`, replacing whatever it held
pub fn draw(painter: &mut Painter, scene: &Scene<'_>) {
    painter.clear();
    draw_background(painter, scene.mode, scene.viewport);

    for entity in scene.entities {
        painter.save();
        painter.translate(entity.pos);
        // The string hangs from the top edge, so it is never turned
        if entity.kind != EntityKind::String {
            painter.rotate(entity.rotation);
        }
        if entity.state == EntityState::Falling {
            painter.rotate((scene.time_ms * TUMBLE_RATE) as f32);
        }
        painter.set_alpha(entity.alpha());

        match entity.kind {
            EntityKind::Spark => draw_spark(painter, entity, scene.time_ms),
            EntityKind::String => draw_string(painter, entity, scene.time_ms),
            EntityKind::Rodent => draw_rodent(painter, entity, scene.time_ms),
            EntityKind::Bird => draw_bird(painter, entity, scene.time_ms),
            EntityKind::Fish => draw_fish(painter, entity, scene.time_ms),
        }

        painter.restore();
    }

    for particle in scene.particles {
        painter.set_alpha(particle.life);
        painter.fill_circle(particle.pos, particle.size, particle.color);
    }
    painter.set_alpha(1.0);
}

/// Black frame with a saturated mode-colored glow in the middle
fn draw_background(painter: &mut Painter, mode: EntityKind, viewport: Viewport) {
    painter.fill_rect(
        Vec2::ZERO,
        Vec2::new(viewport.width, viewport.height),
        colors::BLACK,
    );
    let radius = viewport.width.max(viewport.height);
    painter.fill_radial_gradient(
        viewport.center(),
        radius,
        &[(0.0, colors::background(mode)), (BACKGROUND_FADE, colors::BLACK)],
    );
}

fn draw_spark(painter: &mut Painter, entity: &Entity, time_ms: f64) {
    let pulse = 1.0 + wave(time_ms, 100.0) * 0.1;
    let radius = entity.size * pulse;

    // Glow
    painter.fill_radial_gradient(
        Vec2::ZERO,
        radius + 30.0 * pulse,
        &[
            (0.0, colors::with_alpha(entity.color, 0.35)),
            (1.0, colors::TRANSPARENT),
        ],
    );
    painter.fill_radial_gradient(
        Vec2::ZERO,
        radius,
        &[
            (0.0, colors::WHITE),
            (0.3, entity.color),
            (1.0, colors::with_alpha(entity.color, 0.0)),
        ],
    );

    let spoke = entity.size * 0.6 * pulse;
    let spin = (time_ms / 200.0) as f32;
    for i in 0..4 {
        let dir = Vec2::from_angle(i as f32 * FRAC_PI_2 + spin);
        painter.stroke_line(dir * spoke * 0.5, dir * spoke, 2.0, colors::SPARK_SPOKE);
    }
}

fn draw_string(painter: &mut Painter, entity: &Entity, time_ms: f64) {
    let size = entity.size;
    let anchor = Vec2::new(0.0, -entity.pos.y);
    painter.stroke_quadratic(
        anchor,
        Vec2::new(wave(time_ms, 500.0) * 20.0, -entity.pos.y / 2.0),
        Vec2::ZERO,
        4.0,
        colors::STRING_LINE,
    );

    painter.fill_circle(Vec2::ZERO, size, entity.color);

    // Fringe
    let flutter = wave(time_ms, 200.0) * 0.2;
    for i in 0..5 {
        painter.save();
        painter.rotate(i as f32 * TAU / 5.0 + flutter);
        painter.fill_ellipse(
            Vec2::new(size * 0.8, 0.0),
            Vec2::new(size * 0.7, size / 4.0),
            0.0,
            entity.color,
        );
        painter.restore();
    }
}

fn draw_rodent(painter: &mut Painter, entity: &Entity, time_ms: f64) {
    let size = entity.size;
    let wiggle = wave(time_ms, 50.0) * 0.05;
    painter.scale(Vec2::new(1.0 + wiggle, 1.0 - wiggle));

    // Body
    painter.fill_ellipse(Vec2::ZERO, Vec2::new(size, size / 2.0), 0.0, entity.color);
    // Ears
    let ear = Vec2::new(size / 4.0, size / 3.0);
    painter.fill_ellipse(Vec2::new(size / 2.0, -size / 3.0), ear, -0.5, entity.color);
    painter.fill_ellipse(Vec2::new(size / 2.0, size / 3.0), ear, 0.5, entity.color);
    // Tail
    painter.stroke_quadratic(
        Vec2::new(-size, 0.0),
        Vec2::new(-size * 1.5, wave(time_ms, 100.0) * 10.0),
        Vec2::new(-size * 2.0, 0.0),
        2.0,
        entity.color,
    );
}

fn draw_bird(painter: &mut Painter, entity: &Entity, time_ms: f64) {
    let size = entity.size;
    let flap = wave(time_ms, 50.0) * 0.2;
    painter.scale(Vec2::new(1.0, 1.0 + flap));

    // Body
    painter.fill_ellipse(Vec2::ZERO, Vec2::new(size, size / 2.5), 0.0, entity.color);
    // Beak
    painter.fill_triangle(
        Vec2::new(size, 0.0),
        Vec2::new(size + 10.0, -5.0),
        Vec2::new(size + 10.0, 5.0),
        colors::BEAK,
    );
    // Wing
    let spread = wave(time_ms, 100.0) * size;
    painter.fill_triangle(
        Vec2::ZERO,
        Vec2::new(-size / 2.0, -spread),
        Vec2::new(size / 2.0, 0.0),
        entity.color,
    );
}

fn draw_fish(painter: &mut Painter, entity: &Entity, time_ms: f64) {
    let size = entity.size;
    painter.rotate(wave(time_ms, 100.0) * 0.1);

    painter.fill_ellipse(Vec2::ZERO, Vec2::new(size, size / 2.0), 0.0, entity.color);
    // Tail
    let tail = wave(time_ms, 150.0) * 8.0;
    painter.fill_triangle(
        Vec2::new(-size, 0.0),
        Vec2::new(-size - 15.0, -10.0 + tail),
        Vec2::new(-size - 15.0, 10.0 + tail),
        entity.color,
    );
}
