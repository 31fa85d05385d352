//! Entity and particle types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mode::EntityKind;

/// Viewport extent in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when there is no area to spawn into yet
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Interaction state of a single entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityState {
    /// Moving under its behavior model, can be caught
    #[default]
    Active,
    /// Hit this tick; respawns on the next tick
    Caught,
    /// Spinning and shrinking away (birds only)
    Falling,
    /// Reserved. Nothing transitions into it; behavior is skipped while in it.
    Hiding,
}

/// A huntable target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Visual and collision radius
    pub size: f32,
    /// Facing angle (radians)
    pub rotation: f32,
    pub color: [f32; 4],
    pub state: EntityState,
    /// Timestamp (ms) of the last behavior decision
    pub last_change: f64,
    /// Wait (ms) after `last_change` before the next decision
    pub dwell_ms: f64,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2, now: f64) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            size: kind.base_size(),
            rotation: vel.y.atan2(vel.x),
            color: kind.color(),
            state: EntityState::Active,
            last_change: now,
            dwell_ms: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == EntityState::Active
    }

    /// Opacity while rendering (fades with size during the falling transition)
    pub fn alpha(&self) -> f32 {
        match self.state {
            EntityState::Falling => (self.size / 10.0).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }
}

/// Extra burst colors; the caught entity's own color is the fourth choice
pub const PARTICLE_PALETTE: [[f32; 4]; 3] = [
    crate::rgb(0xffffff),
    crate::rgb(0xff9f1c),
    crate::rgb(0xffbf69),
];

/// A burst fragment spawned on a catch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed once it reaches zero
    pub life: f32,
    pub color: [f32; 4],
    pub size: f32,
}
