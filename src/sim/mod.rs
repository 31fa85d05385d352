//! Entity simulation module
//!
//! All gameplay logic lives here:
//! - One tick per animation frame, velocities in pixels per tick
//! - Caller-supplied clock, so ticks are testable without waiting
//! - Seeded RNG per simulator
//! - No rendering or platform dependencies

pub mod behavior;
pub mod entity;
pub mod mode;
pub mod simulator;

pub use entity::{Entity, EntityState, PARTICLE_PALETTE, Particle, Viewport};
pub use mode::EntityKind;
pub use simulator::{CatchEvent, Simulator};
