//! Pounce - a full-screen prey-catching game for cats
//!
//! Core modules:
//! - `sim`: Entity simulation (motion models, catches, particles)
//! - `renderer`: Scene tessellation and the WebGPU pipeline
//! - `session`: Score, audio routing and ambient cue pacing
//! - `audio`: Sound effect seam (Web Audio on wasm32)
//! - `tuning`: Data-driven motion constants
//! - `settings`: Audio levels and ambient pacing

pub mod audio;
pub mod error;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Host loop constants
pub mod consts {
    /// Nominal frame interval of the display the tuning was done on (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Simulated length of the native headless demo (frames)
    pub const DEMO_FRAMES: u32 = 60 * 20;
}

/// Opaque RGBA from a `0xRRGGBB` literal
#[inline]
pub const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb() {
        assert_eq!(rgb(0xffffff), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0xff0000)[0], 1.0);
        assert_eq!(rgb(0x00ff00)[2], 0.0);
    }
}
