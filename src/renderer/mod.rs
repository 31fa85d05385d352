//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU by [`Painter`] and drawn as a single
//! triangle list.

pub mod painter;
pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use painter::Painter;
pub use pipeline::RenderState;
pub use scene::{Scene, draw};
pub use vertex::Vertex;
