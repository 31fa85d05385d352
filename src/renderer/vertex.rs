//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    use crate::rgb;
    use crate::sim::EntityKind;

    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const TRANSPARENT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
    pub const BEAK: [f32; 4] = rgb(0xffb703);
    pub const SPARK_SPOKE: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const STRING_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

    /// Background gradient center per mode (Tailwind 700 shades)
    pub fn background(mode: EntityKind) -> [f32; 4] {
        match mode {
            EntityKind::Spark => rgb(0x0e7490),  // Cyan
            EntityKind::String => rgb(0xbe123c), // Rose
            EntityKind::Rodent => rgb(0xb45309), // Amber
            EntityKind::Bird => rgb(0x047857),   // Emerald
            EntityKind::Fish => rgb(0x1d4ed8),   // Blue
        }
    }

    /// Same color at a different opacity
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha]
    }
}
