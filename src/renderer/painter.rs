//! Tessellating 2D painter
//!
//! A small canvas-style API (save/restore, translate/rotate/scale, global
//! alpha) that turns filled shapes and strokes into a triangle list in
//! viewport pixel space. The GPU side only ever sees the resulting vertices.

use std::f32::consts::TAU;

use glam::{Affine2, Vec2};

use super::vertex::Vertex;

/// Default circle/ellipse tessellation
pub const DEFAULT_SEGMENTS: u32 = 32;

pub struct Painter {
    vertices: Vec<Vertex>,
    transform: Affine2,
    alpha: f32,
    stack: Vec<(Affine2, f32)>,
    segments: u32,
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter {
    pub fn new() -> Self {
        Self::with_segments(DEFAULT_SEGMENTS)
    }

    pub fn with_segments(segments: u32) -> Self {
        Self {
            vertices: Vec::with_capacity(4096),
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
            segments: segments.max(3),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Drop all geometry and reset the drawing state
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.stack.clear();
        self.transform = Affine2::IDENTITY;
        self.alpha = 1.0;
    }

    // === State ===

    pub fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    pub fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.transform = self.transform * Affine2::from_angle(angle);
    }

    pub fn scale(&mut self, factor: Vec2) {
        self.transform = self.transform * Affine2::from_scale(factor);
    }

    /// Opacity multiplied into every subsequent vertex
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    fn emit(&mut self, p: Vec2, color: [f32; 4]) {
        let p = self.transform.transform_point2(p);
        let color = [color[0], color[1], color[2], color[3] * self.alpha];
        self.vertices.push(Vertex::new(p.x, p.y, color));
    }

    // === Fills ===

    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        self.emit(a, color);
        self.emit(b, color);
        self.emit(c, color);
    }

    /// Convex polygon, fanned from the first point
    pub fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]) {
        if points.len() < 3 {
            return;
        }
        for pair in points[1..].windows(2) {
            self.fill_triangle(points[0], pair[0], pair[1], color);
        }
    }

    pub fn fill_rect(&mut self, min: Vec2, max: Vec2, color: [f32; 4]) {
        let (a, b, c, d) = (min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y));
        self.fill_triangle(a, b, c, color);
        self.fill_triangle(a, c, d, color);
    }

    /// Ellipse with `radii` along its own axes, tilted by `tilt`
    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, tilt: f32, color: [f32; 4]) {
        let axis = Vec2::from_angle(tilt);
        let point = |theta: f32| center + axis.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()));

        for i in 0..self.segments {
            let theta1 = (i as f32 / self.segments as f32) * TAU;
            let theta2 = ((i + 1) as f32 / self.segments as f32) * TAU;
            self.fill_triangle(center, point(theta1), point(theta2), color);
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.fill_ellipse(center, Vec2::splat(radius), 0.0, color);
    }

    /// Radial gradient disc. `stops` are `(offset, color)` pairs with offsets
    /// ascending in `[0, 1]` as a fraction of `radius`; nothing is drawn past
    /// the last stop.
    pub fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[(f32, [f32; 4])]) {
        let Some(&(first_offset, first_color)) = stops.first() else {
            return;
        };
        if first_offset > 0.0 {
            self.fill_circle(center, radius * first_offset, first_color);
        }
        for pair in stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            self.ring(center, radius * t0, radius * t1, c0, c1);
        }
    }

    /// Annulus with separate inner/outer colors (interpolated by the GPU)
    fn ring(&mut self, center: Vec2, inner: f32, outer: f32, inner_color: [f32; 4], outer_color: [f32; 4]) {
        for i in 0..self.segments {
            let theta1 = (i as f32 / self.segments as f32) * TAU;
            let theta2 = ((i + 1) as f32 / self.segments as f32) * TAU;
            let d1 = Vec2::from_angle(theta1);
            let d2 = Vec2::from_angle(theta2);

            let inner1 = center + d1 * inner;
            let outer1 = center + d1 * outer;
            let inner2 = center + d2 * inner;
            let outer2 = center + d2 * outer;

            // Two triangles per segment
            self.emit(inner1, inner_color);
            self.emit(outer1, outer_color);
            self.emit(inner2, inner_color);

            self.emit(inner2, inner_color);
            self.emit(outer1, outer_color);
            self.emit(outer2, outer_color);
        }
    }

    // === Strokes ===

    /// Open polyline of the given width
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 4]) {
        let half = width / 2.0;
        for pair in points.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            let dir = (p2 - p1).normalize_or_zero();
            if dir == Vec2::ZERO {
                continue;
            }
            let perp = dir.perp() * half;

            self.fill_triangle(p1 + perp, p1 - perp, p2 + perp, color);
            self.fill_triangle(p2 + perp, p1 - perp, p2 - perp, color);
        }
    }

    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        self.stroke_polyline(&[from, to], width, color);
    }

    /// Quadratic Bézier from `from` to `to` bent toward `control`
    pub fn stroke_quadratic(&mut self, from: Vec2, control: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        let steps = (self.segments / 2).max(4);
        let points: Vec<Vec2> = (0..=steps)
            .map(|i| {
                let t = i as f32 / steps as f32;
                let u = 1.0 - t;
                from * (u * u) + control * (2.0 * u * t) + to * (t * t)
            })
            .collect();
        self.stroke_polyline(&points, width, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    fn close(a: [f32; 2], b: Vec2) -> bool {
        (a[0] - b.x).abs() < 1e-4 && (a[1] - b.y).abs() < 1e-4
    }

    #[test]
    fn test_circle_is_a_triangle_fan() {
        let mut p = Painter::with_segments(12);
        p.fill_circle(Vec2::new(10.0, 20.0), 5.0, RED);
        assert_eq!(p.vertices().len(), 12 * 3);
        for v in p.vertices() {
            let d = Vec2::from(v.position).distance(Vec2::new(10.0, 20.0));
            assert!(d <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_translate_then_rotate_matches_canvas_order() {
        let mut p = Painter::new();
        p.translate(Vec2::new(100.0, 50.0));
        p.rotate(std::f32::consts::FRAC_PI_2);
        p.fill_triangle(Vec2::new(10.0, 0.0), Vec2::ZERO, Vec2::ZERO, RED);
        // (10, 0) rotated a quarter turn is (0, 10), then offset
        assert!(close(p.vertices()[0].position, Vec2::new(100.0, 60.0)));
    }

    #[test]
    fn test_save_restore_and_alpha() {
        let mut p = Painter::new();
        p.save();
        p.translate(Vec2::new(5.0, 5.0));
        p.set_alpha(0.5);
        p.fill_triangle(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, RED);
        p.restore();
        p.fill_triangle(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, RED);

        let v = p.vertices();
        assert!(close(v[0].position, Vec2::new(5.0, 5.0)));
        assert_eq!(v[0].color[3], 0.5);
        assert!(close(v[3].position, Vec2::ZERO));
        assert_eq!(v[3].color[3], 1.0);
    }

    #[test]
    fn test_gradient_stops_stay_inside_radius() {
        let mut p = Painter::with_segments(16);
        let black = [0.0, 0.0, 0.0, 1.0];
        p.fill_radial_gradient(Vec2::ZERO, 100.0, &[(0.0, RED), (0.7, black)]);
        assert_eq!(p.vertices().len(), 16 * 6);
        let max = p
            .vertices()
            .iter()
            .map(|v| Vec2::from(v.position).length())
            .fold(0.0f32, f32::max);
        assert!((max - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_stroke_emits_nothing() {
        let mut p = Painter::new();
        p.stroke_line(Vec2::ONE, Vec2::ONE, 2.0, RED);
        assert!(p.vertices().is_empty());
    }
}
