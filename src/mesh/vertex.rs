//! Mesh vertices: a position plus a per-vertex RGBA color.

use crate::float_types::Real;
use nalgebra::Point3;

/// Color given to vertices created without one.
pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub color: [f32; 4],
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

impl Vertex {
    /// Create a vertex with [`DEFAULT_COLOR`]. Non-finite coordinates are
    /// replaced with `0.0`.
    #[inline]
    pub fn new(pos: Point3<Real>) -> Self {
        Self::with_color(pos, DEFAULT_COLOR)
    }

    #[inline]
    pub fn with_color(mut pos: Point3<Real>, color: [f32; 4]) -> Self {
        for c in pos.coords.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }
        Vertex { pos, color }
    }

    /// Bit-exact identity of position and color, used to merge vertices.
    ///
    /// `-0.0` and `0.0` map to the same key.
    pub fn key(&self) -> VertexKey {
        let bits = |c: Real| u64::from((c + 0.0).to_bits());
        VertexKey {
            pos: [bits(self.pos.x), bits(self.pos.y), bits(self.pos.z)],
            color: self.color.map(|c| (c + 0.0).to_bits()),
        }
    }
}

/// Hashable identity of a [`Vertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pos: [u64; 3],
    color: [u32; 4],
}
