//! Flat position / color / triangle arrays, the handoff format for renderers
//! and serializers.

use super::{Face, Mesh, Vertex};
use crate::errors::{CsgError, CsgResult};
use crate::float_types::Real;
use nalgebra::Point3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    pub positions: Vec<[Real; 3]>,
    /// One RGBA entry per position
    pub colors: Vec<[f32; 4]>,
    /// Indices into `positions`, three per face
    pub triangles: Vec<[u32; 3]>,
}

impl GeometryBuffer {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check the buffer is internally consistent.
    pub fn validate(&self) -> CsgResult<()> {
        if self.positions.len() != self.colors.len() {
            return Err(CsgError::MalformedBuffer(format!(
                "{} positions but {} colors",
                self.positions.len(),
                self.colors.len()
            )));
        }
        if u32::try_from(self.positions.len()).is_err() {
            return Err(CsgError::MalformedBuffer(format!(
                "{} positions do not fit 32-bit indices",
                self.positions.len()
            )));
        }
        let len = self.positions.len();
        for (face, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= len) {
                return Err(CsgError::MalformedBuffer(format!(
                    "triangle {face} references vertex {index}, only {len} vertices"
                )));
            }
        }
        Ok(())
    }
}

impl Mesh {
    /// Build a mesh from a [`GeometryBuffer`], rejecting inconsistent input
    /// before anything is built.
    pub fn from_buffer(buffer: &GeometryBuffer) -> CsgResult<Mesh> {
        if let Err(err) = buffer.validate() {
            log::error!("mesh: rejected geometry buffer: {err}");
            return Err(err);
        }
        let mut mesh = Mesh::new();
        mesh.vertices = buffer
            .positions
            .iter()
            .zip(&buffer.colors)
            .map(|(&[x, y, z], &color)| Vertex::with_color(Point3::new(x, y, z), color))
            .collect();
        mesh.faces = buffer
            .triangles
            .iter()
            .map(|tri| Face::new(tri.map(|i| i as usize)))
            .collect();
        Ok(mesh)
    }

    /// Flatten into a [`GeometryBuffer`].
    pub fn to_buffer(&self) -> GeometryBuffer {
        GeometryBuffer {
            positions: self.vertices.iter().map(|v| [v.pos.x, v.pos.y, v.pos.z]).collect(),
            colors: self.vertices.iter().map(|v| v.color).collect(),
            triangles: self
                .faces
                .iter()
                .map(|f| f.indices.map(|i| i as u32))
                .collect(),
        }
    }
}
