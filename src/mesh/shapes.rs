//! Closed primitive meshes with outward (counter-clockwise) winding.

use super::{Face, Mesh, Vertex};
use crate::float_types::{PI, Real, TAU};
use nalgebra::{Point3, Vector3};

impl Mesh {
    /// Axis aligned box centred on `origin`.
    ///
    /// Eight shared corners (bit 0 = +x, bit 1 = +y, bit 2 = +z) and two
    /// triangles per side.
    pub fn cuboid(half_extents: Vector3<Real>, origin: Point3<Real>) -> Mesh {
        let h = half_extents.abs();
        let vertices = (0..8)
            .map(|i| {
                let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
                Vertex::new(origin + Vector3::new(sign(1) * h.x, sign(2) * h.y, sign(4) * h.z))
            })
            .collect();

        let quads: [[usize; 4]; 6] = [
            [0, 4, 6, 2], // -x
            [1, 3, 7, 5], // +x
            [0, 1, 5, 4], // -y
            [2, 6, 7, 3], // +y
            [0, 2, 3, 1], // -z
            [4, 5, 7, 6], // +z
        ];
        let faces = quads
            .iter()
            .flat_map(|&[a, b, c, d]| [Face::new([a, b, c]), Face::new([a, c, d])])
            .collect();

        Mesh {
            vertices,
            faces,
            ..Mesh::new()
        }
    }

    /// Cube with edge length `size`, centred at the origin.
    pub fn cube(size: Real) -> Mesh {
        let half = size * 0.5;
        Self::cuboid(Vector3::new(half, half, half), Point3::origin())
    }

    /// UV spheroid centred on `origin`.
    ///
    /// `segments` slices around the z axis (at least 3) and `stacks` bands
    /// from pole to pole (at least 2). Both poles are single shared vertices.
    pub fn spheroid(radii: Vector3<Real>, origin: Point3<Real>, segments: usize, stacks: usize) -> Mesh {
        let segments = segments.max(3);
        let stacks = stacks.max(2);

        let mut mesh = Mesh::new();
        let north = mesh.vertices.len();
        mesh.vertices.push(Vertex::new(origin + Vector3::new(0.0, 0.0, radii.z)));

        for i in 1..stacks {
            let theta = PI * i as Real / stacks as Real;
            for j in 0..segments {
                let phi = TAU * j as Real / segments as Real;
                let dir = Vector3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
                mesh.vertices.push(Vertex::new(origin + dir.component_mul(&radii)));
            }
        }
        let south = mesh.vertices.len();
        mesh.vertices.push(Vertex::new(origin - Vector3::new(0.0, 0.0, radii.z)));

        // ring `r` (0-based, from the north pole) at segment `j`
        let ring = |r: usize, j: usize| 1 + r * segments + j % segments;

        for j in 0..segments {
            mesh.faces.push(Face::new([north, ring(0, j), ring(0, j + 1)]));
        }
        for r in 0..stacks - 2 {
            for j in 0..segments {
                let (a, b) = (ring(r, j), ring(r + 1, j));
                let (c, d) = (ring(r + 1, j + 1), ring(r, j + 1));
                mesh.faces.push(Face::new([a, b, c]));
                mesh.faces.push(Face::new([a, c, d]));
            }
        }
        let last = stacks - 2;
        for j in 0..segments {
            mesh.faces.push(Face::new([south, ring(last, j + 1), ring(last, j)]));
        }

        mesh
    }

    /// Closed cylinder along +z, its bottom cap centred on `origin`.
    ///
    /// `segments` sides (at least 3). Each cap is a fan around a single
    /// shared centre vertex.
    pub fn cylinder(radius: Real, height: Real, segments: usize, origin: Point3<Real>) -> Mesh {
        let segments = segments.max(3);
        let radius = radius.abs();
        let up = Vector3::new(0.0, 0.0, height.abs());

        let mut mesh = Mesh::new();
        let bottom = mesh.vertices.len();
        mesh.vertices.push(Vertex::new(origin));
        for level in [0.0, 1.0] {
            for j in 0..segments {
                let phi = TAU * j as Real / segments as Real;
                let rim = Vector3::new(radius * phi.cos(), radius * phi.sin(), 0.0);
                mesh.vertices.push(Vertex::new(origin + rim + up * level));
            }
        }
        let top = mesh.vertices.len();
        mesh.vertices.push(Vertex::new(origin + up));

        let lower = |j: usize| 1 + j % segments;
        let upper = |j: usize| 1 + segments + j % segments;

        for j in 0..segments {
            mesh.faces.push(Face::new([bottom, lower(j + 1), lower(j)]));
            mesh.faces.push(Face::new([lower(j), lower(j + 1), upper(j + 1)]));
            mesh.faces.push(Face::new([lower(j), upper(j + 1), upper(j)]));
            mesh.faces.push(Face::new([top, upper(j), upper(j + 1)]));
        }

        mesh
    }
}
