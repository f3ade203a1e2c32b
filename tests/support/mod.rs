//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use octcsg::{Aabb, Mesh, float_types::Real, traits::CsgOps};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Axis aligned cube of half-extent `half` centred on (x, y, z).
pub fn cube_box(x: Real, y: Real, z: Real, half: Real) -> Aabb {
    Aabb::new(Point3::new(x, y, z), Vector3::new(half, half, half))
}

/// Two 2×2×2 cubes, the second shifted so that no faces are coplanar and no
/// edge passes through a vertex or a face diagonal of the other.
pub fn offset_cubes() -> (Mesh, Mesh) {
    (Mesh::cube(2.0), Mesh::cube(2.0).translate(0.4, 0.55, 0.7))
}

/// Signed volume enclosed by a closed mesh; positive for outward winding.
pub fn signed_volume(mesh: &Mesh) -> Real {
    mesh.triangles()
        .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
        .sum()
}

/// Unit-area triangle in the z = 0 plane.
pub fn xy_triangle() -> [Point3<Real>; 3] {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
}
