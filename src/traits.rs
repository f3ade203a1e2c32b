use crate::aabb::Aabb;
use crate::csg;
use crate::errors::CsgResult;
use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Matrix4, Rotation3, Translation3, Vector3};

/// Boolean operations + transformations
pub trait CsgOps: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> CsgResult<Self>;
    fn difference(&self, other: &Self) -> CsgResult<Self>;
    fn intersection(&self, other: &Self) -> CsgResult<Self>;
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&self) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Returns a new Self translated so that its bounding-box center is at the origin.
    /// Anything without a bounding box is returned unchanged.
    fn center(&self) -> Self {
        let aabb = self.bounding_box();
        if !aabb.calculated {
            return self.clone();
        }
        self.translate_vector(-aabb.origin.coords)
    }

    /// Rotates by x_degrees, y_degrees, z_degrees (applied x, then y, then z)
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Scales by scale_x, scale_y, scale_z
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }
}

impl CsgOps for Mesh {
    fn new() -> Self {
        Mesh::new()
    }

    fn union(&self, other: &Self) -> CsgResult<Self> {
        csg::csg_union(self, other)
    }

    fn difference(&self, other: &Self) -> CsgResult<Self> {
        csg::csg_difference(self, other)
    }

    fn intersection(&self, other: &Self) -> CsgResult<Self> {
        csg::csg_intersect(self, other)
    }

    fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        Mesh::transform(self, matrix)
    }

    fn bounding_box(&self) -> Aabb {
        Mesh::bounding_box(self)
    }

    fn invalidate_bounding_box(&mut self) {
        self.invalidate_caches();
    }

    fn inverse(&self) -> Self {
        Mesh::inverse(self)
    }
}
