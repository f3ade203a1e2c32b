//! Index-based triangle mesh: dense vertex and face arrays with lazily
//! cached bounding boxes and octree.

use crate::aabb::Aabb;
use crate::errors::{CsgError, CsgResult};
use crate::float_types::{DEFAULT_OCTREE_DEPTH, Real, parry3d, tolerance};
use crate::intersect::{TrianglePoints, is_degenerate};
use crate::octree::Octree;
use hashbrown::HashMap;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};
use std::sync::OnceLock;

pub mod adjacency;
pub mod buffer;
pub mod shapes;
pub mod vertex;

pub use adjacency::FaceAdjacency;
pub use buffer::GeometryBuffer;
pub use vertex::Vertex;

/// Ray directions used by [`Mesh::contains_point`]. Skewed so that they do
/// not line up with the axes or the diagonals of axis aligned geometry.
const PARITY_RAYS: [[Real; 3]; 3] = [
    [0.6123, 0.4571, 0.6451],
    [-0.3917, 0.7283, 0.5621],
    [0.2749, -0.5128, 0.8133],
];

/// Where this face crosses a face of the other operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriIntersection {
    /// Face id in the other mesh
    pub other_face: usize,
    /// The shared segment
    pub edge: [Point3<Real>; 2],
}

#[derive(Debug, Clone)]
pub struct Face {
    /// Vertex indices in winding order
    pub indices: [usize; 3],

    /// Crossings recorded by the last intersection pass
    pub intersections: Vec<TriIntersection>,

    bounding_box: OnceLock<Aabb>,
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices && self.intersections == other.intersections
    }
}

impl Face {
    pub fn new(indices: [usize; 3]) -> Self {
        Face {
            indices,
            intersections: Vec::new(),
            bounding_box: OnceLock::new(),
        }
    }

    /// `true` once an intersection pass has tagged this face.
    #[inline]
    pub fn is_intersecting(&self) -> bool {
        !self.intersections.is_empty()
    }

    /// Reverse the winding.
    pub fn flip(&mut self) {
        self.indices.swap(1, 2);
    }

    /// The three directed edges in winding order.
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,

    /// `true` when this mesh holds the part lying outside the other operand
    /// of a boolean operation.
    pub outside: bool,

    bounding_box: OnceLock<Aabb>,
    octree: OnceLock<Octree>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// An empty mesh, flagged `outside`.
    pub fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            faces: Vec::new(),
            outside: true,
            bounding_box: OnceLock::new(),
            octree: OnceLock::new(),
        }
    }

    /// Build a mesh from raw positions and triangles. Every index is checked
    /// before anything is stored.
    pub fn from_triangles(positions: &[Point3<Real>], triangles: &[[usize; 3]]) -> CsgResult<Self> {
        let len = positions.len();
        if let Some(&index) = triangles.iter().flatten().find(|&&i| i >= len) {
            log::error!("mesh: triangle references vertex {index}, only {len} vertices");
            return Err(CsgError::VertexIndexOutOfBounds { index, len });
        }
        let mut mesh = Mesh::new();
        mesh.vertices = positions.iter().map(|&p| Vertex::new(p)).collect();
        mesh.faces = triangles.iter().map(|&t| Face::new(t)).collect();
        Ok(mesh)
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.invalidate_caches();
        self.vertices.len() - 1
    }

    /// Append a triangle. Fails without touching the mesh if any index is
    /// out of range.
    pub fn add_face(&mut self, indices: [usize; 3]) -> CsgResult<usize> {
        let len = self.vertices.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            log::error!("mesh: face references vertex {index}, only {len} vertices");
            return Err(CsgError::VertexIndexOutOfBounds { index, len });
        }
        self.faces.push(Face::new(indices));
        self.invalidate_caches();
        Ok(self.faces.len() - 1)
    }

    /// Check that every face references existing vertices. Boolean
    /// operations call this on both operands before touching either.
    pub fn validate(&self) -> CsgResult<()> {
        let len = self.vertices.len();
        for (face_id, face) in self.faces.iter().enumerate() {
            if let Some(&index) = face.indices.iter().find(|&&i| i >= len) {
                log::error!("mesh: face {face_id} references vertex {index}, only {len} vertices");
                return Err(CsgError::VertexIndexOutOfBounds { index, len });
            }
        }
        Ok(())
    }

    fn face(&self, face_id: usize) -> CsgResult<&Face> {
        self.faces.get(face_id).ok_or_else(|| {
            log::error!("mesh: face {face_id} requested, only {} faces", self.faces.len());
            CsgError::FaceIndexOutOfBounds {
                index: face_id,
                len: self.faces.len(),
            }
        })
    }

    fn vertex_pos(&self, index: usize) -> CsgResult<Point3<Real>> {
        self.vertices
            .get(index)
            .map(|v| v.pos)
            .ok_or(CsgError::VertexIndexOutOfBounds {
                index,
                len: self.vertices.len(),
            })
    }

    /// Corner positions of a face, in winding order.
    pub fn face_points(&self, face_id: usize) -> CsgResult<TrianglePoints> {
        let [a, b, c] = self.face(face_id)?.indices;
        Ok([self.vertex_pos(a)?, self.vertex_pos(b)?, self.vertex_pos(c)?])
    }

    /// Bounding box of a face (cached on the face).
    pub fn face_aabb(&self, face_id: usize) -> CsgResult<Aabb> {
        let face = self.face(face_id)?;
        if let Some(aabb) = face.bounding_box.get() {
            return Ok(*aabb);
        }
        let points = self.face_points(face_id)?;
        Ok(*face.bounding_box.get_or_init(|| Aabb::from_points(points.iter())))
    }

    pub fn face_centroid(&self, face_id: usize) -> CsgResult<Point3<Real>> {
        let [a, b, c] = self.face_points(face_id)?;
        Ok(Point3::from((a.coords + b.coords + c.coords) / 3.0))
    }

    /// Iterate over the corner positions of every face. Faces with an
    /// out-of-range index are skipped with a warning; see [`Mesh::validate`].
    pub fn triangles(&self) -> impl Iterator<Item = TrianglePoints> + '_ {
        (0..self.faces.len()).filter_map(|id| match self.face_points(id) {
            Ok(points) => Some(points),
            Err(err) => {
                log::warn!("mesh: skipping face {id}: {err}");
                None
            },
        })
    }

    /// Bounding box of all vertices (cached). The sentinel for an empty mesh.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            if self.vertices.is_empty() {
                log::warn!("mesh: bounding box of an empty mesh");
            }
            Aabb::from_points(self.vertices.iter().map(|v| &v.pos))
        })
    }

    /// Octree over every face's bounding box, rooted at the mesh's bounding
    /// box. Built on first use and dropped by [`Mesh::invalidate_caches`].
    pub fn octree(&self) -> CsgResult<&Octree> {
        if let Some(tree) = self.octree.get() {
            return Ok(tree);
        }
        let mut tree = Octree::new(self.bounding_box(), DEFAULT_OCTREE_DEPTH);
        for face_id in 0..self.faces.len() {
            tree.add_id(&self.face_aabb(face_id)?, face_id)?;
        }
        log::trace!("mesh: octree over {} faces, depth {}", tree.len(), tree.depth());
        Ok(self.octree.get_or_init(|| tree))
    }

    /// Drop every cached bounding box and the octree. Call after editing
    /// `vertices` or `faces` directly.
    pub fn invalidate_caches(&mut self) {
        self.bounding_box = OnceLock::new();
        self.octree = OnceLock::new();
        for face in &mut self.faces {
            face.bounding_box = OnceLock::new();
        }
    }

    /// `true` if any vertex of `self` lies inside `other`'s bounding box.
    pub fn has_points_inside(&self, other: &Mesh) -> bool {
        let region = other.bounding_box();
        self.vertices.iter().any(|v| region.contains_point(&v.pos))
    }

    /// Append `other`'s faces. Vertices with the same position and color as
    /// an existing vertex are shared rather than duplicated.
    ///
    /// Fails without touching `self` if `other` has an out-of-range index.
    pub fn extend(&mut self, other: &Mesh, invert_winding: bool) -> CsgResult<()> {
        other.validate()?;

        let mut known: HashMap<vertex::VertexKey, usize> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.key(), i))
            .collect();

        let remap: Vec<usize> = other
            .vertices
            .iter()
            .map(|v| {
                *known.entry(v.key()).or_insert_with(|| {
                    self.vertices.push(*v);
                    self.vertices.len() - 1
                })
            })
            .collect();

        for face in &other.faces {
            let mut copy = Face::new(face.indices.map(|i| remap[i]));
            if invert_winding {
                copy.flip();
            }
            self.faces.push(copy);
        }
        self.invalidate_caches();
        Ok(())
    }

    /// Replace this mesh's contents with `other`.
    pub fn replace(&mut self, other: Mesh) {
        *self = other;
    }

    /// Copy with every face's winding reversed.
    pub fn inverse(&self) -> Mesh {
        let mut mesh = self.clone();
        mesh.invert();
        mesh
    }

    /// Reverse the winding of every face in place.
    pub fn invert(&mut self) {
        for face in &mut self.faces {
            face.flip();
        }
    }

    /// Copy with `matrix` applied to every vertex. A mirroring matrix
    /// (negative determinant) also reverses the winding so normals still
    /// point outward.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Mesh {
        let mut mesh = self.clone();
        for v in &mut mesh.vertices {
            v.pos = matrix.transform_point(&v.pos);
        }
        if matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0 {
            mesh.invert();
        }
        mesh.invalidate_caches();
        mesh
    }

    /// Hits of the ray `origin + t * direction` (`t >= 0`) with the surface,
    /// sorted by `t` with hits closer than the tolerance merged.
    pub fn ray_intersections(&self, origin: &Point3<Real>, direction: &Vector3<Real>) -> Vec<(Point3<Real>, Real)> {
        use parry3d::query::{Ray, RayCast};
        use parry3d::shape::Triangle;

        let ray = Ray::new(*origin, *direction);
        let iso = Isometry3::identity();

        let mut hits: Vec<_> = self
            .triangles()
            .filter(|tri| !is_degenerate(tri))
            .filter_map(|[a, b, c]| {
                Triangle::new(a, b, c)
                    .cast_ray_and_get_normal(&iso, &ray, Real::MAX, true)
                    .map(|hit| (ray.point_at(hit.time_of_impact), hit.time_of_impact))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        let eps = tolerance();
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < eps);
        hits
    }

    /// Point-in-solid test by ray parity, decided by majority over three
    /// skewed rays. Assumes a closed mesh.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        if !self.bounding_box().contains_point(point) {
            return false;
        }
        let inside_votes = PARITY_RAYS
            .iter()
            .filter(|[x, y, z]| self.ray_intersections(point, &Vector3::new(*x, *y, *z)).len() % 2 == 1)
            .count();
        inside_votes >= 2
    }

    /// Forget every recorded crossing.
    pub fn clear_intersections(&mut self) {
        for face in &mut self.faces {
            face.intersections.clear();
        }
    }

    /// Ids of faces tagged by the last intersection pass.
    pub fn intersecting_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_intersecting())
            .map(|(i, _)| i)
    }

    /// Every edge shared by exactly two faces.
    pub fn is_closed(&self) -> bool {
        FaceAdjacency::new(self).is_closed()
    }
}
