//! Boolean operations on closed triangle meshes.
//!
//! Every entry point first tries the bounding-box shortcuts of
//! [`classify_special_cases`]. Otherwise both operands are copied, the copies
//! are swept for crossing triangles ([`process_mesh_intersection`]), every
//! face is classified inside or outside the other solid, and the result is
//! assembled by copying faces according to the operation.
//!
//! Crossing faces are kept whole; they are not re-triangulated along the
//! intersection segments.

use crate::errors::{CsgError, CsgResult};
use crate::float_types::Real;
use crate::intersect::{ParryOverlap, TriangleOverlap, edge_hits, in_plane_edges, is_degenerate, segment_from_hits};
use crate::mesh::{Mesh, TriIntersection};
use crate::octree::Octree;
use hashbrown::HashMap;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod classify;

pub use classify::{Fragments, SpecialCase, classify_faces, classify_special_cases, partition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    /// A minus B
    Difference,
    Intersection,
}

impl BooleanOp {
    /// Which fragments of A and of B survive, as `outside` flags.
    #[inline]
    const fn keeps(self) -> (bool, bool) {
        match self {
            BooleanOp::Union => (true, true),
            BooleanOp::Difference => (true, false),
            BooleanOp::Intersection => (false, false),
        }
    }
}

/// Crossing segments found between two meshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshIntersection {
    /// Distinct segment endpoints (exact equality, so `-0.0 == 0.0`)
    pub points: Vec<Point3<Real>>,
    /// Pairs of indices into `points`. May contain repeats.
    pub edges: Vec<[usize; 2]>,
    lookup: HashMap<[u64; 3], usize>,
}

impl MeshIntersection {
    fn point_index(&mut self, p: Point3<Real>) -> usize {
        // `+ 0.0` folds -0.0 into 0.0
        let key = [p.x, p.y, p.z].map(|c| u64::from((c + 0.0).to_bits()));
        *self.lookup.entry(key).or_insert_with(|| {
            self.points.push(p);
            self.points.len() - 1
        })
    }

    /// Record a segment, reusing endpoints already present.
    pub fn add_segment(&mut self, [p, q]: [Point3<Real>; 2]) -> [usize; 2] {
        let edge = [self.point_index(p), self.point_index(q)];
        self.edges.push(edge);
        edge
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Crossings between face `face_a` of `a` and the faces of `b`, as
/// `(face_b, segment)` pairs in ascending `face_b` order.
fn face_crossings<O: TriangleOverlap + ?Sized>(
    a: &Mesh,
    b: &Mesh,
    tree: &Octree,
    face_a: usize,
    overlap: &O,
) -> CsgResult<Vec<(usize, [Point3<Real>; 2])>> {
    let aabb = a.face_aabb(face_a)?;
    if !aabb.overlaps(&tree.region) {
        return Ok(Vec::new());
    }
    let tri_a = a.face_points(face_a)?;
    if is_degenerate(&tri_a) {
        log::trace!("csg: skipping degenerate face {face_a} of A");
        return Ok(Vec::new());
    }

    let mut candidates = Vec::new();
    tree.get_ids(&aabb, &mut candidates)?;
    candidates.sort_unstable();

    let mut crossings = Vec::new();
    for face_b in candidates {
        if !aabb.overlaps(&b.face_aabb(face_b)?) {
            continue;
        }
        let tri_b = b.face_points(face_b)?;
        if is_degenerate(&tri_b) || !overlap.overlaps(&tri_a, &tri_b) {
            continue;
        }
        let hits = edge_hits(&tri_a, &tri_b);
        match segment_from_hits(&hits) {
            Some(segment) => crossings.push((face_b, segment)),
            None if in_plane_edges(&tri_a, &tri_b) > 0 => {
                log::debug!("csg: faces {face_a} and {face_b} touch in a shared plane, skipping");
            },
            None => {
                log::error!(
                    "csg: faces {face_a} and {face_b} overlap but only {} edge hit(s) were found",
                    hits.len()
                );
                return Err(CsgError::SegmentExtraction {
                    face_a,
                    face_b,
                    hits: hits.len(),
                });
            },
        }
    }
    Ok(crossings)
}

type Crossings = Vec<Vec<(usize, [Point3<Real>; 2])>>;

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn all_crossings_serial<O: TriangleOverlap + ?Sized>(
    a: &Mesh,
    b: &Mesh,
    tree: &Octree,
    overlap: &O,
) -> CsgResult<Crossings> {
    (0..a.faces.len())
        .map(|face_a| face_crossings(a, b, tree, face_a, overlap))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn all_crossings<O: TriangleOverlap + ?Sized>(
    a: &Mesh,
    b: &Mesh,
    tree: &Octree,
    overlap: &O,
) -> CsgResult<Crossings> {
    all_crossings_serial(a, b, tree, overlap)
}

#[cfg(feature = "parallel")]
fn all_crossings<O: TriangleOverlap + ?Sized>(
    a: &Mesh,
    b: &Mesh,
    tree: &Octree,
    overlap: &O,
) -> CsgResult<Crossings> {
    (0..a.faces.len())
        .into_par_iter()
        .map(|face_a| face_crossings(a, b, tree, face_a, overlap))
        .collect()
}

/// [`process_mesh_intersection_with`] using [`ParryOverlap`].
pub fn process_mesh_intersection(a: &mut Mesh, b: &mut Mesh) -> CsgResult<MeshIntersection> {
    process_mesh_intersection_with(a, b, &ParryOverlap)
}

/// Find every pair of crossing faces between `a` and `b`.
///
/// Previous tags are cleared first. Each crossing is recorded in the returned
/// [`MeshIntersection`] and as a [`TriIntersection`] on both faces. Fails
/// with [`CsgError::SegmentExtraction`] if `overlap` reports a pair whose
/// segment cannot be recovered. Degenerate faces never take part, and pairs
/// that only touch within a shared plane are skipped.
///
/// Both meshes are validated before anything is cleared.
pub fn process_mesh_intersection_with<O: TriangleOverlap + ?Sized>(
    a: &mut Mesh,
    b: &mut Mesh,
    overlap: &O,
) -> CsgResult<MeshIntersection> {
    a.validate()?;
    b.validate()?;
    a.clear_intersections();
    b.clear_intersections();

    let per_face = {
        let (a, b) = (&*a, &*b);
        if a.faces.is_empty() || b.faces.is_empty() {
            Vec::new()
        } else {
            all_crossings(a, b, b.octree()?, overlap)?
        }
    };

    let mut result = MeshIntersection::default();
    for (face_a, crossings) in per_face.into_iter().enumerate() {
        for (face_b, segment) in crossings {
            result.add_segment(segment);
            a.faces[face_a].intersections.push(TriIntersection {
                other_face: face_b,
                edge: segment,
            });
            b.faces[face_b].intersections.push(TriIntersection {
                other_face: face_a,
                edge: segment,
            });
        }
    }

    log::debug!(
        "csg: {} crossing segment(s), {} distinct point(s)",
        result.edges.len(),
        result.points.len()
    );
    Ok(result)
}

/// Copy the fragments kept by `op` into one mesh. Difference inverts the
/// winding of B's pieces.
fn assemble(op: BooleanOp, a: &[Mesh], b: &[Mesh]) -> CsgResult<Mesh> {
    let (keep_a, keep_b) = op.keeps();
    let invert_b = op == BooleanOp::Difference;

    let mut result = Mesh::new();
    for fragment in a.iter().filter(|m| m.outside == keep_a) {
        result.extend(fragment, false)?;
    }
    for fragment in b.iter().filter(|m| m.outside == keep_b) {
        result.extend(fragment, invert_b)?;
    }
    Ok(result)
}

/// Run `op` on `a` and `b` with a caller-supplied overlap test.
///
/// Fails with [`CsgError::VertexIndexOutOfBounds`] before any work if either
/// operand has a face referencing a missing vertex.
pub fn boolean_with<O: TriangleOverlap + ?Sized>(
    a: &Mesh,
    b: &Mesh,
    op: BooleanOp,
    overlap: &O,
) -> CsgResult<Mesh> {
    a.validate()?;
    b.validate()?;

    if let Some(fragments) = classify_special_cases(a, b) {
        return assemble(op, &fragments.a, &fragments.b);
    }

    let mut work_a = a.clone();
    let mut work_b = b.clone();
    process_mesh_intersection_with(&mut work_a, &mut work_b, overlap)?;

    let fragments_a = partition(&work_a, &classify_faces(&work_a, &work_b)?)?;
    let fragments_b = partition(&work_b, &classify_faces(&work_b, &work_a)?)?;

    let result = assemble(op, &fragments_a, &fragments_b)?;
    log::debug!(
        "csg: {op:?} of {} and {} faces gave {} faces",
        a.faces.len(),
        b.faces.len(),
        result.faces.len()
    );
    Ok(result)
}

/// Faces of `a` and `b` lying outside the other solid.
pub fn csg_union(a: &Mesh, b: &Mesh) -> CsgResult<Mesh> {
    boolean_with(a, b, BooleanOp::Union, &ParryOverlap)
}

/// Faces of `a` outside `b`, plus faces of `b` inside `a` turned inside out.
pub fn csg_difference(a: &Mesh, b: &Mesh) -> CsgResult<Mesh> {
    boolean_with(a, b, BooleanOp::Difference, &ParryOverlap)
}

/// Faces of `a` and `b` lying inside the other solid.
pub fn csg_intersect(a: &Mesh, b: &Mesh) -> CsgResult<Mesh> {
    boolean_with(a, b, BooleanOp::Intersection, &ParryOverlap)
}

pub fn csg_union_with<O: TriangleOverlap + ?Sized>(a: &Mesh, b: &Mesh, overlap: &O) -> CsgResult<Mesh> {
    boolean_with(a, b, BooleanOp::Union, overlap)
}

pub fn csg_difference_with<O: TriangleOverlap + ?Sized>(a: &Mesh, b: &Mesh, overlap: &O) -> CsgResult<Mesh> {
    boolean_with(a, b, BooleanOp::Difference, overlap)
}

pub fn csg_intersect_with<O: TriangleOverlap + ?Sized>(a: &Mesh, b: &Mesh, overlap: &O) -> CsgResult<Mesh> {
    boolean_with(a, b, BooleanOp::Intersection, overlap)
}

impl Mesh {
    /// Replace `self` with `self ∪ other`.
    pub fn mesh_union(&mut self, other: &Mesh) -> CsgResult<()> {
        let result = csg_union(self, other)?;
        self.replace(result);
        Ok(())
    }

    /// Replace `self` with `self − other`.
    pub fn mesh_difference(&mut self, other: &Mesh) -> CsgResult<()> {
        let result = csg_difference(self, other)?;
        self.replace(result);
        Ok(())
    }

    /// Replace `self` with `self ∩ other`.
    pub fn mesh_intersect(&mut self, other: &Mesh) -> CsgResult<()> {
        let result = csg_intersect(self, other)?;
        self.replace(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CsgOps;

    fn offset_cubes() -> (Mesh, Mesh) {
        (Mesh::cube(2.0), Mesh::cube(2.0).translate(0.4, 0.55, 0.7))
    }

    #[test]
    fn points_are_deduplicated_edges_are_not() {
        let mut acc = MeshIntersection::default();
        let p = Point3::new(0.0, 0.0, 0.0);
        let q = Point3::new(1.0, 0.0, 0.0);
        assert_eq!(acc.add_segment([p, q]), [0, 1]);
        assert_eq!(acc.add_segment([q, p]), [1, 0]);
        assert_eq!(acc.points.len(), 2);
        assert_eq!(acc.edges.len(), 2);
    }

    #[test]
    fn signed_zero_is_the_same_point() {
        let mut acc = MeshIntersection::default();
        let q = Point3::new(1.0, 1.0, 1.0);
        acc.add_segment([Point3::new(0.0, 0.0, 0.0), q]);
        acc.add_segment([Point3::new(-0.0, 0.0, -0.0), q]);
        assert_eq!(acc.points.len(), 2);
        assert_eq!(acc.edges, vec![[0, 1], [0, 1]]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_sweep_matches_serial() {
        let a = Mesh::spheroid(nalgebra::Vector3::new(1.0, 1.0, 1.0), Point3::origin(), 16, 8);
        let b = Mesh::cube(1.5).translate(0.3, 0.2, 0.1);
        let tree = b.octree().unwrap();
        let serial = all_crossings_serial(&a, &b, tree, &ParryOverlap).unwrap();
        let parallel = all_crossings(&a, &b, tree, &ParryOverlap).unwrap();
        assert!(serial.iter().any(|c| !c.is_empty()));
        assert_eq!(serial, parallel);
    }

    #[test]
    fn crossing_faces_are_tagged_on_both_sides() {
        let (mut a, mut b) = offset_cubes();
        let crossing = process_mesh_intersection(&mut a, &mut b).unwrap();
        assert!(!crossing.is_empty());

        let tags_a: usize = a.faces.iter().map(|f| f.intersections.len()).sum();
        let tags_b: usize = b.faces.iter().map(|f| f.intersections.len()).sum();
        assert_eq!(tags_a, crossing.edges.len());
        assert_eq!(tags_b, crossing.edges.len());

        for (face_a, face) in a.faces.iter().enumerate() {
            for tag in &face.intersections {
                assert!(b.faces[tag.other_face]
                    .intersections
                    .iter()
                    .any(|t| t.other_face == face_a && t.edge == tag.edge));
            }
        }
    }

    #[test]
    fn keeps_table() {
        assert_eq!(BooleanOp::Union.keeps(), (true, true));
        assert_eq!(BooleanOp::Difference.keeps(), (true, false));
        assert_eq!(BooleanOp::Intersection.keeps(), (false, false));
    }
}
