//! Inside/outside classification of operand faces.
//!
//! Two stages: [`classify_special_cases`] settles whole meshes using bounding
//! box math alone, and [`classify_faces`] handles everything else once an
//! intersection pass has tagged the crossing faces.

use crate::errors::{CsgError, CsgResult};
use crate::mesh::{Face, FaceAdjacency, Mesh};
use hashbrown::HashMap;
use std::collections::VecDeque;

/// Which bounding-box shortcut settled an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCase {
    /// B's box lies inside A's and no vertex of A reaches into B's box
    BInsideA,
    /// A's box lies inside B's and no vertex of B reaches into A's box
    AInsideB,
    /// The boxes do not overlap (or one operand is empty)
    Disjoint,
}

/// Operand pieces with their [`Mesh::outside`] flag set.
#[derive(Debug, Clone)]
pub struct Fragments {
    pub kind: SpecialCase,
    pub a: Vec<Mesh>,
    pub b: Vec<Mesh>,
}

fn flagged(mesh: &Mesh, outside: bool) -> Mesh {
    let mut copy = mesh.clone();
    copy.outside = outside;
    copy
}

/// Try to settle `a` against `b` without looking at any triangle.
///
/// Checked in order: B inside A, A inside B, disjoint boxes. `None` means the
/// full intersection pipeline has to run.
pub fn classify_special_cases(a: &Mesh, b: &Mesh) -> Option<Fragments> {
    let box_a = a.bounding_box();
    let box_b = b.bounding_box();

    let (kind, a, b) = if box_a.contains_aabb(&box_b, true) && !a.has_points_inside(b) {
        (SpecialCase::BInsideA, flagged(a, true), flagged(b, false))
    } else if box_b.contains_aabb(&box_a, true) && !b.has_points_inside(a) {
        (SpecialCase::AInsideB, flagged(a, false), flagged(b, true))
    } else if !box_a.intersection(&box_b).calculated {
        (SpecialCase::Disjoint, a.clone(), b.clone())
    } else {
        return None;
    };

    log::debug!("csg: special case {kind:?}");
    Some(Fragments {
        kind,
        a: vec![a],
        b: vec![b],
    })
}

/// Outside flag for every face of `mesh` relative to the solid `other`.
///
/// Faces tagged by an intersection pass are tested one by one at their
/// centroid. The remaining faces are grouped into regions connected through
/// shared edges without crossing a tagged face, and each region takes the
/// result of one centroid test.
pub fn classify_faces(mesh: &Mesh, other: &Mesh) -> CsgResult<Vec<bool>> {
    let adjacency = FaceAdjacency::new(mesh);
    let mut outside: Vec<Option<bool>> = vec![None; mesh.faces.len()];

    for face_id in mesh.intersecting_faces() {
        outside[face_id] = Some(!other.contains_point(&mesh.face_centroid(face_id)?));
    }

    let mut regions = 0usize;
    let mut queue = VecDeque::new();
    for seed in 0..mesh.faces.len() {
        if outside[seed].is_some() {
            continue;
        }
        let side = !other.contains_point(&mesh.face_centroid(seed)?);
        regions += 1;

        outside[seed] = Some(side);
        queue.push_back(seed);
        while let Some(face_id) = queue.pop_front() {
            for next in adjacency.neighbors(mesh, face_id) {
                if outside[next].is_none() {
                    outside[next] = Some(side);
                    queue.push_back(next);
                }
            }
        }
    }
    log::trace!(
        "csg: classified {} faces in {regions} region(s)",
        mesh.faces.len()
    );

    Ok(outside.into_iter().map(|side| side.unwrap_or(true)).collect())
}

/// Copy the faces of `mesh` selected by `keep` into a compact new mesh,
/// bringing along only the vertices they use.
pub fn submesh(mesh: &Mesh, keep: impl Fn(usize) -> bool) -> CsgResult<Mesh> {
    let mut result = Mesh::new();
    let mut vertex_map: HashMap<usize, usize> = HashMap::new();
    for (face_id, face) in mesh.faces.iter().enumerate() {
        if !keep(face_id) {
            continue;
        }
        let mut indices = [0; 3];
        for (slot, &i) in indices.iter_mut().zip(&face.indices) {
            *slot = match vertex_map.get(&i) {
                Some(&mapped) => mapped,
                None => {
                    let vertex = mesh.vertices.get(i).ok_or(CsgError::VertexIndexOutOfBounds {
                        index: i,
                        len: mesh.vertices.len(),
                    })?;
                    result.vertices.push(*vertex);
                    vertex_map.insert(i, result.vertices.len() - 1);
                    result.vertices.len() - 1
                },
            };
        }
        result.faces.push(Face::new(indices));
    }
    Ok(result)
}

/// Split `mesh` into its outside and inside fragments according to `flags`.
pub fn partition(mesh: &Mesh, flags: &[bool]) -> CsgResult<[Mesh; 2]> {
    let flag = |id: usize| flags.get(id).copied().unwrap_or(true);
    let mut outside = submesh(mesh, flag)?;
    let mut inside = submesh(mesh, |id| !flag(id))?;
    outside.outside = true;
    inside.outside = false;
    Ok([outside, inside])
}
