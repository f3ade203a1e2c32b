//! Edge → face multimap over a mesh's index arrays.

use super::Mesh;
use hashbrown::HashMap;

/// Undirected edge, smaller vertex index first.
pub type EdgeKey = (usize, usize);

#[inline]
pub fn edge_key(a: usize, b: usize) -> EdgeKey {
    if a < b { (a, b) } else { (b, a) }
}

/// Which faces share each edge of a mesh.
///
/// Built from the current face list; it holds plain indices and goes stale
/// as soon as the mesh's faces change.
#[derive(Debug, Clone, Default)]
pub struct FaceAdjacency {
    edge_faces: HashMap<EdgeKey, Vec<usize>>,
}

impl FaceAdjacency {
    pub fn new(mesh: &Mesh) -> Self {
        let mut edge_faces: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
        for (face_id, face) in mesh.faces.iter().enumerate() {
            for (a, b) in face.edges() {
                edge_faces.entry(edge_key(a, b)).or_default().push(face_id);
            }
        }
        Self { edge_faces }
    }

    /// Faces incident to the edge `a`–`b` (in either direction).
    pub fn faces_on_edge(&self, a: usize, b: usize) -> &[usize] {
        self.edge_faces
            .get(&edge_key(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Faces sharing at least one edge with `face_id`, excluding itself.
    pub fn neighbors<'a>(&'a self, mesh: &'a Mesh, face_id: usize) -> impl Iterator<Item = usize> + 'a {
        mesh.faces
            .get(face_id)
            .into_iter()
            .flat_map(|face| face.edges())
            .flat_map(move |(a, b)| self.faces_on_edge(a, b).iter().copied())
            .filter(move |&other| other != face_id)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_faces.len()
    }

    /// `true` if every edge is shared by exactly two faces.
    pub fn is_closed(&self) -> bool {
        !self.edge_faces.is_empty() && self.edge_faces.values().all(|faces| faces.len() == 2)
    }
}
