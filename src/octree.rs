//! Sparse 8-ary spatial index over [`Aabb`]s storing integer face ids.
//!
//! Insertion narrows: an id descends into the unique octant that fully
//! contains its box and stops at the first node where the box straddles a
//! splitting plane. Querying widens: a query that straddles a plane visits
//! every present child. Together this never loses a candidate.

use crate::aabb::{Aabb, Octant};
use crate::errors::{CsgError, CsgResult};

/// An octree node. Children are created lazily on first insert.
#[derive(Debug, Clone)]
pub struct Octree {
    /// Spatial region covered by this node
    pub region: Aabb,

    /// Remaining depth budget; a node with `0` never creates children
    pub max_depth: usize,

    /// One optional child per [`Octant`], indexed by `Octant::index`
    pub children: [Option<Box<Octree>>; 8],

    /// Ids whose box could not be pushed into a single child
    pub ids: Vec<usize>,

    is_root: bool,
}

impl Octree {
    /// Create an empty root node covering `region`.
    pub fn new(region: Aabb, max_depth: usize) -> Self {
        Self {
            region,
            max_depth,
            children: Default::default(),
            ids: Vec::new(),
            is_root: true,
        }
    }

    fn child(region: Aabb, max_depth: usize) -> Self {
        Self {
            is_root: false,
            ..Self::new(region, max_depth)
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Insert `id` with bounding box `aabb`.
    ///
    /// Fails with [`CsgError::OutsideRegion`] and leaves the tree untouched if
    /// `aabb` is not completely inside this node's region.
    pub fn add_id(&mut self, aabb: &Aabb, id: usize) -> CsgResult<()> {
        if !self.region.contains_aabb(aabb, true) {
            log::warn!(
                "octree: box of id {id} ({:?}..{:?}) is outside region {:?}..{:?}",
                aabb.mins(),
                aabb.maxs(),
                self.region.mins(),
                self.region.maxs()
            );
            return Err(CsgError::OutsideRegion { id: Some(id) });
        }
        self.insert(aabb, id);
        Ok(())
    }

    // Precondition: `aabb` is completely inside `self.region`.
    fn insert(&mut self, aabb: &Aabb, id: usize) {
        if self.max_depth > 0 {
            if let Some(octant) = self.region.octant_of(aabb) {
                let region = self.region.octant_region(octant);
                let depth = self.max_depth - 1;
                self.children[octant.index()]
                    .get_or_insert_with(|| Box::new(Octree::child(region, depth)))
                    .insert(aabb, id);
                return;
            }
        }
        self.ids.push(id);
    }

    /// Append to `out` every id whose box could overlap `query`.
    ///
    /// The result is a superset of the true overlaps. At the root the returned
    /// flag is `true` iff at least one id was appended; non-root nodes always
    /// return `false`. A root query that does not overlap the root region at
    /// all is rejected with [`CsgError::OutsideRegion`].
    pub fn get_ids(&self, query: &Aabb, out: &mut Vec<usize>) -> CsgResult<bool> {
        if self.is_root && !self.region.overlaps(query) {
            log::warn!(
                "octree: query {:?}..{:?} does not overlap the root region",
                query.mins(),
                query.maxs()
            );
            return Err(CsgError::OutsideRegion { id: None });
        }

        let before = out.len();
        self.collect(query, out);

        Ok(self.is_root && out.len() > before)
    }

    fn collect(&self, query: &Aabb, out: &mut Vec<usize>) {
        out.extend_from_slice(&self.ids);

        match self.region.octant_of(query) {
            Some(octant) => {
                if let Some(child) = &self.children[octant.index()] {
                    child.collect(query, out);
                }
            },
            None => {
                for child in self.children.iter().flatten() {
                    child.collect(query, out);
                }
            },
        }
    }

    /// Total number of ids stored in this subtree.
    pub fn len(&self) -> usize {
        self.ids.len() + self.children.iter().flatten().map(|c| c.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth of the deepest node below (and including) this one.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }

    /// The present child in `octant`, if any.
    pub fn child_at(&self, octant: Octant) -> Option<&Octree> {
        self.children[octant.index()].as_deref()
    }
}
