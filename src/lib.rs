//! **Constructive Solid Geometry** (*union*, *difference*, *intersection*) on
//! closed triangle meshes, accelerated by an [octree](octree) of axis aligned
//! [bounding boxes](aabb).
//!
//! ```
//! use octcsg::{Mesh, csg_union};
//!
//! let a = Mesh::cube(2.0);
//! let b = Mesh::cube(0.5);
//! let merged = csg_union(&a, &b).unwrap();
//! assert_eq!(merged.faces.len(), a.faces.len());
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for the triangle-pair sweep

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod aabb;
pub mod csg;
pub mod errors;
pub mod float_types;
pub mod intersect;
pub mod mesh;
pub mod octree;
pub mod traits;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use aabb::{Aabb, Octant};
pub use csg::{
    BooleanOp, MeshIntersection, csg_difference, csg_difference_with, csg_intersect,
    csg_intersect_with, csg_union, csg_union_with, process_mesh_intersection,
    process_mesh_intersection_with,
};
pub use errors::{CsgError, CsgResult};
pub use intersect::{ParryOverlap, RayHit, TriangleOverlap, intersect_ray_triangle};
pub use mesh::{Face, GeometryBuffer, Mesh, TriIntersection, Vertex};
pub use octree::Octree;
