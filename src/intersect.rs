//! Ray–triangle intersection and the segment shared by two overlapping triangles.

use crate::float_types::{PARALLEL_EPSILON, Real, parry3d, tolerance};
use nalgebra::{Point3, Vector3};

/// Three corner positions in winding order.
pub type TrianglePoints = [Point3<Real>; 3];

/// Outcome of [`intersect_ray_triangle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayHit {
    /// The triangle has zero area; nothing was computed.
    Degenerate,
    /// No hit: the ray misses the triangle, points away from it, or runs
    /// parallel to its plane without lying in it.
    Disjoint,
    /// The ray is parallel to the plane and its origin lies in it.
    SamePlane,
    /// A single hit at `point = p0 + t * (p1 - p0)` with `t >= 0`.
    Intersection { point: Point3<Real>, t: Real },
}

impl RayHit {
    /// The hit point, if this is a unique intersection.
    pub fn point(&self) -> Option<Point3<Real>> {
        match self {
            RayHit::Intersection { point, .. } => Some(*point),
            _ => None,
        }
    }
}

/// Normal of the triangle's plane (not normalized). Zero for degenerate triangles.
#[inline]
pub fn triangle_normal(tri: &TrianglePoints) -> Vector3<Real> {
    (tri[1] - tri[0]).cross(&(tri[2] - tri[0]))
}

/// `true` when the triangle has exactly zero area.
#[inline]
pub fn is_degenerate(tri: &TrianglePoints) -> bool {
    triangle_normal(tri) == Vector3::zeros()
}

/// Intersect the ray starting at `p0` and passing through `p1` with `tri`.
///
/// The ray is unbounded beyond `p1`. Callers that want segment semantics
/// must reject hits with `t > 1` themselves.
pub fn intersect_ray_triangle(p0: &Point3<Real>, p1: &Point3<Real>, tri: &TrianglePoints) -> RayHit {
    let u = tri[1] - tri[0];
    let v = tri[2] - tri[0];
    let n = u.cross(&v);
    if n == Vector3::zeros() {
        return RayHit::Degenerate;
    }

    let dir = *p1 - *p0;
    let w0 = *p0 - tri[0];
    let a = -n.dot(&w0);
    let b = n.dot(&dir);
    if b.abs() < PARALLEL_EPSILON {
        return if a.abs() < PARALLEL_EPSILON {
            RayHit::SamePlane
        } else {
            RayHit::Disjoint
        };
    }

    let r = a / b;
    if r < 0.0 {
        return RayHit::Disjoint;
    }

    let point = *p0 + dir * r;

    // parametric coordinates of `point` in the (u, v) basis
    let uu = u.dot(&u);
    let uv = u.dot(&v);
    let vv = v.dot(&v);
    let w = point - tri[0];
    let wu = w.dot(&u);
    let wv = w.dot(&v);
    let d = uv * uv - uu * vv;

    let s = (uv * wv - vv * wu) / d;
    if !(0.0..=1.0).contains(&s) {
        return RayHit::Disjoint;
    }
    let t = (uv * wu - uu * wv) / d;
    if t < 0.0 || s + t > 1.0 {
        return RayHit::Disjoint;
    }

    RayHit::Intersection { point, t: r }
}

/// Points where the edges of `a` cross `b` and the edges of `b` cross `a`,
/// each edge cast as a ray from one corner to the next and kept only when
/// the hit lies on the edge itself.
pub fn edge_hits(a: &TrianglePoints, b: &TrianglePoints) -> Vec<Point3<Real>> {
    let mut hits = Vec::with_capacity(6);
    for (edges, target) in [(a, b), (b, a)] {
        for i in 0..3 {
            let p0 = &edges[i];
            let p1 = &edges[(i + 1) % 3];
            if let RayHit::Intersection { point, t } = intersect_ray_triangle(p0, p1, target) {
                if t <= 1.0 {
                    hits.push(point);
                }
            }
        }
    }
    hits
}

/// How many of the six edges of `a` and `b` lie in the other triangle's plane.
///
/// Six means the triangles are coplanar. Any non-zero count means the pair
/// can touch along an edge that no edge ray reports as a hit.
pub fn in_plane_edges(a: &TrianglePoints, b: &TrianglePoints) -> usize {
    [(a, b), (b, a)]
        .into_iter()
        .flat_map(|(edges, target)| (0..3).map(move |i| (&edges[i], &edges[(i + 1) % 3], target)))
        .filter(|(p0, p1, target)| intersect_ray_triangle(p0, p1, target) == RayHit::SamePlane)
        .count()
}

/// First two distinct points of `hits`.
///
/// When every hit coincides (within [`tolerance`]) the segment has zero
/// length. Fewer than two hits yields `None`.
pub fn segment_from_hits(hits: &[Point3<Real>]) -> Option<[Point3<Real>; 2]> {
    if hits.len() < 2 {
        return None;
    }
    let first = hits[0];
    let eps = tolerance();
    let second = hits[1..]
        .iter()
        .find(|&&p| (p - first).norm() > eps)
        .copied()
        .unwrap_or(first);
    Some([first, second])
}

/// Endpoints of the segment along which two overlapping triangles cross.
pub fn intersection_segment(a: &TrianglePoints, b: &TrianglePoints) -> Option<[Point3<Real>; 2]> {
    segment_from_hits(&edge_hits(a, b))
}

/// Exact "do these two triangles overlap" predicate used by the CSG engine.
pub trait TriangleOverlap: Sync {
    fn overlaps(&self, a: &TrianglePoints, b: &TrianglePoints) -> bool;
}

/// [`TriangleOverlap`] backed by parry's GJK intersection test.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParryOverlap;

impl TriangleOverlap for ParryOverlap {
    fn overlaps(&self, a: &TrianglePoints, b: &TrianglePoints) -> bool {
        use parry3d::math::Isometry;
        use parry3d::query;
        use parry3d::shape::Triangle;

        let ta = Triangle::new(a[0], a[1], a[2]);
        let tb = Triangle::new(b[0], b[1], b[2]);
        let identity = Isometry::identity();
        match query::intersection_test(&identity, &ta, &identity, &tb) {
            Ok(hit) => hit,
            Err(err) => {
                log::warn!("triangle overlap test unsupported: {err:?}");
                false
            },
        }
    }
}

impl<F> TriangleOverlap for F
where
    F: Fn(&TrianglePoints, &TrianglePoints) -> bool + Sync,
{
    fn overlaps(&self, a: &TrianglePoints, b: &TrianglePoints) -> bool {
        self(a, b)
    }
}
