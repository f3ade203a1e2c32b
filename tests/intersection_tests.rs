mod support;

use nalgebra::{Point3, Vector3};
use octcsg::{
    RayHit, TriangleOverlap, intersect_ray_triangle,
    float_types::Real,
    intersect::{ParryOverlap, edge_hits, intersection_segment, is_degenerate},
};

use crate::support::xy_triangle;

/// Barycentric coordinates of `p` with respect to `tri`, projected onto the
/// triangle's plane.
fn barycentric(tri: &[Point3<Real>; 3], p: &Point3<Real>) -> (Real, Real) {
    let u = tri[1] - tri[0];
    let v = tri[2] - tri[0];
    let w = *p - tri[0];
    let (uu, uv, vv) = (u.dot(&u), u.dot(&v), v.dot(&v));
    let (wu, wv) = (w.dot(&u), w.dot(&v));
    let d = uv * uv - uu * vv;
    ((uv * wv - vv * wu) / d, (uv * wu - uu * wv) / d)
}

#[test]
fn ray_through_centroid_round_trips() {
    let triangles = [
        xy_triangle(),
        [
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-2.0, 0.5, 1.0),
            Point3::new(0.0, -1.0, 4.0),
        ],
        [
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 3.0, 5.0),
            Point3::new(0.0, 0.0, 8.0),
        ],
    ];
    for tri in triangles {
        let centroid = Point3::from((tri[0].coords + tri[1].coords + tri[2].coords) / 3.0);
        let normal = (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).normalize();
        let start = centroid + normal * 2.5;

        match intersect_ray_triangle(&start, &centroid, &tri) {
            RayHit::Intersection { point, t } => {
                assert!((point - centroid).norm() < 1e-9);
                assert!((t - 1.0).abs() < 1e-9);
                let (s, t) = barycentric(&tri, &point);
                assert!(s >= 0.0 && t >= 0.0);
                assert!(s + t <= 1.0);
            },
            other => panic!("expected a unique intersection, got {other:?}"),
        }
    }
}

#[test]
fn ray_origin_behind_direction_is_disjoint() {
    let tri = xy_triangle();
    let hit = intersect_ray_triangle(&Point3::new(0.2, 0.2, -1.0), &Point3::new(0.2, 0.2, -3.0), &tri);
    assert_eq!(hit, RayHit::Disjoint);
}

#[test]
fn zero_area_triangles_are_degenerate() {
    let collinear = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(2.0, 2.0, 0.0),
    ];
    assert!(is_degenerate(&collinear));
    assert!(!is_degenerate(&xy_triangle()));
    assert_eq!(
        intersect_ray_triangle(&Point3::new(0.5, 0.5, 1.0), &Point3::new(0.5, 0.5, 0.0), &collinear),
        RayHit::Degenerate
    );
}

#[test]
fn piercing_triangle_yields_segment_inside_both() {
    let a = [
        Point3::new(-2.0, -2.0, 0.0),
        Point3::new(2.0, -2.0, 0.0),
        Point3::new(0.0, 2.0, 0.0),
    ];
    let b = [
        Point3::new(-0.5, 0.1, -1.0),
        Point3::new(0.5, 0.1, -1.0),
        Point3::new(0.0, 0.1, 1.0),
    ];
    assert!(ParryOverlap.overlaps(&a, &b));

    let hits = edge_hits(&a, &b);
    assert_eq!(hits.len(), 2);
    let [p, q] = intersection_segment(&a, &b).unwrap();
    for end in [p, q] {
        assert!(end.z.abs() < 1e-12);
        assert!((end.y - 0.1).abs() < 1e-12);
    }
    assert!(((p - q).norm() - 0.5).abs() < 1e-9);
}

#[test]
fn closures_act_as_overlap_tests() {
    let never = |_: &[Point3<Real>; 3], _: &[Point3<Real>; 3]| false;
    let tri = xy_triangle();
    assert!(!never.overlaps(&tri, &tri));

    let shifted = tri.map(|p| p + Vector3::new(0.25, 0.25, 0.0));
    assert!(ParryOverlap.overlaps(&tri, &shifted));
}
