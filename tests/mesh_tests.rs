mod support;

use approx::assert_relative_eq;
use nalgebra::{Matrix4, Point3, Vector3};
use octcsg::{
    CsgError, GeometryBuffer, Mesh, Vertex,
    mesh::FaceAdjacency,
    traits::CsgOps,
};

use crate::support::{approx_eq, signed_volume};

#[test]
fn cube_volume_and_winding() {
    let cube = Mesh::cube(2.0);
    assert_relative_eq!(signed_volume(&cube), 8.0, epsilon = 1e-9);
    assert_relative_eq!(signed_volume(&cube.inverse()), -8.0, epsilon = 1e-9);
}

#[test]
fn spheroid_approaches_ellipsoid_volume() {
    let radii = Vector3::new(1.0, 2.0, 0.5);
    let mesh = Mesh::spheroid(radii, Point3::new(3.0, -1.0, 2.0), 64, 32);
    let exact = 4.0 / 3.0 * octcsg::float_types::PI * radii.x * radii.y * radii.z;
    let v = signed_volume(&mesh);
    assert!(v < exact && v > exact * 0.98, "volume {v} vs {exact}");
}

#[test]
fn sphere_contains_its_center_but_not_far_points() {
    let sphere = Mesh::spheroid(Vector3::new(1.0, 1.0, 1.0), Point3::origin(), 24, 12);
    assert!(sphere.contains_point(&Point3::origin()));
    assert!(sphere.contains_point(&Point3::new(0.3, -0.4, 0.5)));
    assert!(!sphere.contains_point(&Point3::new(0.95, 0.95, 0.0)));
    assert!(!sphere.contains_point(&Point3::new(4.0, 0.0, 0.0)));
}

#[test]
fn geometry_buffer_handoff() {
    let buffer = GeometryBuffer {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        colors: vec![[1.0, 0.0, 0.0, 1.0]; 4],
        triangles: vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    };
    let tetra = Mesh::from_buffer(&buffer).unwrap();
    assert!(tetra.is_closed());
    assert_relative_eq!(signed_volume(&tetra), 1.0 / 6.0, epsilon = 1e-12);
    assert_eq!(tetra.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(tetra.to_buffer(), buffer);

    let broken = GeometryBuffer {
        triangles: vec![[0, 1, 4]],
        ..buffer
    };
    assert!(matches!(Mesh::from_buffer(&broken), Err(CsgError::MalformedBuffer(_))));
}

#[test]
fn extend_keeps_distinct_colors_apart() {
    let mut a = Mesh::cube(1.0);
    let mut b = Mesh::cube(1.0);
    for v in &mut b.vertices {
        v.color = [0.0, 0.0, 1.0, 1.0];
    }
    a.extend(&b, false).unwrap();
    assert_eq!(a.vertices.len(), 16);
    assert_eq!(a.faces.len(), 24);
}

#[test]
fn replace_takes_over_everything() {
    let mut a = Mesh::cube(1.0);
    let mut b = Mesh::cube(3.0);
    b.outside = false;
    a.replace(b);
    assert!(!a.outside);
    assert!(approx_eq(a.bounding_box().half_extents.x, 1.5 * 1.001, 1e-12));
}

#[test]
fn transform_moves_vertices_and_caches() {
    let cube = Mesh::cube(2.0);
    let _ = cube.octree().unwrap();
    let moved = cube.transform(&Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)));
    assert_relative_eq!(moved.bounding_box().origin, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-12);
    assert_relative_eq!(moved.octree().unwrap().region.origin.x, 10.0, epsilon = 1e-12);
    assert_relative_eq!(signed_volume(&moved), 8.0, epsilon = 1e-9);
}

#[test]
fn direct_edits_need_explicit_invalidation() {
    let mut mesh = Mesh::cube(2.0);
    let before = mesh.bounding_box();
    mesh.vertices[7].pos = Point3::new(5.0, 5.0, 5.0);
    assert_eq!(mesh.bounding_box(), before);
    mesh.invalidate_caches();
    assert!(mesh.bounding_box().maxs().x > 5.0);
    assert!(mesh.face_aabb(mesh.faces.len() - 1).unwrap().maxs().x > 5.0);
}

#[test]
fn has_points_inside_uses_the_other_bounding_box() {
    let big = Mesh::cube(2.0);
    let small = Mesh::cube(0.5);
    let corner = Mesh::cube(1.0).translate(1.0, 1.0, 1.0);
    assert!(!big.has_points_inside(&small));
    assert!(small.has_points_inside(&big));
    assert!(big.has_points_inside(&corner));
}

#[test]
fn face_adjacency_is_rebuilt_from_indices() {
    let sphere = Mesh::spheroid(Vector3::new(1.0, 1.0, 1.0), Point3::origin(), 8, 4);
    let adjacency = FaceAdjacency::new(&sphere);
    assert!(adjacency.is_closed());
    for face_id in 0..sphere.faces.len() {
        assert_eq!(adjacency.neighbors(&sphere, face_id).count(), 3);
    }
}

#[test]
fn out_of_range_lookups_are_rejected() {
    let mut mesh = Mesh::new();
    let v = mesh.add_vertex(Vertex::new(Point3::origin()));
    assert_eq!(
        mesh.add_face([v, v + 1, v + 2]),
        Err(CsgError::VertexIndexOutOfBounds { index: 1, len: 1 })
    );
    assert!(mesh.faces.is_empty());
    assert!(matches!(mesh.face_aabb(0), Err(CsgError::FaceIndexOutOfBounds { .. })));
    assert!(Mesh::from_triangles(&[Point3::origin()], &[[0, 0, 3]]).is_err());
}

#[test]
fn translate_via_trait_matches_matrix() {
    let a = Mesh::cube(1.0).translate(1.0, 2.0, 3.0);
    let b = Mesh::cube(1.0).transform(&Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0)));
    assert_eq!(a.vertices, b.vertices);
}

#[test]
fn cylinder_volume_matches_its_prism() {
    let (radius, height, segments) = (0.5, 2.0, 24);
    let mesh = Mesh::cylinder(radius, height, segments, Point3::new(-1.0, 2.0, 0.0));
    let n = segments as octcsg::float_types::Real;
    let exact = height * n / 2.0 * radius * radius * (octcsg::float_types::TAU / n).sin();
    assert_relative_eq!(signed_volume(&mesh), exact, epsilon = 1e-9);
    assert!(mesh.contains_point(&Point3::new(-1.0, 2.0, 1.0)));
    assert!(!mesh.contains_point(&Point3::new(-1.0, 2.0, 2.5)));
}
