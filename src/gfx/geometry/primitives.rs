//! # Primitive Shape Generation
//!
//! Plane, box and sphere generators. Random colors are drawn from the
//! caller's generator so a seeded `Rng` reproduces the same scene.

use super::GeometryData;
use rand::Rng;
use std::f32::consts::PI;

/// Half extent of the ground plane along X and Z.
pub const PLANE_HALF_EXTENT: f32 = 5.0;

/// Color shared by every sphere vertex.
pub const SPHERE_COLOR: [f32; 3] = [1.0, 0.5, 0.1];

/// Largest subdivision count whose `(n + 1)²` vertices still fit u16 indices.
pub const MAX_SPHERE_SUBDIVISIONS: u16 = 255;

/// Outward normal of each box face, in emission order.
pub const BOX_FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],  // front
    [0.0, 0.0, -1.0], // back
    [0.0, 1.0, 0.0],  // top
    [0.0, -1.0, 0.0], // bottom
    [1.0, 0.0, 0.0],  // right
    [-1.0, 0.0, 0.0], // left
];

fn random_color(rng: &mut impl Rng) -> [f32; 3] {
    [rng.random(), rng.random(), rng.random()]
}

/// Generate the ground plane
///
/// Two unindexed triangles spanning `[-5, 5]` on X and Z at `y = 0`, wound
/// counter-clockwise when seen from above. All six vertices share one random
/// color.
pub fn generate_plane(rng: &mut impl Rng) -> GeometryData {
    let e = PLANE_HALF_EXTENT;
    let positions = vec![
        [-e, 0.0, -e],
        [-e, 0.0, e],
        [e, 0.0, e],
        [-e, 0.0, -e],
        [e, 0.0, e],
        [e, 0.0, -e],
    ];

    let color = random_color(rng);

    GeometryData {
        normals: vec![[0.0, 1.0, 0.0]; positions.len()],
        colors: vec![color; positions.len()],
        positions,
        indices: None,
    }
}

/// Generate a unit box centered at the origin
///
/// Vertices run from -0.5 to 0.5 on every axis. Faces do not share vertices
/// so each one gets a flat normal: 24 vertices and 36 indices, faces emitted
/// front, back, top, bottom, right, left. Each face gets its own random
/// color.
///
/// Placement and size belong on the object's transform, never in the
/// vertex data.
pub fn generate_box(rng: &mut impl Rng) -> GeometryData {
    #[rustfmt::skip]
    let corners: [[f32; 3]; 24] = [
        // Front face
        [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
        // Back face
        [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
        // Top face
        [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
        // Bottom face
        [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
        // Right face
        [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
        // Left face
        [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
    ];

    let positions: Vec<[f32; 3]> = corners
        .iter()
        .map(|[x, y, z]| [x * 0.5, y * 0.5, z * 0.5])
        .collect();

    let mut normals = Vec::with_capacity(24);
    let mut colors = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, normal) in BOX_FACE_NORMALS.iter().enumerate() {
        let color = random_color(rng);
        normals.extend_from_slice(&[*normal; 4]);
        colors.extend_from_slice(&[color; 4]);

        let base = (face * 4) as u16;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    GeometryData {
        positions,
        normals,
        colors,
        indices: Some(indices),
    }
}

/// Generate a unit UV sphere from a latitude/longitude grid
///
/// Produces `(n + 1)²` vertices (pole and seam vertices are duplicated per
/// ring, not merged) and `6n²` indices. Normals are an exact copy of the
/// positions. Every vertex gets [`SPHERE_COLOR`].
///
/// `subdivisions` is clamped to `1..=`[`MAX_SPHERE_SUBDIVISIONS`]; zero
/// would leave the sphere without a single face.
pub fn generate_sphere(subdivisions: u16) -> GeometryData {
    let n = subdivisions.clamp(1, MAX_SPHERE_SUBDIVISIONS) as u32;
    let ring = n + 1;

    let mut positions = Vec::with_capacity((ring * ring) as usize);

    for row in 0..=n {
        let polar = row as f32 * PI / n as f32;
        let (sin_polar, cos_polar) = polar.sin_cos();

        for col in 0..=n {
            let azimuth = col as f32 * 2.0 * PI / n as f32;
            let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

            positions.push([sin_azimuth * sin_polar, cos_polar, cos_azimuth * sin_polar]);
        }
    }

    let mut indices = Vec::with_capacity((6 * n * n) as usize);
    for row in 0..n {
        for col in 0..n {
            let p1 = (row * ring + col) as u16;
            let p2 = p1 + ring as u16;

            indices.extend_from_slice(&[p1, p2, p1 + 1, p1 + 1, p2, p2 + 1]);
        }
    }

    GeometryData {
        normals: positions.clone(),
        colors: vec![SPHERE_COLOR; positions.len()],
        positions,
        indices: Some(indices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xD10)
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(&mut rng());
        let indices = cube.indices.as_ref().unwrap();

        assert_eq!(cube.positions.len() * 3, 72);
        assert_eq!(cube.normals.len(), 24);
        assert_eq!(cube.colors.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| i < 24));
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let cube = generate_box(&mut rng());
        let indices = cube.indices.as_ref().unwrap();

        for triangle in indices.chunks(3) {
            let [a, b, c] = [0usize, 1, 2].map(|k| cube.positions[triangle[k] as usize]);
            let normal = cube.normals[triangle[0] as usize];
            let face_normal = cross(sub(b, a), sub(c, a));
            assert!(dot(face_normal, normal) > 0.0, "triangle {:?} faces inward", triangle);
        }
    }

    #[test]
    fn test_box_is_unit_sized_with_flat_face_colors() {
        let cube = generate_box(&mut rng());

        assert!(cube
            .positions
            .iter()
            .flatten()
            .all(|c| c.abs() == 0.5));

        for face in cube.colors.chunks(4) {
            assert!(face.iter().all(|c| *c == face[0]));
            assert!(face[0].iter().all(|c| (0.0..1.0).contains(c)));
        }
        for (face, normals) in cube.normals.chunks(4).enumerate() {
            assert!(normals.iter().all(|n| *n == BOX_FACE_NORMALS[face]));
        }
    }

    #[test]
    fn test_sphere_generation() {
        for n in [1u16, 2, 6, 16] {
            let sphere = generate_sphere(n);
            let n = n as usize;

            assert_eq!(sphere.positions.len(), (n + 1) * (n + 1));
            assert_eq!(sphere.index_count(), 6 * n * n);
            assert_eq!(sphere.normals, sphere.positions);
            assert!(sphere.normals_match_positions());
            assert_eq!(sphere.colors.len(), sphere.positions.len());
            assert!(sphere.colors.iter().all(|c| *c == SPHERE_COLOR));

            for p in &sphere.positions {
                let length = dot(*p, *p).sqrt();
                assert!((length - 1.0).abs() < 1e-5, "vertex {:?} is off the unit sphere", p);
            }

            let vertex_count = sphere.positions.len() as u16;
            assert!(sphere.indices.as_ref().unwrap().iter().all(|&i| i < vertex_count));
        }
    }

    #[test]
    fn test_sphere_winding_matches_grid_pattern() {
        let sphere = generate_sphere(6);
        let indices = sphere.indices.unwrap();

        // Second cell of the second row: p1 = 1 * 7 + 1, p2 = p1 + 7.
        let cell = 6 + 1;
        assert_eq!(&indices[cell * 6..cell * 6 + 6], &[8, 15, 9, 9, 15, 16]);
    }

    #[test]
    fn test_sphere_subdivisions_are_clamped() {
        let sphere = generate_sphere(u16::MAX);
        let n = MAX_SPHERE_SUBDIVISIONS as usize;
        assert_eq!(sphere.positions.len(), (n + 1) * (n + 1));
        assert!(sphere.positions.len() <= u16::MAX as usize + 1);
    }

    #[test]
    fn test_sphere_without_subdivisions_still_has_faces() {
        let sphere = generate_sphere(0);
        assert_eq!(sphere.positions.len(), 4);
        assert_eq!(sphere.index_count(), 6);
        assert_eq!(sphere.triangle_count(), 2);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(&mut rng());

        assert_eq!(plane.positions.len(), 6);
        assert!(plane.indices.is_none());
        assert_eq!(plane.draw_count(), 6);
        assert!(plane.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
        assert!(plane.colors.iter().all(|c| *c == plane.colors[0]));
        assert!(plane.positions.iter().all(|p| p[1] == 0.0));
    }

    #[test]
    fn test_plane_faces_up() {
        let plane = generate_plane(&mut rng());
        for triangle in plane.positions.chunks(3) {
            let face_normal = cross(sub(triangle[1], triangle[0]), sub(triangle[2], triangle[0]));
            assert!(face_normal[1] > 0.0);
        }
    }

    #[test]
    fn test_seeded_colors_are_reproducible() {
        let a = generate_box(&mut rng());
        let b = generate_box(&mut rng());
        assert_eq!(a.colors, b.colors);

        let other = generate_box(&mut StdRng::seed_from_u64(1));
        assert_ne!(a.colors, other.colors);
    }
}
