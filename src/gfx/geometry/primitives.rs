//! # Primitive Shape Generation
//!
//! All triangle primitives are wound counter-clockwise when viewed from the
//! side their normals point to.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use super::{GeometryData, LineData};

/// Generate a box centered at the origin with the given full extents
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = generate_cube();
    for v in &mut data.vertices {
        v[0] *= width;
        v[1] *= height;
        v[2] *= depth;
    }
    data
}

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes.
pub fn generate_cube() -> GeometryData {
    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let face_uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    let mut data = GeometryData::new();
    data.vertices = positions.to_vec();
    for normal in face_normals {
        data.normals.extend([normal; 4]);
        data.tex_coords.extend(face_uvs);
    }
    for face in 0..6u32 {
        let base = face * 4;
        data.indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate part of a UV sphere, from the +Y pole down to `theta_length`
///
/// `theta_length` of pi gives a full sphere, pi/2 the upper hemisphere.
pub fn generate_sphere_segment(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    theta_length: f32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = width_segments.max(3);
    let lat_segs = height_segments.max(2);

    for lat in 0..=lat_segs {
        let v = lat as f32 / lat_segs as f32;
        let theta = v * theta_length;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let u = long as f32 / long_segs as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
            data.tex_coords.push([u, v]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend([first, first + 1, second]);
            data.indices.extend([second, first + 1, second + 1]);
        }
    }

    data
}

/// Generate a full sphere of the given radius
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    generate_sphere_segment(radius, width_segments, height_segments, PI)
}

/// Generate a plane in the XZ plane facing +Y
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `width_segments` - Number of subdivisions along width
/// * `depth_segments` - Number of subdivisions along depth
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for z in 0..=d_segs {
        let v = z as f32 / d_segs as f32;
        let pos_z = (v - 0.5) * depth;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, 0.0, pos_z]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([u, v]);
        }
    }

    for z in 0..d_segs {
        for x in 0..w_segs {
            let i = z * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend([i, next_row, i + 1]);
            data.indices.extend([next_row, next_row + 1, i + 1]);
        }
    }

    data
}

/// Generate a capped cylinder along the Y axis, centered at the origin
///
/// Differing radii produce a truncated cone; side normals follow the slope.
pub fn generate_cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    for i in 0..=segs {
        let u = i as f32 / segs as f32;
        let (sin_a, cos_a) = (u * TAU).sin_cos();
        let len = (1.0 + slope * slope).sqrt();
        let normal = [cos_a / len, slope / len, sin_a / len];

        data.vertices
            .push([radius_bottom * cos_a, -half_height, radius_bottom * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([radius_top * cos_a, half_height, radius_top * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;

        data.indices.extend([bottom, top, bottom_next]);
        data.indices.extend([top, top_next, bottom_next]);
    }

    push_cap(&mut data, radius_top, half_height, segs, true);
    push_cap(&mut data, radius_bottom, -half_height, segs, false);

    data
}

/// Generate a flat disc in the XZ plane facing +Y
pub fn generate_circle(radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    push_cap(&mut data, radius, 0.0, segments.max(3), true);
    data
}

fn push_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, facing_up: bool) {
    let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push(normal);
    data.tex_coords.push([0.5, 0.5]);

    for i in 0..=segs {
        let (sin_a, cos_a) = (i as f32 / segs as f32 * TAU).sin_cos();
        data.vertices.push([radius * cos_a, y, radius * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([cos_a * 0.5 + 0.5, sin_a * 0.5 + 0.5]);
    }

    for i in 0..segs {
        let current = center + 1 + i;
        let next = current + 1;
        if facing_up {
            data.indices.extend([center, next, current]);
        } else {
            data.indices.extend([center, current, next]);
        }
    }
}

/// Generate a hexagonal prism with its hexagon in the XY plane
///
/// The hexagon has circumradius `radius` and is extruded from z = 0 to
/// z = `depth`, so the back face sits on the local origin.
pub fn generate_hexagonal_prism(radius: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let corners: Vec<[f32; 2]> = (0..6)
        .map(|i| {
            let (sin_a, cos_a) = (i as f32 * TAU / 6.0).sin_cos();
            [radius * cos_a, radius * sin_a]
        })
        .collect();
    let uv = |[x, y]: [f32; 2]| [x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5];

    // Caps: back (z = 0, facing -Z) then front (z = depth, facing +Z)
    for (z, nz) in [(0.0, -1.0), (depth, 1.0)] {
        let base = data.vertices.len() as u32;
        for &corner in &corners {
            data.vertices.push([corner[0], corner[1], z]);
            data.normals.push([0.0, 0.0, nz]);
            data.tex_coords.push(uv(corner));
        }
        for i in 1..5 {
            if nz > 0.0 {
                data.indices.extend([base, base + i, base + i + 1]);
            } else {
                data.indices.extend([base, base + i + 1, base + i]);
            }
        }
    }

    for i in 0..6 {
        let a = corners[i];
        let b = corners[(i + 1) % 6];
        let (ex, ey) = (b[0] - a[0], b[1] - a[1]);
        let len = (ex * ex + ey * ey).sqrt();
        let normal = [ey / len, -ex / len, 0.0];

        let base = data.vertices.len() as u32;
        for (corner, z, v) in [(a, 0.0, 0.0), (b, 0.0, 0.0), (b, depth, 1.0), (a, depth, 1.0)] {
            data.vertices.push([corner[0], corner[1], z]);
            data.normals.push(normal);
            data.tex_coords.push([if corner == a { 0.0 } else { 1.0 }, v]);
        }
        data.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    data
}

/// Extracts every distinct triangle edge of `geometry` as a line list
///
/// Edges shared by two triangles appear once. Zero-length edges, such as those
/// between the duplicated pole vertices of a sphere, are skipped.
pub fn generate_wireframe(geometry: &GeometryData) -> LineData {
    let mut seen = HashSet::new();
    let mut lines = LineData {
        vertices: geometry.vertices.clone(),
        indices: Vec::new(),
    };

    for tri in geometry.indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (a.min(b), a.max(b));
            if !seen.insert(key) {
                continue;
            }

            let pa = geometry.vertices[a as usize];
            let pb = geometry.vertices[b as usize];
            let length2: f32 = (0..3).map(|k| (pa[k] - pb[k]).powi(2)).sum();
            if length2 > 1e-12 {
                lines.indices.extend([key.0, key.1]);
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Every non-degenerate triangle must wind toward its vertex normals
    fn assert_winding_matches_normals(data: &GeometryData) {
        for tri in data.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| data.vertices[tri[k] as usize]);
            let face = cross(sub(b, a), sub(c, a));
            if dot(face, face) < 1e-10 {
                continue;
            }
            let normal = data.normals[tri[0] as usize];
            assert!(dot(face, normal) > 0.0, "triangle {:?} winds against its normal", tri);
        }
    }

    fn assert_consistent(data: &GeometryData) {
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertices.len()));
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_consistent(&cube);
        assert_winding_matches_normals(&cube);
    }

    #[test]
    fn test_box_extents() {
        let wall = generate_box(10.0, 6.0, 0.3);
        for v in &wall.vertices {
            assert!((v[0].abs() - 5.0).abs() < 1e-6);
            assert!((v[1].abs() - 3.0).abs() < 1e-6);
            assert!((v[2].abs() - 0.15).abs() < 1e-6);
        }
        assert_winding_matches_normals(&wall);
    }

    #[test]
    fn test_hemisphere_stays_above_equator() {
        let shell = generate_sphere_segment(30.0, 32, 32, PI / 2.0);
        assert_consistent(&shell);
        assert_eq!(shell.vertex_count(), 33 * 33);
        for v in &shell.vertices {
            assert!(v[1] >= -1e-4);
            assert!((dot(*v, *v).sqrt() - 30.0).abs() < 1e-3);
        }
        assert_winding_matches_normals(&shell);
    }

    #[test]
    fn test_full_sphere_winding() {
        let sphere = generate_sphere(0.8, 6, 6);
        assert_consistent(&sphere);
        assert_winding_matches_normals(&sphere);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9);
        assert_eq!(plane.indices.len(), 24);
        assert!(plane.vertices.iter().all(|v| v[1] == 0.0));
        assert_winding_matches_normals(&plane);
    }

    #[test]
    fn test_tapered_cylinder() {
        let pot = generate_cylinder(0.5, 0.4, 0.6, 16);
        assert_consistent(&pot);
        assert_winding_matches_normals(&pot);

        let top = pot.vertices.iter().filter(|v| (v[1] - 0.3).abs() < 1e-6);
        for v in top {
            assert!((v[0] * v[0] + v[2] * v[2]).sqrt() <= 0.5 + 1e-5);
        }
        // sides lean inward toward the narrower bottom
        assert!(pot.normals[0][1] < 0.0);
    }

    #[test]
    fn test_circle_faces_up() {
        let floor = generate_circle(24.0, 32);
        assert_eq!(floor.triangle_count(), 32);
        assert!(floor.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
        assert_winding_matches_normals(&floor);
    }

    #[test]
    fn test_hexagonal_prism() {
        let hex = generate_hexagonal_prism(6.0, 2.0);
        assert_consistent(&hex);
        assert_eq!(hex.vertex_count(), 36);
        assert_eq!(hex.triangle_count(), 20);
        for v in &hex.vertices {
            assert!(v[2] >= 0.0 && v[2] <= 2.0);
            assert!((v[0] * v[0] + v[1] * v[1]).sqrt() <= 6.0 + 1e-4);
        }
        assert_winding_matches_normals(&hex);
    }

    #[test]
    fn test_wireframe_edges_are_unique() {
        let cube = generate_cube();
        let lines = generate_wireframe(&cube);
        // four sides and one diagonal per face
        assert_eq!(lines.edge_count(), 30);

        let shell = generate_sphere_segment(1.0, 8, 4, PI / 2.0);
        let lattice = generate_wireframe(&shell);
        let mut edges: Vec<(u32, u32)> = lattice
            .indices
            .chunks_exact(2)
            .map(|e| (e[0], e[1]))
            .collect();
        let total = edges.len();
        edges.sort_unstable();
        edges.dedup();
        assert_eq!(edges.len(), total);

        for e in lattice.indices.chunks_exact(2) {
            let d = sub(lattice.vertices[e[0] as usize], lattice.vertices[e[1] as usize]);
            assert!(dot(d, d) > 0.0);
        }
    }
}
