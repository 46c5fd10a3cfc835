//! # Primitive Shape Generation
//!
//! Box, plane, circle and grid generators. Dimensions match what a scene author would pass to a
//! typical scene-graph library: full extents, not half extents.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box centered at the origin
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z
///
/// Each face has its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-hx, -hy,  hz], [ hx, -hy,  hz], [ hx,  hy,  hz], [-hx,  hy,  hz],
        // Back face
        [-hx, -hy, -hz], [-hx,  hy, -hz], [ hx,  hy, -hz], [ hx, -hy, -hz],
        // Left face
        [-hx, -hy, -hz], [-hx, -hy,  hz], [-hx,  hy,  hz], [-hx,  hy, -hz],
        // Right face
        [ hx, -hy,  hz], [ hx, -hy, -hz], [ hx,  hy, -hz], [ hx,  hy,  hz],
        // Top face
        [-hx,  hy,  hz], [ hx,  hy,  hz], [ hx,  hy, -hz], [-hx,  hy, -hz],
        // Bottom face
        [-hx, -hy, -hz], [ hx, -hy, -hz], [ hx, -hy,  hz], [-hx, -hy,  hz],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();

    for face in 0..6u32 {
        let base = face * 4;
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a flat rectangle in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
pub fn generate_plane(width: f32, height: f32) -> GeometryData {
    generate_plane_segmented(width, height, 1, 1)
}

/// Generate a subdivided rectangle in the XY plane facing +Z
pub fn generate_plane_segmented(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let pos_y = (y as f32 / h_segs as f32 - 0.5) * height;

        for x in 0..=w_segs {
            let pos_x = (x as f32 / w_segs as f32 - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[i + 1, next_row + 1, next_row]);
        }
    }

    data
}

/// Generate a filled disc in the XY plane facing +Z
///
/// # Arguments
/// * `radius` - Disc radius
/// * `segments` - Number of outer edge segments (at least 3)
pub fn generate_circle(radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);

    data.vertices.push([0.0, 0.0, 0.0]);
    data.normals.push([0.0, 0.0, 1.0]);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        data.vertices
            .push([radius * angle.cos(), radius * angle.sin(), 0.0]);
        data.normals.push([0.0, 0.0, 1.0]);
    }

    for i in 1..=segs {
        data.indices.extend_from_slice(&[0, i, i + 1]);
    }

    data
}

/// Generate a square grid of thin strips in the XY plane facing +Z
///
/// # Arguments
/// * `size` - Full extent along X and Y
/// * `divisions` - Number of cells per side; `divisions + 1` strips run each way
/// * `line_width` - Width of each strip
///
/// Strips are flat quads, not line primitives.
pub fn generate_grid(size: f32, divisions: u32, line_width: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let divs = divisions.max(1);
    let half = size * 0.5;
    let half_line = line_width * 0.5;
    let step = size / divs as f32;

    let mut push_quad = |x0: f32, y0: f32, x1: f32, y1: f32| {
        let base = data.vertices.len() as u32;
        data.vertices
            .extend_from_slice(&[[x0, y0, 0.0], [x1, y0, 0.0], [x1, y1, 0.0], [x0, y1, 0.0]]);
        data.normals.extend_from_slice(&[[0.0, 0.0, 1.0]; 4]);
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    };

    for i in 0..=divs {
        let offset = -half + i as f32 * step;
        // Strip parallel to Y, then strip parallel to X
        push_quad(offset - half_line, -half, offset + half_line, half);
        push_quad(-half, offset - half_line, half, offset + half_line);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(tri: [[f32; 3]; 3]) -> [f32; 3] {
        let e1 = [
            tri[1][0] - tri[0][0],
            tri[1][1] - tri[0][1],
            tri[1][2] - tri[0][2],
        ];
        let e2 = [
            tri[2][0] - tri[0][0],
            tri[2][1] - tri[0][1],
            tri[2][2] - tri[0][2],
        ];
        [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ]
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(3.0, 0.1, 1.8);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);

        let max_x = cube.vertices.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
        let max_y = cube.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        assert!((max_x - 1.5).abs() < 1e-6);
        assert!((max_y - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_box_winding_faces_outward() {
        let cube = generate_box(1.0, 2.0, 3.0);
        for (i, tri) in cube.triangles().enumerate() {
            let n = face_normal(tri);
            let expected = cube.normals[cube.indices[i * 3] as usize];
            let dot = n[0] * expected[0] + n[1] * expected[1] + n[2] * expected[2];
            assert!(dot > 0.0, "triangle {} winds inward", i);
        }
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let plane = generate_plane_segmented(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertex_count(), 9);
        assert_eq!(plane.indices.len(), 24);
        for tri in plane.triangles() {
            assert!(face_normal(tri)[2] > 0.0);
        }
    }

    #[test]
    fn test_circle_faces_positive_z() {
        let circle = generate_circle(50.0, 64);
        assert_eq!(circle.triangle_count(), 64);
        for tri in circle.triangles() {
            assert!(face_normal(tri)[2] > 0.0);
        }
    }

    #[test]
    fn test_grid_strips() {
        let grid = generate_grid(100.0, 100, 0.02);
        // 101 strips each way, two triangles per strip
        assert_eq!(grid.triangle_count(), 404);
        assert_eq!(grid.vertex_count(), 808);
        for tri in grid.triangles() {
            assert!(face_normal(tri)[2] > 0.0);
        }

        let max_x = grid.vertices.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
        assert!((max_x - 50.01).abs() < 1e-4);
        assert!(grid.vertices.iter().all(|v| v[2] == 0.0));
    }
}
