//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the room is assembled from, so no model files are
//! needed. All shapes follow the same conventions:
//!
//! - Y is up.
//! - Flat shapes ([`generate_plane`], [`generate_circle`]) lie in the XY plane and face +Z;
//!   rotate the owning node to lay them down or stand them against a wall.
//! - Triangles wind counter-clockwise when seen from the side the normal points to.
//!
//! ## Usage
//!
//! ```rust
//! use room_planner::gfx::geometry::{generate_box, generate_circle, generate_plane};
//!
//! let table_top = generate_box(3.0, 0.1, 1.8);
//! let wall = generate_plane(10.0, 4.0);
//! let floor = generate_circle(50.0, 64);
//! assert_eq!(table_top.triangle_count(), 12);
//! # let _ = (wall, floor);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry ready for GPU upload and CPU-side raycasting
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z) in the owning node's local space
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates the triangles as position triples
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
