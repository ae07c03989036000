//! # Procedural Geometry Generation
//!
//! Pure functions producing the raw vertex data for the three primitive
//! kinds in the scene: a ground plane, a box and a UV sphere. Nothing here
//! touches the device; uploading is the job of
//! [`buffer_uploader`](crate::gfx::resources::buffer_uploader).
//!
//! ## Usage
//!
//! ```rust
//! use diorama::gfx::geometry::{generate_box, generate_plane, generate_sphere};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let plane = generate_plane(&mut rng);
//! let cube = generate_box(&mut rng);
//! let sphere = generate_sphere(6);
//!
//! assert_eq!(plane.vertex_count(), 6);
//! assert_eq!(cube.index_count(), 36);
//! assert_eq!(sphere.vertex_count(), 49);
//! ```

pub mod primitives;

pub use primitives::*;

/// Generated geometry data ready for upload
///
/// Attributes are stored as `[f32; 3]` triples, so the flattened arrays are
/// always a multiple of 3 long. `positions`, `normals` and `colors` have one
/// entry per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Linear RGB colors in [0, 1)
    pub colors: Vec<[f32; 3]>,
    /// Triangle-list indices; `None` for unindexed geometry
    pub indices: Option<Vec<u16>>,
}

impl GeometryData {
    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices, or 0 when unindexed
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    /// Number of elements a draw call covers: indices when indexed,
    /// vertices otherwise.
    pub fn draw_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.positions.len(),
        }
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.draw_count() / 3
    }

    /// True when normals and positions hold identical data, which lets the
    /// two attributes share one device buffer.
    pub fn normals_match_positions(&self) -> bool {
        self.positions == self.normals
    }
}
