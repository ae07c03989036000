//! # Scene Module
//!
//! Flat, ordered list of objects built once from procedural geometry.
//!
//! ## Key Components
//!
//! - [`Scene`] - Ordered objects; insertion order is draw order
//! - [`SceneObject`] - Name, transform and uploaded buffers
//! - [`VertexAttributeSet`] - Position, normal and color buffers with matching vertex counts
//! - [`Transform`] - Position, Euler rotation and scale
//! - [`VertexAttribute`] - Attribute names and vertex buffer slots
//!
//! ## Usage
//!
//! ```rust
//! use diorama::gfx::{backend::HeadlessBackend, scene::Scene};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut backend = HeadlessBackend::default();
//! let mut rng = StdRng::seed_from_u64(3);
//!
//! let scene = Scene::build_default(&mut backend, &mut rng, 6).unwrap();
//! assert_eq!(scene.len(), 6);
//! ```

pub mod object;
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use object::{SceneObject, VertexAttributeSet};
pub use scene::{make_box, Scene, SceneStatistics, DEFAULT_SPHERE_SUBDIVISIONS};
pub use transform::Transform;
pub use vertex::VertexAttribute;
