//! GPU resource management
//!
//! Handles buffer uploads, uniform bindings and the depth attachment.

pub mod buffer_uploader;
pub mod global_bindings;
pub mod object_bindings;
pub mod texture_resource;

// Re-export main types
pub use buffer_uploader::{upload_indices, upload_vertex_attribute};
pub use global_bindings::{GlobalBindings, GlobalUBO};
pub use object_bindings::{ObjectBindings, ObjectUniforms};
pub use texture_resource::TextureResource;
