//! Typed uploads into static device buffers
//!
//! Contents are written once and never change. Handles stay valid for as
//! long as the backend that created them. Allocation failures are returned
//! as-is; nothing is retried.

use log::debug;

use crate::{
    error::Result,
    gfx::backend::{BufferHandle, BufferUsage, GraphicsBackend},
};

/// Uploads one per-vertex attribute (`[f32; 3]` per vertex)
pub fn upload_vertex_attribute<B: GraphicsBackend + ?Sized>(
    backend: &mut B,
    label: &str,
    data: &[[f32; 3]],
) -> Result<BufferHandle> {
    let handle = backend.create_buffer(
        label,
        bytemuck::cast_slice(data),
        BufferUsage::Vertex,
        data.len() as u32,
    )?;
    debug!(
        "uploaded '{}': {} vertices ({} bytes) as buffer {}",
        label,
        data.len(),
        std::mem::size_of_val(data),
        handle.id()
    );
    Ok(handle)
}

/// Uploads triangle-list indices
pub fn upload_indices<B: GraphicsBackend + ?Sized>(
    backend: &mut B,
    label: &str,
    indices: &[u16],
) -> Result<BufferHandle> {
    let handle = backend.create_buffer(
        label,
        bytemuck::cast_slice(indices),
        BufferUsage::Index,
        indices.len() as u32,
    )?;
    debug!(
        "uploaded '{}': {} indices as buffer {}",
        label,
        indices.len(),
        handle.id()
    );
    Ok(handle)
}
