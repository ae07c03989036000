//! Error types for the renderer
//!
//! Every fatal startup condition (no device, shader failures, buffer
//! allocation) surfaces as a single [`RenderError`] with a human-readable
//! message. Nothing is retried.

use thiserror::Error;

use crate::gfx::{backend::BufferUsage, rendering::shader_program::ShaderStage};

/// Result alias used throughout the library.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// No usable graphics adapter or device.
    #[error("no usable graphics device: {0}")]
    DeviceInit(String),

    #[error("failed to create window surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// Carries the backend diagnostic for the failing stage.
    #[error("error compiling {stage} shader: {diagnostic}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },

    #[error("error linking shader program: {diagnostic}")]
    ShaderLink { diagnostic: String },

    #[error("failed to allocate buffer '{label}': {reason}")]
    BufferAllocation { label: String, reason: String },

    #[error("attribute '{attribute}' has {found} vertices, expected {expected}")]
    AttributeCountMismatch {
        attribute: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("attribute '{attribute}' is bound to a {found:?} buffer")]
    WrongBufferUsage {
        attribute: &'static str,
        found: BufferUsage,
    },

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },

    #[error("unknown vertex attribute '{0}'")]
    UnknownAttribute(String),

    /// Surface errors that cannot be recovered by reconfiguring.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
