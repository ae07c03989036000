//! Core rendering functionality
//!
//! The backend-independent frame pipeline plus the wgpu backend that
//! executes it.

pub mod frame_renderer;
pub mod render_engine;
pub mod shader_program;

// Re-export main types
pub use frame_renderer::{FrameOutcome, FrameRenderer};
pub use render_engine::RenderEngine;
pub use shader_program::{ShaderProgram, ShaderStage};
