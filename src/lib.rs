//! Diorama
//!
//! A small real-time renderer: a ground plane, four boxes and a sphere
//! under an animated orthographic camera, drawn with wgpu into a winit
//! window. The scene and frame pipeline run against the
//! [`GraphicsBackend`](gfx::backend::GraphicsBackend) trait, so they can be
//! driven headless as well.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod logging;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::DioramaApp;
pub use config::RendererConfig;
pub use error::{RenderError, Result};
