//! # Graphics Module
//!
//! All rendering functionality: procedural geometry, the backend
//! abstraction, scene management, the animated camera and the frame
//! pipeline.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - Plane, box and sphere generators
//! - **Backend** ([`backend`]) - [`GraphicsBackend`](backend::GraphicsBackend) trait plus a headless implementation
//! - **Resources** ([`resources`]) - Buffer uploads, uniform bindings, depth buffer
//! - **Scene** ([`scene`]) - Objects, transforms and the default diorama
//! - **Camera** ([`camera`]) - Two-mode camera animation and view/projection helpers
//! - **Rendering** ([`rendering`]) - Frame renderer, shader program and the wgpu engine
//!
//! ## Usage
//!
//! ```rust
//! use diorama::{
//!     config::RendererConfig,
//!     gfx::{backend::HeadlessBackend, context::RendererContext, rendering::FrameOutcome},
//! };
//!
//! let config = RendererConfig::default().with_seed(1);
//! let mut context = RendererContext::new(HeadlessBackend::default(), &config).unwrap();
//!
//! let outcome = context.render_frame().unwrap();
//! assert_eq!(outcome, FrameOutcome::Presented { draw_calls: 6 });
//! ```

pub mod backend;
pub mod camera;
pub mod context;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use context::RendererContext;
pub use rendering::render_engine::RenderEngine;
