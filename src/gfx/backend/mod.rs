//! # Graphics Backend Abstraction
//!
//! The scene and frame code never talk to wgpu directly. They go through
//! [`GraphicsBackend`], which covers exactly what the renderer consumes:
//! static buffer creation, the viewport size, and a begin/draw/end frame
//! protocol.
//!
//! Two implementations ship with the crate:
//!
//! - [`RenderEngine`](crate::gfx::rendering::RenderEngine) draws into a
//!   window surface through wgpu.
//! - [`HeadlessBackend`] keeps everything in memory and records each
//!   frame, which is what the tests drive.

pub mod headless;

pub use headless::HeadlessBackend;

use crate::{
    error::Result,
    gfx::{
        camera::camera_utils::GlobalUniforms, resources::object_bindings::ObjectUniforms,
        scene::object::VertexAttributeSet,
    },
};

/// What a device buffer holds
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Per-vertex attribute data (`[f32; 3]` per vertex)
    Vertex,
    /// Triangle-list indices (`u16`)
    Index,
}

/// Opaque reference to a device buffer owned by a backend
///
/// Handles are plain values: binding the same handle to two attributes
/// shares one device buffer. Buffers live as long as the backend that
/// created them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    id: u32,
    usage: BufferUsage,
    len: u32,
}

impl BufferHandle {
    /// Called by backends when they allocate a buffer.
    pub fn new(id: u32, usage: BufferUsage, len: u32) -> Self {
        Self { id, usage, len }
    }

    /// Backend-local buffer id
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Element count: vertices for vertex buffers, indices for index buffers.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One draw issued by the frame renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub attributes: VertexAttributeSet,
    pub index_buffer: Option<BufferHandle>,
    /// Indices to draw when `index_buffer` is set, vertices otherwise.
    pub count: u32,
    pub uniforms: ObjectUniforms,
}

impl DrawCall {
    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }
}

/// Result of trying to start a frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceStatus {
    /// A render target was acquired and cleared; draws may follow.
    Acquired,
    /// The surface is temporarily unavailable (outdated, lost, timed out).
    /// The frame must be skipped without calling `draw` or `end_frame`.
    Unavailable,
}

/// Device-side services the renderer consumes
pub trait GraphicsBackend {
    /// Allocates a static buffer initialized with `contents`.
    ///
    /// `len` is the element count recorded on the returned handle.
    /// Allocation failure is fatal to the caller.
    fn create_buffer(
        &mut self,
        label: &str,
        contents: &[u8],
        usage: BufferUsage,
        len: u32,
    ) -> Result<BufferHandle>;

    /// Current drawable size in pixels
    fn viewport_size(&self) -> (u32, u32);

    /// Updates the drawable size after a window resize
    fn resize(&mut self, width: u32, height: u32);

    /// Acquires a render target, clears color and depth and binds the
    /// per-frame uniforms.
    fn begin_frame(&mut self, globals: &GlobalUniforms) -> Result<SurfaceStatus>;

    /// Queues one draw for the current frame
    fn draw(&mut self, call: DrawCall);

    /// Submits the queued draws and presents
    fn end_frame(&mut self) -> Result<()>;
}
