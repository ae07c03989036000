//! In-memory backend
//!
//! Stores buffer contents in host memory and records frames instead of
//! rasterizing them. Useful for tests and for exercising the full scene and
//! frame pipeline on machines without a GPU. Only the most recent
//! [`DEFAULT_FRAME_HISTORY`] frames are kept unless configured otherwise.

use std::collections::VecDeque;

use log::{debug, warn};

use super::{BufferHandle, BufferUsage, DrawCall, GraphicsBackend, SurfaceStatus};
use crate::{
    error::{RenderError, Result},
    gfx::camera::camera_utils::GlobalUniforms,
};

/// Number of completed frames a [`HeadlessBackend`] keeps by default.
pub const DEFAULT_FRAME_HISTORY: usize = 1024;

/// A buffer as the headless backend stores it
#[derive(Debug, Clone)]
pub struct RecordedBuffer {
    pub label: String,
    pub usage: BufferUsage,
    pub len: u32,
    pub contents: Vec<u8>,
}

impl RecordedBuffer {
    /// Vertex contents decoded as `[f32; 3]` triples
    pub fn to_vec3(&self) -> Vec<[f32; 3]> {
        let floats: Vec<f32> = self
            .contents
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        floats.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
    }

    /// Index contents decoded as `u16`
    pub fn to_indices(&self) -> Vec<u16> {
        self.contents
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect()
    }
}

/// Everything submitted between `begin_frame` and `end_frame`
#[derive(Debug, Clone)]
pub struct RecordedFrame {
    pub viewport: (u32, u32),
    pub globals: GlobalUniforms,
    pub draws: Vec<DrawCall>,
}

pub struct HeadlessBackend {
    viewport: (u32, u32),
    buffers: Vec<RecordedBuffer>,
    frames: VecDeque<RecordedFrame>,
    frame_history: usize,
    current: Option<RecordedFrame>,
    buffer_limit: Option<usize>,
    unavailable_frames: u32,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            buffers: Vec::new(),
            frames: VecDeque::new(),
            frame_history: DEFAULT_FRAME_HISTORY,
            current: None,
            buffer_limit: None,
            unavailable_frames: 0,
        }
    }

    /// Fails every allocation after the first `limit` buffers, the way a
    /// device that has run out of memory would.
    pub fn with_buffer_limit(mut self, limit: usize) -> Self {
        self.buffer_limit = Some(limit);
        self
    }

    /// Keeps at most `frames` completed frames, dropping the oldest first.
    /// Zero disables recording.
    pub fn with_frame_history(mut self, frames: usize) -> Self {
        self.frame_history = frames;
        self.frames.truncate(frames);
        self
    }

    /// Reports the surface as unavailable for the next `count` frames.
    pub fn with_unavailable_frames(mut self, count: u32) -> Self {
        self.unavailable_frames = count;
        self
    }

    pub fn buffers(&self) -> &[RecordedBuffer] {
        &self.buffers
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&RecordedBuffer> {
        self.buffers.get(handle.id() as usize)
    }

    /// Retained frames, oldest first
    pub fn frames(&self) -> &VecDeque<RecordedFrame> {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.back()
    }

    /// Removes and returns the retained frames, oldest first
    pub fn take_frames(&mut self) -> Vec<RecordedFrame> {
        self.frames.drain(..).collect()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_buffer(
        &mut self,
        label: &str,
        contents: &[u8],
        usage: BufferUsage,
        len: u32,
    ) -> Result<BufferHandle> {
        if self
            .buffer_limit
            .is_some_and(|limit| self.buffers.len() >= limit)
        {
            return Err(RenderError::BufferAllocation {
                label: label.to_owned(),
                reason: "headless buffer limit reached".to_owned(),
            });
        }

        let id = self.buffers.len() as u32;
        self.buffers.push(RecordedBuffer {
            label: label.to_owned(),
            usage,
            len,
            contents: contents.to_vec(),
        });

        Ok(BufferHandle::new(id, usage, len))
    }

    fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        debug!("headless viewport resized to {}x{}", width, height);
        self.viewport = (width, height);
    }

    fn begin_frame(&mut self, globals: &GlobalUniforms) -> Result<SurfaceStatus> {
        if self.unavailable_frames > 0 {
            self.unavailable_frames -= 1;
            return Ok(SurfaceStatus::Unavailable);
        }

        if self.current.is_some() {
            warn!("begin_frame called twice; dropping the unfinished frame");
        }

        self.current = Some(RecordedFrame {
            viewport: self.viewport,
            globals: *globals,
            draws: Vec::new(),
        });
        Ok(SurfaceStatus::Acquired)
    }

    fn draw(&mut self, call: DrawCall) {
        match self.current.as_mut() {
            Some(frame) => frame.draws.push(call),
            None => warn!("draw issued outside of a frame"),
        }
    }

    fn end_frame(&mut self) -> Result<()> {
        if let Some(frame) = self.current.take() {
            if self.frame_history == 0 {
                return Ok(());
            }
            if self.frames.len() == self.frame_history {
                self.frames.pop_front();
            }
            self.frames.push_back(frame);
        }
        Ok(())
    }
}
