//! # Scene Objects
//!
//! A [`SceneObject`] is a named transform plus the device buffers its
//! geometry was uploaded to. Buffers are fixed once uploaded; only the
//! transform may change afterwards.

use log::debug;

use super::{transform::Transform, vertex::VertexAttribute};
use crate::{
    error::{RenderError, Result},
    gfx::{
        backend::{BufferHandle, BufferUsage, GraphicsBackend},
        geometry::GeometryData,
        resources::buffer_uploader::{upload_indices, upload_vertex_attribute},
    },
};

/// The three per-vertex attribute buffers of one object
///
/// Construction checks that every handle is a vertex buffer and that all
/// three hold the same number of vertices, so a draw can never read past
/// the end of one attribute.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexAttributeSet {
    position: BufferHandle,
    normal: BufferHandle,
    color: BufferHandle,
}

impl VertexAttributeSet {
    pub fn new(position: BufferHandle, normal: BufferHandle, color: BufferHandle) -> Result<Self> {
        let bindings = [
            (VertexAttribute::Position, position),
            (VertexAttribute::Normal, normal),
            (VertexAttribute::Color, color),
        ];

        for (attribute, handle) in bindings {
            if handle.usage() != BufferUsage::Vertex {
                return Err(RenderError::WrongBufferUsage {
                    attribute: attribute.name(),
                    found: handle.usage(),
                });
            }
            if handle.len() != position.len() {
                return Err(RenderError::AttributeCountMismatch {
                    attribute: attribute.name(),
                    expected: position.len(),
                    found: handle.len(),
                });
            }
        }

        Ok(Self {
            position,
            normal,
            color,
        })
    }

    pub fn position(&self) -> BufferHandle {
        self.position
    }

    pub fn normal(&self) -> BufferHandle {
        self.normal
    }

    pub fn color(&self) -> BufferHandle {
        self.color
    }

    pub fn attribute(&self, attribute: VertexAttribute) -> BufferHandle {
        match attribute {
            VertexAttribute::Position => self.position,
            VertexAttribute::Normal => self.normal,
            VertexAttribute::Color => self.color,
        }
    }

    /// Looks up an attribute buffer by its shader name
    pub fn get(&self, name: &str) -> Result<BufferHandle> {
        VertexAttribute::from_name(name).map(|attribute| self.attribute(attribute))
    }

    /// Handles in slot order
    pub fn iter(&self) -> impl Iterator<Item = (VertexAttribute, BufferHandle)> + '_ {
        VertexAttribute::ALL
            .into_iter()
            .map(move |attribute| (attribute, self.attribute(attribute)))
    }

    /// Number of vertices every attribute holds
    pub fn vertex_count(&self) -> u32 {
        self.position.len()
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub transform: Transform,
    attributes: VertexAttributeSet,
    index_buffer: Option<BufferHandle>,
    vertex_count: u32,
}

impl SceneObject {
    /// Wraps already uploaded buffers
    ///
    /// Index values are not checked here; [`SceneObject::upload`] validates
    /// them before they reach the device.
    pub fn new(
        name: impl Into<String>,
        transform: Transform,
        attributes: VertexAttributeSet,
        index_buffer: Option<BufferHandle>,
    ) -> Result<Self> {
        let vertex_count = match index_buffer {
            Some(handle) if handle.usage() != BufferUsage::Index => {
                return Err(RenderError::WrongBufferUsage {
                    attribute: "index",
                    found: handle.usage(),
                });
            }
            Some(handle) => handle.len(),
            None => attributes.vertex_count(),
        };

        Ok(Self {
            name: name.into(),
            transform,
            attributes,
            index_buffer,
            vertex_count,
        })
    }

    /// Uploads `geometry` and wraps the resulting buffers
    ///
    /// With `share_position_normal` set and identical position and normal
    /// data, a single buffer is uploaded and bound to both attributes.
    pub fn upload<B: GraphicsBackend + ?Sized>(
        backend: &mut B,
        name: &str,
        transform: Transform,
        geometry: &GeometryData,
        share_position_normal: bool,
    ) -> Result<Self> {
        let vertices = geometry.vertex_count();
        if let Some(indices) = &geometry.indices {
            if let Some(&index) = indices.iter().find(|&&i| usize::from(i) >= vertices) {
                return Err(RenderError::IndexOutOfRange {
                    index,
                    vertex_count: vertices,
                });
            }
        }

        let position = upload_vertex_attribute(
            backend,
            &format!("{name} position"),
            &geometry.positions,
        )?;

        let normal = if share_position_normal && geometry.normals_match_positions() {
            debug!("'{}' shares one buffer for position and normal", name);
            position
        } else {
            upload_vertex_attribute(backend, &format!("{name} normal"), &geometry.normals)?
        };

        let color = upload_vertex_attribute(backend, &format!("{name} color"), &geometry.colors)?;

        let attributes = VertexAttributeSet::new(position, normal, color)?;

        let index_buffer = geometry
            .indices
            .as_deref()
            .map(|indices| upload_indices(backend, &format!("{name} indices"), indices))
            .transpose()?;

        Self::new(name, transform, attributes, index_buffer)
    }

    pub fn attributes(&self) -> &VertexAttributeSet {
        &self.attributes
    }

    pub fn index_buffer(&self) -> Option<BufferHandle> {
        self.index_buffer
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Elements drawn per frame: indices when indexed, vertices otherwise
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.vertex_count / 3
    }
}
