//! # Vertex Attribute Layout
//!
//! Each attribute lives in its own tightly packed `[f32; 3]` buffer bound
//! to its own vertex slot, so one device buffer can feed two attributes
//! (the sphere uses this for positions and normals).

use std::fmt;

use crate::error::{RenderError, Result};

/// Size of one attribute element in bytes
pub const ATTRIBUTE_STRIDE: wgpu::BufferAddress = std::mem::size_of::<[f32; 3]>() as _;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    Color,
}

impl VertexAttribute {
    pub const ALL: [VertexAttribute; 3] = [
        VertexAttribute::Position,
        VertexAttribute::Normal,
        VertexAttribute::Color,
    ];

    /// Name the shader program exposes this attribute under
    pub fn name(self) -> &'static str {
        match self {
            VertexAttribute::Position => "position",
            VertexAttribute::Normal => "normal",
            VertexAttribute::Color => "color",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.name() == name)
            .ok_or_else(|| RenderError::UnknownAttribute(name.to_owned()))
    }

    /// Vertex buffer slot and shader location
    pub fn slot(self) -> u32 {
        match self {
            VertexAttribute::Position => 0,
            VertexAttribute::Normal => 1,
            VertexAttribute::Color => 2,
        }
    }

    /// Returns the buffer layout for this attribute's slot.
    pub fn desc(self) -> wgpu::VertexBufferLayout<'static> {
        const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        const NORMAL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
        const COLOR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

        let attributes: &'static [wgpu::VertexAttribute] = match self {
            VertexAttribute::Position => &POSITION,
            VertexAttribute::Normal => &NORMAL,
            VertexAttribute::Color => &COLOR,
        };

        wgpu::VertexBufferLayout {
            array_stride: ATTRIBUTE_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }

    /// Layouts for all three slots, in slot order
    pub fn layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
        Self::ALL.map(Self::desc)
    }
}

impl fmt::Display for VertexAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        for attribute in VertexAttribute::ALL {
            assert_eq!(VertexAttribute::from_name(attribute.name()).unwrap(), attribute);
        }
        assert!(matches!(
            VertexAttribute::from_name("uv"),
            Err(RenderError::UnknownAttribute(ref name)) if name == "uv"
        ));
    }

    #[test]
    fn test_layouts_match_slots() {
        for (slot, layout) in VertexAttribute::layouts().iter().enumerate() {
            assert_eq!(layout.array_stride, 12);
            assert_eq!(layout.attributes.len(), 1);
            assert_eq!(layout.attributes[0].shader_location, slot as u32);
            assert_eq!(layout.attributes[0].offset, 0);
        }
    }
}
