//! The single shading program
//!
//! Compiles the vertex and fragment stages under wgpu validation error
//! scopes so a broken shader surfaces as a [`RenderError`] naming the stage
//! instead of an uncaptured-error panic, then links them into one render
//! pipeline.

use std::fmt;

use log::info;

use crate::{
    error::{RenderError, Result},
    gfx::{resources::texture_resource::TextureResource, scene::vertex::VertexAttribute},
};

const VERTEX_SOURCE: &str = include_str!("shaders/scene.vert.wgsl");
const FRAGMENT_SOURCE: &str = include_str!("shaders/scene.frag.wgsl");

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Where a named uniform lives: bind group, binding and byte offset within
/// the bound struct.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    pub offset: u64,
}

const UNIFORMS: [(&str, UniformLocation); 4] = [
    (
        "projectionMatrix",
        UniformLocation {
            group: 0,
            binding: 0,
            offset: 0,
        },
    ),
    (
        "viewMatrix",
        UniformLocation {
            group: 0,
            binding: 0,
            offset: 64,
        },
    ),
    (
        "modelMatrix",
        UniformLocation {
            group: 1,
            binding: 0,
            offset: 0,
        },
    ),
    (
        "normalMatrix",
        UniformLocation {
            group: 1,
            binding: 0,
            offset: 64,
        },
    ),
];

/// Shader slot of a vertex attribute, looked up by name
pub fn attribute_slot(name: &str) -> Result<u32> {
    VertexAttribute::from_name(name).map(VertexAttribute::slot)
}

/// Location of a uniform, looked up by name
pub fn uniform_location(name: &str) -> Option<UniformLocation> {
    UNIFORMS
        .iter()
        .find(|(uniform, _)| *uniform == name)
        .map(|(_, location)| *location)
}

pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Compiles both stages and links the pipeline
    ///
    /// Back faces are culled (counter-clockwise is front) and depth testing
    /// uses `Less` with writes enabled.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> Result<Self> {
        let vertex = compile(device, ShaderStage::Vertex, VERTEX_SOURCE)?;
        let fragment = compile(device, ShaderStage::Fragment, FRAGMENT_SOURCE)?;

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        let buffers = VertexAttribute::layouts();

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                buffers: &buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderLink {
                diagnostic: error.to_string(),
            });
        }

        log_bindings();

        Ok(Self { pipeline })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

fn compile(device: &wgpu::Device, stage: ShaderStage, source: &str) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("scene {stage} shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(RenderError::ShaderCompile {
            stage,
            diagnostic: error.to_string(),
        }),
        None => Ok(module),
    }
}

fn log_bindings() {
    let attributes: Vec<String> = VertexAttribute::ALL
        .iter()
        .map(|attribute| format!("{}={}", attribute.name(), attribute.slot()))
        .collect();
    let uniforms: Vec<String> = UNIFORMS
        .iter()
        .map(|(name, location)| {
            format!(
                "{}=group {} binding {} +{}",
                name, location.group, location.binding, location.offset
            )
        })
        .collect();
    info!(
        "shader program linked; attributes: [{}], uniforms: [{}]",
        attributes.join(", "),
        uniforms.join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_slots() {
        assert_eq!(attribute_slot("position").unwrap(), 0);
        assert_eq!(attribute_slot("normal").unwrap(), 1);
        assert_eq!(attribute_slot("color").unwrap(), 2);
        assert!(matches!(
            attribute_slot("tangent"),
            Err(RenderError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_uniform_locations_match_struct_layouts() {
        let view = uniform_location("viewMatrix").unwrap();
        assert_eq!(view.group, 0);
        assert_eq!(view.offset, 64);

        let normal = uniform_location("normalMatrix").unwrap();
        assert_eq!(normal.group, 1);
        assert_eq!(normal.offset, 64);

        assert!(uniform_location("lightPosition").is_none());
    }

    #[test]
    fn test_stage_display() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            diagnostic: "bad token".into(),
        };
        assert_eq!(err.to_string(), "error compiling fragment shader: bad token");
    }

    #[test]
    fn test_sources_declare_entry_points() {
        assert!(VERTEX_SOURCE.contains("fn vs_main"));
        assert!(FRAGMENT_SOURCE.contains("fn fs_main"));
    }
}
