//! Per-frame uniform bindings
//!
//! Group 0 holds the projection and view matrices every draw shares.

use crate::{
    gfx::camera::camera_utils::GlobalUniforms,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniforms>;

pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
    ubo: GlobalUBO,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let ubo = GlobalUBO::new(device);
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
            ubo,
        }
    }

    /// Uploads this frame's projection and view
    pub fn update(&mut self, queue: &wgpu::Queue, uniforms: GlobalUniforms) {
        self.ubo.update_content(queue, uniforms);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
