//! Per-object uniform bindings
//!
//! Group 1 holds one [`ObjectUniforms`] per draw in a single uniform buffer.
//! Each draw binds its slot through a dynamic offset. Slots are spaced by the
//! device's uniform offset alignment.

use cgmath::{Matrix4, SquareMatrix};
use log::debug;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

/// Model and normal matrix of one draw
///
/// MUST match the `ObjectUniforms` struct in the vertex shader exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub fn new(model: Matrix4<f32>, normal: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
            normal: normal.into(),
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model.into()
    }

    pub fn normal_matrix(&self) -> Matrix4<f32> {
        self.normal.into()
    }
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity())
    }
}

const ELEMENT_SIZE: u64 = std::mem::size_of::<ObjectUniforms>() as u64;
const INITIAL_CAPACITY: u32 = 16;

/// Rounds `size` up to a multiple of `alignment`
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

pub struct ObjectBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u32,
    staging: Vec<u8>,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform_dynamic(ELEMENT_SIZE))
            .create(device, "Object Bind Group Layout");

        let stride = aligned_stride(
            ELEMENT_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (buffer, bind_group) =
            Self::allocate(device, &bind_group_layout, stride, INITIAL_CAPACITY);

        Self {
            bind_group_layout,
            buffer,
            bind_group,
            stride,
            capacity: INITIAL_CAPACITY,
            staging: Vec::new(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        stride: u64,
        capacity: u32,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = BindGroupBuilder::new(layout)
            .resource(wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(ELEMENT_SIZE),
            }))
            .create(device, "Object Bind Group");

        (buffer, bind_group)
    }

    /// Writes one slot per draw, growing the buffer when needed
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, uniforms: &[ObjectUniforms]) {
        if uniforms.is_empty() {
            return;
        }

        let needed = uniforms.len() as u32;
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            debug!(
                "growing object uniform buffer from {} to {} slots",
                self.capacity, capacity
            );
            let (buffer, bind_group) =
                Self::allocate(device, &self.bind_group_layout, self.stride, capacity);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = capacity;
        }

        self.staging.clear();
        self.staging.resize((self.stride * needed as u64) as usize, 0);
        for (slot, content) in self
            .staging
            .chunks_exact_mut(self.stride as usize)
            .zip(uniforms)
        {
            slot[..ELEMENT_SIZE as usize].copy_from_slice(bytemuck::bytes_of(content));
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    /// Dynamic offset of draw `index`
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (self.stride * index as u64) as wgpu::DynamicOffset
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
