//! wgpu implementation of [`GraphicsBackend`]
//!
//! Owns the surface, device and queue, the depth attachment, the shader
//! program and both uniform bind groups. Static buffers created through
//! [`GraphicsBackend::create_buffer`] are kept for the lifetime of the
//! engine and addressed by handle id.
//!
//! Draws issued between `begin_frame` and `end_frame` are queued and
//! recorded into a single render pass when the frame ends.

use log::{debug, info, trace, warn};
use wgpu::util::DeviceExt;

use super::shader_program::ShaderProgram;
use crate::{
    config::RendererConfig,
    error::{RenderError, Result},
    gfx::{
        backend::{BufferHandle, BufferUsage, DrawCall, GraphicsBackend, SurfaceStatus},
        camera::camera_utils::GlobalUniforms,
        resources::{
            global_bindings::GlobalBindings,
            object_bindings::{ObjectBindings, ObjectUniforms},
            texture_resource::TextureResource,
        },
    },
};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

struct PendingFrame {
    surface_texture: wgpu::SurfaceTexture,
    draws: Vec<DrawCall>,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    program: ShaderProgram,
    global_bindings: GlobalBindings,
    object_bindings: ObjectBindings,
    buffers: Vec<wgpu::Buffer>,
    frame: Option<PendingFrame>,
    uniform_scratch: Vec<ObjectUniforms>,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Fails when no adapter or device is available, when the surface
    /// cannot be created or when the shader program does not build.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        renderer_config: &RendererConfig,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::DeviceInit(e.to_string()))?;

        let adapter_info = adapter.get_info();
        info!(
            "using adapter '{}' ({:?}, {:?})",
            adapter_info.name, adapter_info.backend, adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Diorama Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::DeviceInit(e.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RenderError::DeviceInit("surface reports no formats".into()))?;

        let present_mode = if renderer_config.vsync
            || !surface_capabilities
                .present_modes
                .contains(&wgpu::PresentMode::Immediate)
        {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::Immediate
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        debug!(
            "surface configured: {}x{} {:?} {:?}",
            config.width, config.height, format, present_mode
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device);
        let object_bindings = ObjectBindings::new(&device);

        let program = ShaderProgram::new(
            &device,
            format,
            &[
                global_bindings.bind_group_layout(),
                object_bindings.bind_group_layout(),
            ],
        )?;

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            program,
            global_bindings,
            object_bindings,
            buffers: Vec::new(),
            frame: None,
            uniform_scratch: Vec::new(),
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    fn buffer_for(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(handle.id() as usize)
    }

    fn record_draws(&mut self, view: &wgpu::TextureView, draws: &[DrawCall]) -> wgpu::CommandBuffer {
        self.uniform_scratch.clear();
        self.uniform_scratch
            .extend(draws.iter().map(|draw| draw.uniforms));
        self.object_bindings
            .write(&self.device, &self.queue, &self.uniform_scratch);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(self.program.pipeline());
            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            'draws: for (i, draw) in draws.iter().enumerate() {
                if draw.count == 0 {
                    trace!("skipping empty draw {}", i);
                    continue;
                }
                for (attribute, handle) in draw.attributes.iter() {
                    let Some(buffer) = self.buffer_for(handle) else {
                        warn!("skipping draw {}: unknown {} buffer {}", i, attribute, handle.id());
                        continue 'draws;
                    };
                    render_pass.set_vertex_buffer(attribute.slot(), buffer.slice(..));
                }

                render_pass.set_bind_group(
                    1,
                    self.object_bindings.bind_group(),
                    &[self.object_bindings.offset(i)],
                );

                match draw.index_buffer {
                    Some(handle) => {
                        let Some(buffer) = self.buffer_for(handle) else {
                            warn!("skipping draw {}: unknown index buffer {}", i, handle.id());
                            continue;
                        };
                        render_pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint16);
                        render_pass.draw_indexed(0..draw.count, 0, 0..1);
                    }
                    None => render_pass.draw(0..draw.count, 0..1),
                }
            }
        }

        encoder.finish()
    }
}

impl GraphicsBackend for RenderEngine {
    fn create_buffer(
        &mut self,
        label: &str,
        contents: &[u8],
        usage: BufferUsage,
        len: u32,
    ) -> Result<BufferHandle> {
        let usages = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usages,
            });
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        if let Some(error) = out_of_memory.or(validation) {
            return Err(RenderError::BufferAllocation {
                label: label.to_owned(),
                reason: error.to_string(),
            });
        }

        let id = self.buffers.len() as u32;
        self.buffers.push(buffer);
        Ok(BufferHandle::new(id, usage, len))
    }

    fn viewport_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        debug!("surface resized to {}x{}", width, height);
    }

    fn begin_frame(&mut self, globals: &GlobalUniforms) -> Result<SurfaceStatus> {
        if self.frame.take().is_some() {
            warn!("begin_frame called twice; dropping the unfinished frame");
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated; reconfiguring");
                self.reconfigure();
                return Ok(SurfaceStatus::Unavailable);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                trace!("surface texture timed out");
                return Ok(SurfaceStatus::Unavailable);
            }
            Err(wgpu::SurfaceError::Other) => {
                warn!("surface texture unavailable");
                return Ok(SurfaceStatus::Unavailable);
            }
            Err(error) => return Err(error.into()),
        };

        self.global_bindings.update(&self.queue, *globals);
        self.frame = Some(PendingFrame {
            surface_texture,
            draws: Vec::new(),
        });
        Ok(SurfaceStatus::Acquired)
    }

    fn draw(&mut self, call: DrawCall) {
        match self.frame.as_mut() {
            Some(frame) => frame.draws.push(call),
            None => warn!("draw issued outside of a frame"),
        }
    }

    fn end_frame(&mut self) -> Result<()> {
        let Some(PendingFrame {
            surface_texture,
            draws,
        }) = self.frame.take()
        else {
            return Ok(());
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let commands = self.record_draws(&view, &draws);

        self.queue.submit(std::iter::once(commands));
        surface_texture.present();
        trace!("presented {} draws", draws.len());
        Ok(())
    }
}
