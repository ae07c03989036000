use std::sync::Arc;

use anyhow::Context;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::RendererConfig,
    error::RenderError,
    gfx::{context::RendererContext, rendering::render_engine::RenderEngine},
};

/// Windowed diorama viewer
///
/// Opens one window, builds the scene on the wgpu backend when the event
/// loop resumes and redraws continuously until the window is closed or
/// Escape is pressed.
pub struct DioramaApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: RendererConfig,
    window: Option<Arc<Window>>,
    context: Option<RendererContext<RenderEngine>>,
    fatal: Option<RenderError>,
}

impl DioramaApp {
    pub fn new(config: RendererConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                context: None,
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    ///
    /// Returns the error that stopped the renderer, if any.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);

        self.event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error).context("renderer failed"),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RenderError) {
        error!("{}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn create_context(&self, window: Arc<Window>) -> Result<RendererContext<RenderEngine>, RenderError> {
        let (width, height) = window.inner_size().into();
        let engine = pollster::block_on(RenderEngine::new(window, width, height, &self.config))?;
        RendererContext::new(engine, &self.config)
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, RenderError::DeviceInit(format!("failed to create window: {e}")));
                return;
            }
        };
        self.window = Some(window.clone());

        match self.create_context(window) {
            Ok(context) => {
                info!("renderer ready");
                self.context = Some(context);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(context) = self.context.as_mut() {
                    context.resize(width, height);
                }
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(context) = self.context.as_mut() else {
                    return;
                };
                if let Err(e) = context.render_frame() {
                    self.fail(event_loop, e);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
