//! Everything one renderer instance owns
//!
//! [`RendererContext`] bundles the backend, the scene built on it, the camera
//! animator and the frame renderer, and keeps the frame clock. The window
//! layer owns exactly one of these.

use std::time::{Duration, Instant};

use log::info;

use crate::{
    config::RendererConfig,
    error::Result,
    gfx::{
        backend::GraphicsBackend,
        camera::camera_animator::CameraAnimator,
        rendering::frame_renderer::{FrameOutcome, FrameRenderer},
        scene::Scene,
    },
};

pub struct RendererContext<B: GraphicsBackend> {
    backend: B,
    scene: Scene,
    animator: CameraAnimator,
    frame_renderer: FrameRenderer,
    last_frame: Option<Instant>,
}

impl<B: GraphicsBackend> RendererContext<B> {
    /// Builds the default scene on `backend`
    pub fn new(mut backend: B, config: &RendererConfig) -> Result<Self> {
        let mut rng = config.rng();
        let scene = Scene::build_default(&mut backend, &mut rng, config.sphere_subdivisions)?;
        info!("camera timing: {:?}", config.animation);

        Ok(Self {
            backend,
            scene,
            animator: CameraAnimator::new(config.animation),
            frame_renderer: FrameRenderer::new(),
            last_frame: None,
        })
    }

    /// Renders one frame, measuring the time since the previous one
    pub fn render_frame(&mut self) -> Result<FrameOutcome> {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);

        self.render_frame_with_elapsed(elapsed)
    }

    /// Renders one frame with an explicit elapsed time
    pub fn render_frame_with_elapsed(&mut self, elapsed: Duration) -> Result<FrameOutcome> {
        self.frame_renderer
            .render(&mut self.backend, &self.scene, &mut self.animator, elapsed)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.backend.resize(width, height);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    pub fn frame_renderer(&self) -> &FrameRenderer {
        &self.frame_renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{backend::HeadlessBackend, camera::AnimationTiming};

    #[test]
    fn test_context_renders_default_scene() {
        let config = RendererConfig::default().with_seed(5);
        let mut context = RendererContext::new(HeadlessBackend::default(), &config).unwrap();

        assert_eq!(context.scene().len(), 6);
        assert_eq!(
            context.render_frame().unwrap(),
            FrameOutcome::Presented { draw_calls: 6 }
        );
        assert_eq!(context.backend().frames().len(), 1);
    }

    #[test]
    fn test_same_seed_gives_same_colors() {
        let config = RendererConfig::default().with_seed(99);
        let a = RendererContext::new(HeadlessBackend::default(), &config).unwrap();
        let b = RendererContext::new(HeadlessBackend::default(), &config).unwrap();

        let colors = |context: &RendererContext<HeadlessBackend>| -> Vec<Vec<[f32; 3]>> {
            context
                .scene()
                .iter()
                .map(|object| {
                    context
                        .backend()
                        .buffer(object.attributes().color())
                        .unwrap()
                        .to_vec3()
                })
                .collect()
        };
        assert_eq!(colors(&a), colors(&b));
    }

    #[test]
    fn test_wall_clock_timing_uses_elapsed_time() {
        let config = RendererConfig::default()
            .with_seed(1)
            .with_animation(AnimationTiming::WallClock {
                cycle: Duration::from_secs(4),
            });
        let mut context = RendererContext::new(HeadlessBackend::default(), &config).unwrap();

        context
            .render_frame_with_elapsed(Duration::from_secs(1))
            .unwrap();
        assert!((context.animator().state().animation_param - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sphere_subdivisions_still_draw_faces() {
        let config = RendererConfig::default()
            .with_seed(2)
            .with_sphere_subdivisions(0);
        let mut context = RendererContext::new(HeadlessBackend::default(), &config).unwrap();
        context.render_frame().unwrap();

        let sphere = context.scene().get("sphere").unwrap();
        let indices = sphere.index_buffer().unwrap();
        assert_eq!(context.backend().buffer(indices).unwrap().to_indices().len(), 6);

        let draws = &context.backend().last_frame().unwrap().draws;
        assert!(draws.iter().all(|draw| draw.count > 0));
    }

    #[test]
    fn test_resize_reaches_backend() {
        let config = RendererConfig::default().with_seed(1);
        let mut context = RendererContext::new(HeadlessBackend::default(), &config).unwrap();
        context.resize(640, 480);
        assert_eq!(context.backend().viewport_size(), (640, 480));
    }
}
