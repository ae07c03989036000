//! Per-frame transform pipeline
//!
//! Every frame advances the camera, rebuilds the projection from the current
//! viewport and issues one draw per scene object with its model and normal
//! matrices.

use std::time::Duration;

use cgmath::{Matrix, Matrix4, SquareMatrix, Zero};
use log::trace;

use crate::{
    error::Result,
    gfx::{
        backend::{DrawCall, GraphicsBackend, SurfaceStatus},
        camera::{
            camera_animator::CameraAnimator,
            camera_utils::{look_at, orthographic, GlobalUniforms, CAMERA_TARGET, CAMERA_UP},
        },
        resources::object_bindings::ObjectUniforms,
        scene::{Scene, SceneObject},
    },
};

/// Half the visible height of the orthographic volume in world units
pub const ORTHO_HALF_HEIGHT: f32 = 8.0;
pub const NEAR_PLANE: f32 = 0.0;
pub const FAR_PLANE: f32 = 100.0;

/// What happened to a frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented { draw_calls: usize },
    /// The surface was unavailable; nothing was drawn.
    Skipped,
}

/// Orthographic projection for a viewport with the given aspect ratio
///
/// The volume spans `±8 * aspect` horizontally and `±8` vertically.
pub fn projection_matrix(aspect: f32) -> Matrix4<f32> {
    let half_width = ORTHO_HALF_HEIGHT * aspect;
    orthographic(
        -half_width,
        half_width,
        -ORTHO_HALF_HEIGHT,
        ORTHO_HALF_HEIGHT,
        NEAR_PLANE,
        FAR_PLANE,
    )
}

/// `transpose(inverse(model_view))`, or the zero matrix when `model_view`
/// is singular
pub fn normal_matrix(model_view: Matrix4<f32>) -> Matrix4<f32> {
    model_view
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix4::zero)
}

/// Model and normal matrix for one object under `view`
pub fn object_uniforms(object: &SceneObject, view: Matrix4<f32>) -> ObjectUniforms {
    let model = object.transform.model_matrix();
    ObjectUniforms::new(model, normal_matrix(view * model))
}

fn aspect_ratio((width, height): (u32, u32)) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[derive(Debug, Default)]
pub struct FrameRenderer {
    frames_presented: u64,
    frames_skipped: u64,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders one frame of `scene`
    ///
    /// The camera advances even when the surface turns out to be
    /// unavailable, so animation speed does not depend on presentation.
    pub fn render<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        scene: &Scene,
        animator: &mut CameraAnimator,
        elapsed: Duration,
    ) -> Result<FrameOutcome> {
        let camera = animator.tick(elapsed);

        let view = look_at(camera.eye(), CAMERA_TARGET, CAMERA_UP);
        let projection = projection_matrix(aspect_ratio(backend.viewport_size()));
        let globals = GlobalUniforms::new(projection, view);

        if backend.begin_frame(&globals)? == SurfaceStatus::Unavailable {
            self.frames_skipped += 1;
            trace!("frame skipped, surface unavailable");
            return Ok(FrameOutcome::Skipped);
        }

        for object in scene {
            backend.draw(DrawCall {
                attributes: *object.attributes(),
                index_buffer: object.index_buffer(),
                count: object.vertex_count(),
                uniforms: object_uniforms(object, view),
            });
        }

        backend.end_frame()?;
        self.frames_presented += 1;

        Ok(FrameOutcome::Presented {
            draw_calls: scene.len(),
        })
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        backend::HeadlessBackend,
        camera::CameraMode,
        scene::{Transform, DEFAULT_SPHERE_SUBDIVISIONS},
    };
    use cgmath::{Matrix3, Point3, Vector3, Vector4};
    use rand::{rngs::StdRng, SeedableRng};

    const EPSILON: f32 = 1e-5;

    fn assert_matrix_near(actual: Matrix4<f32>, expected: Matrix4<f32>) {
        let a: [[f32; 4]; 4] = actual.into();
        let e: [[f32; 4]; 4] = expected.into();
        for c in 0..4 {
            for r in 0..4 {
                assert!(
                    (a[c][r] - e[c][r]).abs() < EPSILON,
                    "mismatch at column {c} row {r}: expected {:?}, got {:?}",
                    expected,
                    actual
                );
            }
        }
    }

    fn scene_and_backend() -> (HeadlessBackend, Scene) {
        let mut backend = HeadlessBackend::new(1200, 800);
        let mut rng = StdRng::seed_from_u64(11);
        let scene =
            Scene::build_default(&mut backend, &mut rng, DEFAULT_SPHERE_SUBDIVISIONS).unwrap();
        (backend, scene)
    }

    #[test]
    fn test_normal_matrix_of_rigid_view_is_its_rotation() {
        let view = look_at(Point3::new(3.0, 8.0, 6.0), CAMERA_TARGET, CAMERA_UP);
        let normal = normal_matrix(view);

        let rotation = Matrix3::from_cols(
            view.x.truncate(),
            view.y.truncate(),
            view.z.truncate(),
        );
        let upper = Matrix3::from_cols(
            normal.x.truncate(),
            normal.y.truncate(),
            normal.z.truncate(),
        );
        for (u, r) in [(upper.x, rotation.x), (upper.y, rotation.y), (upper.z, rotation.z)] {
            assert!((u - r).x.abs() < EPSILON && (u - r).y.abs() < EPSILON && (u - r).z.abs() < EPSILON);
        }
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let model = Matrix4::from_nonuniform_scale(1.0, 3.0, 1.0);
        let normal = normal_matrix(model);
        assert_matrix_near(normal, Matrix4::from_nonuniform_scale(1.0, 1.0 / 3.0, 1.0));
    }

    #[test]
    fn test_singular_model_view_gives_zero_normal_matrix() {
        let model = Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0);
        assert_eq!(normal_matrix(model), Matrix4::zero());
    }

    #[test]
    fn test_projection_follows_aspect() {
        let wide = projection_matrix(1.5);
        // x = 12 is the right edge at aspect 1.5.
        let edge = wide * Vector4::new(12.0, 8.0, -50.0, 1.0);
        assert!((edge.x - 1.0).abs() < EPSILON);
        assert!((edge.y - 1.0).abs() < EPSILON);
        assert!((edge.z - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_one_draw_per_object() {
        let (mut backend, scene) = scene_and_backend();
        let mut renderer = FrameRenderer::new();
        let mut animator = CameraAnimator::default();

        let outcome = renderer
            .render(&mut backend, &scene, &mut animator, Duration::ZERO)
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Presented { draw_calls: 6 });

        let frame = backend.last_frame().unwrap();
        assert_eq!(frame.draws.len(), 6);

        let expected = [(false, 6), (true, 36), (true, 36), (true, 36), (true, 36), (true, 216)];
        for (draw, (indexed, count)) in frame.draws.iter().zip(expected) {
            assert_eq!(draw.is_indexed(), indexed);
            assert_eq!(draw.count, count);
        }

        let sphere = frame.draws[5];
        assert_eq!(sphere.attributes.position(), sphere.attributes.normal());
    }

    #[test]
    fn test_draw_uniforms_match_object_transforms() {
        let (mut backend, scene) = scene_and_backend();
        let mut animator = CameraAnimator::default();
        FrameRenderer::new()
            .render(&mut backend, &scene, &mut animator, Duration::ZERO)
            .unwrap();

        let frame = backend.last_frame().unwrap();
        let view = frame.globals.view_matrix();
        for (draw, object) in frame.draws.iter().zip(scene.iter()) {
            let model = object.transform.model_matrix();
            assert_matrix_near(draw.uniforms.model_matrix(), model);
            assert_matrix_near(draw.uniforms.normal_matrix(), normal_matrix(view * model));
        }

        let expected_view = look_at(animator.eye(), CAMERA_TARGET, CAMERA_UP);
        assert_matrix_near(view, expected_view);
    }

    #[test]
    fn test_projection_tracks_resize() {
        let (mut backend, scene) = scene_and_backend();
        let mut renderer = FrameRenderer::new();
        let mut animator = CameraAnimator::default();

        renderer
            .render(&mut backend, &scene, &mut animator, Duration::ZERO)
            .unwrap();
        backend.resize(400, 800);
        renderer
            .render(&mut backend, &scene, &mut animator, Duration::ZERO)
            .unwrap();

        let frames = backend.frames();
        assert_matrix_near(frames[0].globals.projection_matrix(), projection_matrix(1.5));
        assert_matrix_near(frames[1].globals.projection_matrix(), projection_matrix(0.5));
        assert_eq!(frames[1].viewport, (400, 800));
    }

    #[test]
    fn test_unavailable_surface_skips_but_animates() {
        let (backend, scene) = scene_and_backend();
        let mut backend = backend.with_unavailable_frames(1);
        let mut renderer = FrameRenderer::new();
        let mut animator = CameraAnimator::default();

        let outcome = renderer
            .render(&mut backend, &scene, &mut animator, Duration::ZERO)
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert!(backend.frames().is_empty());
        assert!(animator.state().animation_param > 0.0);

        renderer
            .render(&mut backend, &scene, &mut animator, Duration::ZERO)
            .unwrap();
        assert_eq!(backend.frames().len(), 1);
        assert_eq!(renderer.frames_skipped(), 1);
        assert_eq!(renderer.frames_presented(), 1);
    }

    #[test]
    fn test_camera_switches_to_orbit_after_200_frames() {
        let (mut backend, scene) = scene_and_backend();
        let mut renderer = FrameRenderer::new();
        let mut animator = CameraAnimator::default();

        for _ in 0..200 {
            renderer
                .render(&mut backend, &scene, &mut animator, Duration::ZERO)
                .unwrap();
        }

        assert_eq!(animator.state().mode, CameraMode::Orbit);
        let expected = look_at(Point3::new(0.0, 5.0, 10.0), CAMERA_TARGET, CAMERA_UP);
        assert_matrix_near(backend.last_frame().unwrap().globals.view_matrix(), expected);
    }

    #[test]
    fn test_moved_object_changes_model_matrix() {
        let (mut backend, mut scene) = scene_and_backend();
        scene.get_mut("box0").unwrap().transform =
            Transform::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 2.0, 2.0));

        let mut animator = CameraAnimator::default();
        FrameRenderer::new()
            .render(&mut backend, &scene, &mut animator, Duration::ZERO)
            .unwrap();

        let draw = backend.last_frame().unwrap().draws[1];
        assert_matrix_near(draw.uniforms.model_matrix(), Matrix4::from_scale(2.0));
    }
}
