use std::time::Duration;

use diorama::{
    config::RendererConfig,
    gfx::{
        backend::{BufferUsage, HeadlessBackend},
        camera::CameraMode,
        context::RendererContext,
        rendering::FrameOutcome,
    },
};

fn context(seed: u64) -> RendererContext<HeadlessBackend> {
    let config = RendererConfig::default().with_seed(seed);
    RendererContext::new(HeadlessBackend::new(1200, 800), &config).unwrap()
}

#[test]
fn default_scene_uploads_consistent_buffers() {
    let context = context(2024);
    let backend = context.backend();

    for object in context.scene() {
        let attributes = object.attributes();
        let vertices = attributes.vertex_count() as usize;

        for (attribute, handle) in attributes.iter() {
            let buffer = backend.buffer(handle).unwrap();
            assert_eq!(buffer.usage, BufferUsage::Vertex);
            assert_eq!(
                buffer.to_vec3().len(),
                vertices,
                "{} {} has the wrong length",
                object.name,
                attribute
            );
        }

        if let Some(handle) = object.index_buffer() {
            let indices = backend.buffer(handle).unwrap().to_indices();
            assert_eq!(indices.len(), object.vertex_count() as usize);
            assert!(indices.iter().all(|&i| (i as usize) < vertices));
        }
    }
}

#[test]
fn box_normals_are_flat_per_face() {
    let context = context(3);
    let cube = context.scene().get("box2").unwrap();
    let normals = context
        .backend()
        .buffer(cube.attributes().normal())
        .unwrap()
        .to_vec3();

    assert_eq!(normals.len(), 24);
    for face in normals.chunks(4) {
        assert!(face.iter().all(|n| *n == face[0]));
        let length: f32 = face[0].iter().map(|c| c * c).sum();
        assert_eq!(length, 1.0);
    }
}

#[test]
fn sphere_vertices_lie_on_unit_sphere() {
    let context = context(4);
    let sphere = context.scene().get("sphere").unwrap();
    let positions = context
        .backend()
        .buffer(sphere.attributes().position())
        .unwrap()
        .to_vec3();

    assert_eq!(positions.len(), 49);
    for [x, y, z] in positions {
        let length = (x * x + y * y + z * z).sqrt();
        assert!((length - 1.0).abs() < 1e-5);
    }
}

#[test]
fn animation_runs_through_both_modes() {
    let mut context = context(5);
    let mut modes = Vec::new();

    for _ in 0..400 {
        let outcome = context.render_frame_with_elapsed(Duration::ZERO).unwrap();
        assert_eq!(outcome, FrameOutcome::Presented { draw_calls: 6 });
        let mode = context.animator().state().mode;
        if modes.last() != Some(&mode) {
            modes.push(mode);
        }
    }

    assert_eq!(
        modes,
        [CameraMode::LinearSweep, CameraMode::Orbit, CameraMode::LinearSweep]
    );
    assert_eq!(context.backend().frames().len(), 400);
    assert_eq!(context.frame_renderer().frames_presented(), 400);
}
