use std::fmt;

use cgmath::Vector3;
use log::info;
use rand::Rng;

use super::{object::SceneObject, transform::Transform};
use crate::{
    error::Result,
    gfx::{
        backend::GraphicsBackend,
        geometry::{generate_box, generate_plane, generate_sphere},
    },
};

/// Sphere tessellation used when nothing else is configured
pub const DEFAULT_SPHERE_SUBDIVISIONS: u16 = 6;

/// Box placements of the default scene as `(center, scale)`
const DEFAULT_BOXES: [([f32; 3], [f32; 3]); 4] = [
    ([1.5, 1.5, 0.0], [1.0, 3.0, 1.0]),
    ([-1.5, 0.75, 0.0], [1.0, 1.5, 1.0]),
    ([0.0, 0.5, 1.5], [2.0, 1.0, 1.0]),
    ([0.0, 0.5, -1.5], [2.0, 1.0, 1.0]),
];

const SPHERE_CENTER: [f32; 3] = [0.0, 1.0, 0.0];

/// Ordered collection of scene objects
///
/// Insertion order is draw order. The scene is built once at startup and
/// its buffers never change afterwards.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the fixed diorama: a ground plane, four boxes and a sphere
    ///
    /// Object names are `plane`, `box0` to `box3` and `sphere`, in draw
    /// order. Any upload failure aborts construction.
    pub fn build_default<B, R>(backend: &mut B, rng: &mut R, sphere_subdivisions: u16) -> Result<Self>
    where
        B: GraphicsBackend + ?Sized,
        R: Rng,
    {
        let mut scene = Scene::new();

        let plane = generate_plane(rng);
        scene.add(SceneObject::upload(
            backend,
            "plane",
            Transform::default(),
            &plane,
            false,
        )?);

        for (i, (center, scale)) in DEFAULT_BOXES.iter().enumerate() {
            scene.add(make_box(backend, rng, &format!("box{i}"), *center, *scale)?);
        }

        let sphere = generate_sphere(sphere_subdivisions);
        scene.add(SceneObject::upload(
            backend,
            "sphere",
            Transform::new(SPHERE_CENTER.into(), Vector3::new(1.0, 1.0, 1.0)),
            &sphere,
            true,
        )?);

        info!("scene ready: {}", scene.statistics());
        Ok(scene)
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Finds an object by name
    pub fn get(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    /// Mutable access for moving an object after construction
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.name == name)
    }

    pub fn statistics(&self) -> SceneStatistics {
        self.objects
            .iter()
            .fold(SceneStatistics::default(), |mut stats, object| {
                stats.objects += 1;
                stats.vertices += object.attributes().vertex_count() as usize;
                stats.triangles += object.triangle_count() as usize;
                if object.is_indexed() {
                    stats.indexed_objects += 1;
                }
                stats
            })
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a SceneObject;
    type IntoIter = std::slice::Iter<'a, SceneObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

/// Places a unit box with `center` and `scale` on its transform
///
/// The vertex data always stays the unit box.
pub fn make_box<B, R>(
    backend: &mut B,
    rng: &mut R,
    name: &str,
    center: [f32; 3],
    scale: [f32; 3],
) -> Result<SceneObject>
where
    B: GraphicsBackend + ?Sized,
    R: Rng,
{
    let geometry = generate_box(rng);
    SceneObject::upload(
        backend,
        name,
        Transform::new(center.into(), scale.into()),
        &geometry,
        false,
    )
}

/// Totals over every object in a scene
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SceneStatistics {
    pub objects: usize,
    pub indexed_objects: usize,
    pub vertices: usize,
    pub triangles: usize,
}

impl fmt::Display for SceneStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects ({} indexed), {} vertices, {} triangles",
            self.objects, self.indexed_objects, self.vertices, self.triangles
        )
    }
}
