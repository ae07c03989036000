use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};

/// Remaps OpenGL clip-space depth `[-1, 1]` to wgpu's `[0, 1]`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Point every camera pose looks at.
pub const CAMERA_TARGET: Point3<f32> = Point3 {
    x: 0.0,
    y: 0.75,
    z: 0.0,
};

/// World up vector shared by every camera pose.
pub const CAMERA_UP: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// Right-handed look-at view matrix
pub fn look_at(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::look_at_rh(eye, target, up)
}

/// Orthographic projection for wgpu clip space
///
/// Takes the OpenGL-style box (`near`/`far` as positive distances along
/// the view direction) and corrects the depth range.
pub fn orthographic(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX * cgmath::ortho(left, right, bottom, top, near, far)
}

/// Per-frame uniforms shared by every object.
///
/// MUST match the `Globals` struct in the vertex shader exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl GlobalUniforms {
    pub fn new(projection: Matrix4<f32>, view: Matrix4<f32>) -> Self {
        Self {
            projection: projection.into(),
            view: view.into(),
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.into()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view.into()
    }
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_look_at_and_ortho_center_the_origin() {
        let view = look_at(Point3::new(0.0, 0.0, 10.0), Point3::new(0.0, 0.0, 0.0), CAMERA_UP);
        let projection = orthographic(-4.0, 4.0, -4.0, 4.0, 0.0, 20.0);

        let clip = projection * view * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        // Halfway through a depth range of [0, 1].
        assert!((ndc.z - 0.5).abs() < 1e-6, "depth was {}", ndc.z);
    }

    #[test]
    fn test_depth_range_is_zero_to_one() {
        let projection = orthographic(-1.0, 1.0, -1.0, 1.0, 0.0, 100.0);

        let near = projection * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let far = projection * Vector4::new(0.0, 0.0, -100.0, 1.0);

        assert!(near.z.abs() < 1e-6);
        assert!((far.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_round_trips_matrices() {
        let view = look_at(Point3::new(3.0, 4.0, 5.0), CAMERA_TARGET, CAMERA_UP);
        let uniforms = GlobalUniforms::new(Matrix4::identity(), view);
        assert_eq!(uniforms.view_matrix(), view);
        assert_eq!(std::mem::size_of::<GlobalUniforms>(), 128);
    }
}
