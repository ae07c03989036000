pub mod camera_animator;
pub mod camera_utils;

// Re-export main types
pub use camera_animator::{AnimationTiming, CameraAnimator, CameraMode, CameraState};
pub use camera_utils::{GlobalUniforms, CAMERA_TARGET, CAMERA_UP};
