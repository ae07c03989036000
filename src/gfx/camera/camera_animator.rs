//! Scripted camera motion
//!
//! The camera alternates between two moves, each driven by a parameter
//! that runs from 0 to 1: a straight dolly across the scene, then a
//! descending half orbit. When the parameter reaches 1 it resets to 0 and
//! the next move starts.

use std::{f32::consts::PI, time::Duration};

use cgmath::Point3;

/// Parameter increment per frame in [`AnimationTiming::PerFrame`] mode.
pub const DEFAULT_FRAME_STEP: f64 = 0.005;

/// Duration of one move in [`AnimationTiming::WallClock`] mode: the time
/// 200 frames take at 60 Hz, matching the per-frame default on a 60 Hz
/// display.
pub const DEFAULT_CYCLE: Duration = Duration::from_millis(3333);

const ORBIT_RADIUS: f32 = 10.0;
const ORBIT_START_HEIGHT: f32 = 5.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CameraMode {
    /// Horizontal dolly from x = -6 to x = 6 at height 8
    LinearSweep,
    /// Half orbit of radius 10 descending from height 5 to 0
    Orbit,
}

impl CameraMode {
    /// The mode that follows this one in the two-step cycle
    pub fn next(self) -> Self {
        match self {
            CameraMode::LinearSweep => CameraMode::Orbit,
            CameraMode::Orbit => CameraMode::LinearSweep,
        }
    }
}

/// How the animation parameter advances
///
/// `PerFrame` ties the animation speed to the frame rate: every rendered
/// frame adds a fixed step no matter how long it took. That is the default.
/// `WallClock` advances by elapsed time instead, so one move always takes
/// `cycle` regardless of the refresh rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AnimationTiming {
    PerFrame { step: f64 },
    WallClock { cycle: Duration },
}

impl AnimationTiming {
    pub fn wall_clock() -> Self {
        AnimationTiming::WallClock {
            cycle: DEFAULT_CYCLE,
        }
    }

    fn increment(&self, elapsed: Duration) -> f64 {
        match *self {
            AnimationTiming::PerFrame { step } => step,
            // A zero cycle finishes a move on every tick.
            AnimationTiming::WallClock { cycle } if cycle.is_zero() => 1.0,
            AnimationTiming::WallClock { cycle } => elapsed.as_secs_f64() / cycle.as_secs_f64(),
        }
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        AnimationTiming::PerFrame {
            step: DEFAULT_FRAME_STEP,
        }
    }
}

/// Animation parameter in `[0, 1)` plus the active mode
///
/// The parameter is `f64` so 200 steps of 0.005 land just above 1.0 and
/// the wrap happens on the 200th frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub animation_param: f64,
    pub mode: CameraMode,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            animation_param: 0.0,
            mode: CameraMode::LinearSweep,
        }
    }
}

impl CameraState {
    /// Eye position for the current mode and parameter
    pub fn eye(&self) -> Point3<f32> {
        let t = self.animation_param as f32;

        match self.mode {
            CameraMode::LinearSweep => Point3::new(-6.0 + t * 12.0, 8.0, 6.0),
            CameraMode::Orbit => {
                let angle = PI * t;
                Point3::new(
                    angle.sin() * ORBIT_RADIUS,
                    (1.0 - t) * ORBIT_START_HEIGHT,
                    angle.cos() * ORBIT_RADIUS,
                )
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraAnimator {
    state: CameraState,
    timing: AnimationTiming,
}

impl CameraAnimator {
    pub fn new(timing: AnimationTiming) -> Self {
        Self {
            state: CameraState::default(),
            timing,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Advances the animation by one frame
    ///
    /// `elapsed` is only consulted in wall-clock mode. Returns the new state.
    pub fn tick(&mut self, elapsed: Duration) -> CameraState {
        self.state.animation_param += self.timing.increment(elapsed);

        if self.state.animation_param >= 1.0 {
            self.state.animation_param = 0.0;
            self.state.mode = self.state.mode.next();
            log::debug!("camera switched to {:?}", self.state.mode);
        }

        self.state
    }

    /// Current eye position
    pub fn eye(&self) -> Point3<f32> {
        self.state.eye()
    }
}

impl Default for CameraAnimator {
    fn default() -> Self {
        Self::new(AnimationTiming::default())
    }
}
