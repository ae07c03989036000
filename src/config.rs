//! Renderer configuration
//!
//! Defaults reproduce the fixed diorama. [`RendererConfig::from_env`]
//! overlays `DIORAMA_*` environment variables; values that fail to parse
//! are reported and ignored.

use std::{env, str::FromStr};

use log::warn;
use rand::{rngs::StdRng, SeedableRng};

use crate::gfx::{camera::camera_animator::AnimationTiming, scene::DEFAULT_SPHERE_SUBDIVISIONS};

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 800;

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Seed for the random object colors; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub animation: AnimationTiming,
    pub sphere_subdivisions: u16,
    pub vsync: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "diorama".to_owned(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
            animation: AnimationTiming::default(),
            sphere_subdivisions: DEFAULT_SPHERE_SUBDIVISIONS,
            vsync: true,
        }
    }
}

impl RendererConfig {
    /// Defaults overlaid with `DIORAMA_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(seed) = parse_var(&lookup, "DIORAMA_SEED") {
            self.seed = Some(seed);
        }

        if let Some(value) = lookup("DIORAMA_ANIMATION") {
            match value.trim().to_ascii_lowercase().as_str() {
                "frame" | "per-frame" => self.animation = AnimationTiming::default(),
                "wall-clock" | "wallclock" | "time" => {
                    self.animation = AnimationTiming::wall_clock()
                }
                other => warn!(
                    "ignoring DIORAMA_ANIMATION='{}', expected 'frame' or 'wall-clock'",
                    other
                ),
            }
        }

        match parse_var::<u16>(&lookup, "DIORAMA_SPHERE_SUBDIVISIONS") {
            Some(0) => warn!("ignoring DIORAMA_SPHERE_SUBDIVISIONS='0', expected at least 1"),
            Some(subdivisions) => self.sphere_subdivisions = subdivisions,
            None => {}
        }

        if let Some(value) = lookup("DIORAMA_VSYNC") {
            match parse_bool(&value) {
                Some(vsync) => self.vsync = vsync,
                None => warn!("ignoring DIORAMA_VSYNC='{}', expected a boolean", value),
            }
        }

        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_animation(mut self, animation: AnimationTiming) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_sphere_subdivisions(mut self, subdivisions: u16) -> Self {
        self.sphere_subdivisions = subdivisions;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Color generator for scene construction
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring {}='{}', not a valid value", key, value);
            None
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
