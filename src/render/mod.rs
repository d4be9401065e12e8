//! Voxel-space renderer.
//!
//! Re-exports:
//! - `color`: RGBA colour and alpha blend
//! - `textures`: pixmaps, terrain texture buffer and sky panorama
//! - `framebuffer`: 320×200 CPU framebuffer
//! - `tables`: trig, inverse-distortion and ray-length lookup tables
//! - `casters`: per-column ray caster
//! - `render3d`: terrain pass over every column
//! - `sky`: sky slice and fog gradient
//! - `sprites`: billboard projection, sorting and painting
//! - `present`: offscreen → frame compositing with sub-pixel smoothing
//! - `atlas`: height-banded texture compositor
//! - `renderer`: the `Renderer` context tying it all together

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

pub mod atlas;
pub mod casters;
pub mod color;
pub mod framebuffer;
pub mod present;
pub mod render3d;
pub mod renderer;
pub mod sky;
pub mod sprites;
pub mod tables;
pub mod textures;

pub const SCREEN_WIDTH: usize = 320;
pub const SCREEN_HEIGHT: usize = 200;
/// Horizontal field of view in degrees.
pub const ANGLE_OF_VIEW: f64 = 60.0;
pub const ANGLE_UNITS_PER_DEGREE: f64 = SCREEN_WIDTH as f64 / ANGLE_OF_VIEW;
pub const DEGREES_PER_UNIT: f64 = ANGLE_OF_VIEW / SCREEN_WIDTH as f64;
pub const HALF_FOV_UNITS: usize = SCREEN_WIDTH / 2;
/// 360° en unidades escaladas.
pub const FULL_CIRCLE_UNITS: usize = 1920;

pub const SCALE_FACTOR: f64 = 35.0;
pub const PROJECTION_DISTANCE: f64 = 75.0;
/// Nearest row scanned by the caster; rows run 299 (near) down to 0 (far).
pub const MAXIMUM_ROW: usize = SCREEN_HEIGHT + SCREEN_HEIGHT / 2 - 1;
pub const ROW_COUNT: usize = MAXIMUM_ROW + 1;

pub const MIN_CAMERA_Y: i32 = 200;
pub const MAX_CAMERA_Y: i32 = 300;
pub const DEFAULT_CAMERA_Y: i32 = MIN_CAMERA_Y;

pub const DEFAULT_WATER_HEIGHT: u8 = 64;
/// Row count over which fog goes from clear to fully fogged.
pub const FOG_DEPTH: f64 = 100.0;
pub const SPRITE_VISIBILITY_RADIUS: f64 = 400.0;

pub const WORLD_SIZE: usize = 1024;
/// Home tile `[HOME_MIN, HOME_MAX)` on both axes.
pub const HOME_MIN: i64 = WORLD_SIZE as i64;
pub const HOME_MAX: i64 = 2 * WORLD_SIZE as i64;

pub const SKY_WIDTH: usize = FULL_CIRCLE_UNITS;
pub const SKY_HEIGHT: usize = 100;

/// Vertical position of the horizon for `row` at camera height `h`.
#[inline]
pub fn vertical_center_offset(camera_y: i32, row: usize) -> i32 {
    SKY_HEIGHT as i32 - (camera_y - MIN_CAMERA_Y) + row as i32
}

#[inline]
pub fn in_home_tile(x: i64, z: i64) -> bool {
    (HOME_MIN..HOME_MAX).contains(&x) && (HOME_MIN..HOME_MAX).contains(&z)
}

/// Optional rendering features toggled on the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Fog,
    ReflectionMap,
    Smooth,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::Fog, Capability::ReflectionMap, Capability::Smooth];

    pub fn name(self) -> &'static str {
        match self {
            Capability::Fog => "fog",
            Capability::ReflectionMap => "reflection-map",
            Capability::Smooth => "smooth",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| RenderError::UnknownCapability(s.to_string()))
    }
}

/// Horizontal sampling density: how many screen columns each ray covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            Quality::Low => 4,
            Quality::Medium => 2,
            Quality::High => 1,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        })
    }
}

impl FromStr for Quality {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            _ => Err(RenderError::InvalidQuality(s.to_string())),
        }
    }
}
