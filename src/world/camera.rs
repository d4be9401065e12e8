//! Camera model: yaw, world position and height.
//!
//! The yaw is stored in scaled angle units (320 units per 60° field of view);
//! degrees only appear at the public boundary.

use serde::{Deserialize, Serialize};

use crate::render::{
    ANGLE_OF_VIEW, DEFAULT_CAMERA_Y, DEGREES_PER_UNIT, FULL_CIRCLE_UNITS, HALF_FOV_UNITS,
    MAX_CAMERA_Y, MIN_CAMERA_Y, SCREEN_WIDTH,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    angle: f64,
    x: i32,
    y: i32,
    z: i32,
}

/// Partial camera update; `None` or non-finite fields are left unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraUpdate {
    /// Yaw in degrees.
    pub angle: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl CameraUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }
}

/// Camera as reported to callers: yaw in whole degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CameraPose {
    pub angle: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { angle: 0.0, x: 0, y: DEFAULT_CAMERA_Y, z: 0 }
    }
}

#[inline]
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a partial update. Returns true when a new height was accepted.
    pub fn apply(&mut self, update: &CameraUpdate) -> bool {
        if let Some(degrees) = finite(update.angle) {
            let whole = degrees.round().rem_euclid(360.0);
            // Multiplicar antes de dividir: 90° da exactamente 480.
            self.angle = whole * SCREEN_WIDTH as f64 / ANGLE_OF_VIEW;
        }
        if let Some(x) = finite(update.x) {
            self.x = x.round() as i32;
        }
        if let Some(z) = finite(update.z) {
            self.z = z.round() as i32;
        }
        match finite(update.y) {
            Some(y) if (MIN_CAMERA_Y as f64..=MAX_CAMERA_Y as f64).contains(&y) => {
                self.y = y.round() as i32;
                true
            }
            _ => false,
        }
    }

    pub fn pose(&self) -> CameraPose {
        let degrees = self.angle / FULL_CIRCLE_UNITS as f64 * 360.0;
        CameraPose { angle: degrees.round() as i32 % 360, x: self.x, y: self.y, z: self.z }
    }

    /// Yaw in scaled units, `[0, 1920)`.
    #[inline]
    pub fn angle_units(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Scaled angle of the left screen edge, wrapped into `[0, 1920)`.
    pub fn view_start_units(&self) -> f64 {
        let start = self.angle - HALF_FOV_UNITS as f64;
        if start < 0.0 { start + FULL_CIRCLE_UNITS as f64 } else { start }
    }

    /// Unit forward vector `(x, z)`.
    pub fn forward(&self) -> (f64, f64) {
        let radians = (self.angle * DEGREES_PER_UNIT).to_radians();
        (radians.cos(), radians.sin())
    }
}
