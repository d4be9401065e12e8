use raylib::prelude::*;

use voxelscape::render::{MAX_CAMERA_Y, MIN_CAMERA_Y};
use voxelscape::{CameraPose, CameraUpdate};

pub struct Player {
    pub x: f32,
    pub z: f32,
    pub y: f32,
    pub a: f32,            // yaw en grados
    pub speed_walk: f32,
    pub speed_sprint: f32,
    pub turn_speed: f32,   // grados por segundo
    pub climb_speed: f32,
    pub sprinting: bool,
}

impl Player {
    pub fn new(pose: CameraPose) -> Self {
        Self {
            x: pose.x as f32,
            z: pose.z as f32,
            y: pose.y as f32,
            a: pose.angle as f32,
            speed_walk: 120.0,
            speed_sprint: 260.0,
            turn_speed: 90.0,
            climb_speed: 60.0,
            sprinting: false,
        }
    }

    /// Flechas o WASD para girar y avanzar, Q/E para subir y bajar, Shift corre.
    pub fn update(&mut self, window: &RaylibHandle, dt: f32) {
        self.sprinting = window.is_key_down(KeyboardKey::KEY_LEFT_SHIFT);
        let speed = if self.sprinting { self.speed_sprint } else { self.speed_walk };

        if window.is_key_down(KeyboardKey::KEY_LEFT) || window.is_key_down(KeyboardKey::KEY_A) {
            self.a -= self.turn_speed * dt;
        }
        if window.is_key_down(KeyboardKey::KEY_RIGHT) || window.is_key_down(KeyboardKey::KEY_D) {
            self.a += self.turn_speed * dt;
        }
        self.a = self.a.rem_euclid(360.0);

        let mut step = 0.0;
        if window.is_key_down(KeyboardKey::KEY_UP) || window.is_key_down(KeyboardKey::KEY_W) {
            step += speed * dt;
        }
        if window.is_key_down(KeyboardKey::KEY_DOWN) || window.is_key_down(KeyboardKey::KEY_S) {
            step -= speed * dt;
        }
        let rad = self.a.to_radians();
        self.x += rad.cos() * step;
        self.z += rad.sin() * step;

        if window.is_key_down(KeyboardKey::KEY_E) {
            self.y += self.climb_speed * dt;
        }
        if window.is_key_down(KeyboardKey::KEY_Q) {
            self.y -= self.climb_speed * dt;
        }
        self.y = self.y.clamp(MIN_CAMERA_Y as f32, MAX_CAMERA_Y as f32);
    }

    pub fn camera_update(&self) -> CameraUpdate {
        CameraUpdate::new()
            .angle(self.a as f64)
            .x(self.x as f64)
            .y(self.y as f64)
            .z(self.z as f64)
    }
}
