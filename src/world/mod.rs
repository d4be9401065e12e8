//! World state: camera, height field and sprites.

pub mod camera;
pub mod heightmap;
pub mod sprite;

pub use camera::{Camera, CameraPose, CameraUpdate};
pub use heightmap::HeightField;
pub use sprite::Sprite;
