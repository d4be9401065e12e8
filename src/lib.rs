//! Voxel-space terrain renderer.
//!
//! Casts one ray per screen column over a toroidal 1024×1024 height field,
//! draws a cylindrical sky panorama behind it and places billboard sprites
//! with the same perspective. The output is a 320×200 RGBA frame.

pub mod config;
pub mod error;
pub mod render;
pub mod world;

pub use config::{ConfigError, SceneConfig};
pub use error::{RenderError, Result};
pub use render::color::Rgba;
pub use render::framebuffer::Framebuffer;
pub use render::renderer::Renderer;
pub use render::textures::Pixmap;
pub use render::{Capability, Quality};
pub use world::{CameraPose, CameraUpdate, HeightField};
