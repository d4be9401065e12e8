//! Texture-atlas compositor.
//!
//! Bakes a 1024×1024 terrain texture from 256×256 textures assigned to height
//! bands: each cell takes the texture of its height, tiled every 256 cells.

use log::debug;

use crate::error::{RenderError, Result};
use crate::render::WORLD_SIZE;
use crate::render::textures::{Pixmap, TextureBuffer};
use crate::world::heightmap::HeightField;

pub const BAND_TEXTURE_SIZE: u32 = 256;
const BANDS: usize = 256;

#[derive(Debug)]
pub struct Compositor {
    bands: Vec<Option<Pixmap>>,
    heightmap: Option<HeightField>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self { bands: vec![None; BANDS], heightmap: None }
    }

    /// Assigns `texture` (256×256) to cells of exactly `height`.
    pub fn add_texture(&mut self, height: i32, texture: Pixmap) -> Result<&mut Self> {
        if !(0..BANDS as i32).contains(&height) {
            return Err(RenderError::OutOfRange {
                name: "height",
                value: height as f64,
                min: 0.0,
                max: (BANDS - 1) as f64,
            });
        }
        texture.expect_size("texture", BAND_TEXTURE_SIZE, BAND_TEXTURE_SIZE)?;
        self.bands[height as usize] = Some(texture);
        Ok(self)
    }

    pub fn set_heightmap(&mut self, heightmap: HeightField) -> &mut Self {
        self.heightmap = Some(heightmap);
        self
    }

    /// Builds the terrain texture. Heights with no texture borrow the one of
    /// the nearest higher band, so a texture at 255 is required.
    pub fn composite(&self) -> Result<TextureBuffer> {
        let top = self.bands[BANDS - 1].as_ref().ok_or(RenderError::MissingTopTexture)?;

        let mut resolved: Vec<&Pixmap> = vec![top; BANDS];
        for h in (0..BANDS - 1).rev() {
            resolved[h] = self.bands[h].as_ref().unwrap_or(resolved[h + 1]);
        }

        let flat;
        let heightmap = match &self.heightmap {
            Some(hm) => hm,
            None => {
                flat = HeightField::flat(0);
                &flat
            }
        };

        let mask = BAND_TEXTURE_SIZE as usize - 1;
        let heights = heightmap.as_slice();
        let texture = Pixmap::from_fn(WORLD_SIZE as u32, WORLD_SIZE as u32, |x, y| {
            let height = heights[y as usize * WORLD_SIZE + x as usize] as usize;
            resolved[height].get(x & mask as u32, y & mask as u32).with_alpha(255)
        });
        debug!("composited terrain texture from {} bands", self.bands.iter().flatten().count());
        TextureBuffer::new(texture)
    }
}
