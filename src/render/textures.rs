//! Typed pixel buffers: generic pixmaps, the terrain texture buffer and the
//! sky panorama. Dimensions are checked once, at construction.

use crate::error::{RenderError, Result};
use crate::render::color::Rgba;
use crate::render::{SKY_HEIGHT, SKY_WIDTH, WORLD_SIZE};

/// Un pixmap inmutable (CPU) para samplear por pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Pixmap {
    w: u32,
    h: u32,
    px: Vec<Rgba>,
}

impl Pixmap {
    /// Builds a pixmap from row-major pixels; `px.len()` must equal `w * h`.
    pub fn new(w: u32, h: u32, px: Vec<Rgba>) -> Result<Self> {
        if w == 0 || h == 0 {
            return Err(RenderError::InvalidDimensions {
                what: "pixmap",
                expected_width: w.max(1),
                expected_height: h.max(1),
                width: w,
                height: h,
            });
        }
        let expected = w as usize * h as usize;
        if px.len() != expected {
            return Err(RenderError::InvalidLength {
                what: "pixmap pixels",
                expected,
                actual: px.len(),
            });
        }
        Ok(Self { w, h, px })
    }

    /// Builds a pixmap from tightly packed RGBA8 bytes.
    pub fn from_rgba8(w: u32, h: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(RenderError::InvalidLength {
                what: "pixmap bytes",
                expected: w as usize * h as usize * 4,
                actual: bytes.len(),
            });
        }
        let px: &[Rgba] = bytemuck::cast_slice(bytes);
        Self::new(w, h, px.to_vec())
    }

    pub fn filled(w: u32, h: u32, color: Rgba) -> Self {
        let w = w.max(1);
        let h = h.max(1);
        Self { w, h, px: vec![color; (w * h) as usize] }
    }

    /// Builds a pixmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: u32, h: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let w = w.max(1);
        let h = h.max(1);
        let mut px = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                px.push(f(x, y));
            }
        }
        Self { w, h, px }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.h
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.px
    }

    /// Pixel at `(x, y)`; callers keep coordinates in range.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.px[(y as usize * self.w as usize) + x as usize]
    }

    /// Pixel at `(x, y)` with both coordinates wrapped.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Rgba {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[(yi * self.w as usize) + xi]
    }

    pub(crate) fn expect_size(&self, what: &'static str, w: u32, h: u32) -> Result<()> {
        if self.w != w || self.h != h {
            return Err(RenderError::InvalidDimensions {
                what,
                expected_width: w,
                expected_height: h,
                width: self.w,
                height: self.h,
            });
        }
        Ok(())
    }
}

/// The 1024×1024 terrain texture, sampled with the same wrapped `(u, v)` as
/// the height field. Stored fully opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureBuffer {
    pixmap: Pixmap,
}

impl TextureBuffer {
    pub fn new(pixmap: Pixmap) -> Result<Self> {
        pixmap.expect_size("texturemap", WORLD_SIZE as u32, WORLD_SIZE as u32)?;
        let mut pixmap = pixmap;
        for p in pixmap.px.iter_mut() {
            p.a = 255;
        }
        Ok(Self { pixmap })
    }

    pub fn filled(color: Rgba) -> Self {
        Self { pixmap: Pixmap::filled(WORLD_SIZE as u32, WORLD_SIZE as u32, color.with_alpha(255)) }
    }

    /// Texel at wrapped world cell `(x, z)`.
    #[inline]
    pub fn sample(&self, x: i64, z: i64) -> Rgba {
        let u = x.rem_euclid(WORLD_SIZE as i64) as usize;
        let v = z.rem_euclid(WORLD_SIZE as i64) as usize;
        self.pixmap.px[(v << 10) + u]
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Cylindrical 1920×100 sky; x spans the full 360° of yaw.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyPanorama {
    pixmap: Pixmap,
}

impl SkyPanorama {
    pub fn new(pixmap: Pixmap) -> Result<Self> {
        pixmap.expect_size("sky", SKY_WIDTH as u32, SKY_HEIGHT as u32)?;
        Ok(Self { pixmap })
    }

    pub fn filled(color: Rgba) -> Self {
        Self { pixmap: Pixmap::filled(SKY_WIDTH as u32, SKY_HEIGHT as u32, color) }
    }

    /// Opaque sky pixel; x wraps around the cylinder and y is clamped to the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: i32) -> Rgba {
        let y = y.clamp(0, SKY_HEIGHT as i32 - 1) as u32;
        self.pixmap.get((x % SKY_WIDTH) as u32, y).with_alpha(255)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}
