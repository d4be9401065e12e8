//! Toroidal 1024×1024 height field.

use crate::error::{RenderError, Result};
use crate::render::WORLD_SIZE;
use crate::render::textures::Pixmap;

/// Base height written by mask stamping before the scaled red channel is added.
pub const MASK_BASE_HEIGHT: f64 = 192.0;

#[derive(Clone, PartialEq, Eq)]
pub struct HeightField {
    data: Box<[u8]>,
}

impl std::fmt::Debug for HeightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightField").field("len", &self.data.len()).finish()
    }
}

impl HeightField {
    pub const LEN: usize = WORLD_SIZE * WORLD_SIZE;

    /// Takes row-major heights (`z * 1024 + x`); exactly 1024×1024 values.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.len() != Self::LEN {
            return Err(RenderError::InvalidLength {
                what: "heightmap",
                expected: Self::LEN,
                actual: data.len(),
            });
        }
        Ok(Self { data: data.into_boxed_slice() })
    }

    pub fn flat(height: u8) -> Self {
        Self { data: vec![height; Self::LEN].into_boxed_slice() }
    }

    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(Self::LEN);
        for z in 0..WORLD_SIZE {
            for x in 0..WORLD_SIZE {
                data.push(f(x, z));
            }
        }
        Self { data: data.into_boxed_slice() }
    }

    /// Reads a greyscale 1024×1024 image; the red channel is the height.
    pub fn from_pixmap(pixmap: &Pixmap) -> Result<Self> {
        pixmap.expect_size("heightmap", WORLD_SIZE as u32, WORLD_SIZE as u32)?;
        Ok(Self { data: pixmap.pixels().iter().map(|p| p.r).collect() })
    }

    /// Height at world cell `(x, z)`, wrapped on both axes.
    #[inline]
    pub fn sample(&self, x: i64, z: i64) -> u8 {
        let u = x.rem_euclid(WORLD_SIZE as i64) as usize;
        let v = z.rem_euclid(WORLD_SIZE as i64) as usize;
        self.data[(v << 10) + u]
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Stamps `mask` with its top-left corner at world cell `(x, z)`. Every
    /// mask pixel with non-zero alpha sets the height to `192 + red * scale`,
    /// saturating at 255.
    pub fn stamp_mask(&mut self, mask: &Pixmap, x: i64, z: i64, scale: f64) -> Result<()> {
        if !scale.is_finite() {
            return Err(RenderError::NotANumber { name: "scale factor" });
        }
        if scale < 0.0 {
            return Err(RenderError::OutOfRange { name: "scale factor", value: scale, min: 0.0, max: f64::INFINITY });
        }
        for my in 0..mask.height() {
            for mx in 0..mask.width() {
                let p = mask.get(mx, my);
                if p.a == 0 {
                    continue;
                }
                let u = (x + mx as i64).rem_euclid(WORLD_SIZE as i64) as usize;
                let v = (z + my as i64).rem_euclid(WORLD_SIZE as i64) as usize;
                let h = (MASK_BASE_HEIGHT + p.r as f64 * scale).min(255.0);
                self.data[(v << 10) + u] = h as u8;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::Rgba;

    #[test]
    fn rejects_wrong_length() {
        let err = HeightField::new(vec![0; 10]).unwrap_err();
        assert_eq!(err, RenderError::InvalidLength { what: "heightmap", expected: HeightField::LEN, actual: 10 });
    }

    #[test]
    fn sample_wraps_negative_and_large_coords() {
        let hf = HeightField::from_fn(|x, z| ((x + 3 * z) % 251) as u8);
        assert_eq!(hf.sample(5, 9), hf.sample(5 + 1024, 9 + 2048));
        assert_eq!(hf.sample(-1, -1), hf.sample(1023, 1023));
        assert_eq!(hf.sample(1024 + 5, 1024 + 9), ((5 + 27) % 251) as u8);
    }

    #[test]
    fn from_pixmap_uses_red_channel() {
        let p = Pixmap::from_fn(1024, 1024, |x, _| Rgba::opaque((x % 256) as u8, 7, 7));
        let hf = HeightField::from_pixmap(&p).unwrap();
        assert_eq!(hf.sample(300, 0), 44);
        assert!(HeightField::from_pixmap(&Pixmap::filled(4, 4, Rgba::WHITE)).is_err());
    }

    #[test]
    fn stamp_mask_skips_transparent_and_saturates() {
        let mut hf = HeightField::flat(10);
        let mask = Pixmap::new(
            3,
            1,
            vec![Rgba::new(10, 0, 0, 255), Rgba::new(200, 0, 0, 0), Rgba::new(200, 0, 0, 1)],
        )
        .unwrap();
        hf.stamp_mask(&mask, 1023, 4, 2.0).unwrap();
        assert_eq!(hf.sample(1023, 4), 212);
        assert_eq!(hf.sample(0, 4), 10);
        assert_eq!(hf.sample(1, 4), 255);
        assert!(hf.stamp_mask(&mask, 0, 0, -1.0).is_err());
        assert!(hf.stamp_mask(&mask, 0, 0, f64::NAN).is_err());
    }
}
