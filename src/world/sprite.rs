//! Billboard sprites placed in the home tile.

use std::sync::Arc;

use crate::error::{RenderError, Result};
use crate::render::textures::Pixmap;
use crate::render::{HOME_MAX, HOME_MIN, WORLD_SIZE};

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub image: Arc<Pixmap>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sprite {
    /// x and z must lie in the home tile `[1024, 2048)`; y in `[0, 1024)`.
    pub fn new(image: impl Into<Arc<Pixmap>>, x: f64, y: f64, z: f64) -> Result<Self> {
        let x = RenderError::check_half_open("x", x, HOME_MIN as f64, HOME_MAX as f64)?;
        let y = RenderError::check_half_open("y", y, 0.0, WORLD_SIZE as f64)?;
        let z = RenderError::check_half_open("z", z, HOME_MIN as f64, HOME_MAX as f64)?;
        Ok(Self { image: image.into(), x, y, z })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::Rgba;

    #[test]
    fn position_is_validated() {
        let img = Arc::new(Pixmap::filled(4, 4, Rgba::WHITE));
        assert!(Sprite::new(img.clone(), 1024.0, 0.0, 2047.9).is_ok());
        assert_eq!(
            Sprite::new(img.clone(), 2048.0, 0.0, 1500.0).unwrap_err(),
            RenderError::OutOfRange { name: "x", value: 2048.0, min: 1024.0, max: 2048.0 }
        );
        assert!(Sprite::new(img.clone(), 1500.0, 1024.0, 1500.0).is_err());
        assert!(Sprite::new(img.clone(), 1500.0, 0.0, 1023.0).is_err());
        assert_eq!(
            Sprite::new(img, 1500.0, f64::NAN, 1500.0).unwrap_err(),
            RenderError::NotANumber { name: "y" }
        );
    }
}
