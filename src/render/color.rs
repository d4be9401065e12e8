//! RGBA colour and the alpha blend shared by terrain, sky, fog and sprites.

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};

use crate::error::{RenderError, Result};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    /// Gris neutro: fondo del frame, niebla por defecto y relleno fuera de mapa.
    pub const NEUTRAL: Rgba = Rgba::opaque(0x7f, 0x7f, 0x7f);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Parses `#rrggbb` (case-insensitive); anything else is rejected.
    pub fn from_hex(text: &str) -> Result<Self> {
        let invalid = || RenderError::InvalidColor(text.to_string());
        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgba::opaque(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Rgba {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        Rgba::from_hex(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[inline]
fn mix_channel(src: u8, dst: u8, alpha: u32) -> u8 {
    if src == dst {
        return src;
    }
    // Cada término se trunca por separado.
    let s = src as u32 * alpha / 255;
    let d = dst as u32 * (255 - alpha) / 255;
    (s + d) as u8
}

/// Blends `src` over `dst` with `alpha` (clamped to 0..=255). The result is
/// always opaque.
#[inline]
pub fn blend(src: Rgba, dst: Rgba, alpha: i32) -> Rgba {
    let alpha = alpha.clamp(0, 255) as u32;
    Rgba::opaque(
        mix_channel(src.r, dst.r, alpha),
        mix_channel(src.g, dst.g, alpha),
        mix_channel(src.b, dst.b, alpha),
    )
}

/// Converts a 0.0..=1.0 opacity into a blend alpha, truncating.
#[inline]
pub fn alpha_from_fraction(fraction: f64) -> i32 {
    (fraction * 255.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        let a = Rgba::opaque(200, 10, 33);
        let b = Rgba::opaque(7, 250, 128);
        assert_eq!(blend(a, b, 255), a);
        assert_eq!(blend(a, b, 0), b);
        assert_eq!(blend(a, b, 1000), a);
        assert_eq!(blend(a, b, -5), b);
    }

    #[test]
    fn blend_truncates_each_term() {
        // 100*128/255 = 50.19 -> 50, 200*127/255 = 99.6 -> 99
        let out = blend(Rgba::opaque(100, 0, 0), Rgba::opaque(200, 0, 0), 128);
        assert_eq!(out.r, 149);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn blend_of_equal_colours_is_identity() {
        let c = Rgba::opaque(1, 2, 3);
        for alpha in 0..=255 {
            assert_eq!(blend(c, c, alpha), c);
        }
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgba::from_hex("#ff8000").unwrap(), Rgba::opaque(255, 128, 0));
        assert_eq!("#A0b0C0".parse::<Rgba>().unwrap(), Rgba::opaque(0xa0, 0xb0, 0xc0));
        for bad in ["ff8000", "#ff800", "#ff80001", "#gg0000", "", "#"] {
            assert!(matches!(Rgba::from_hex(bad), Err(RenderError::InvalidColor(_))), "{bad}");
        }
        assert_eq!(Rgba::opaque(255, 128, 0).to_string(), "#ff8000");
    }
}
