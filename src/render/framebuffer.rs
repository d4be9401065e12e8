use crate::render::color::{Rgba, blend};
use crate::render::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Row-major RGBA framebuffer on the CPU.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    pub color_buffer: Vec<Rgba>,
    pub width: u32,
    pub height: u32,
    pub background_color: Rgba,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = Rgba::NEUTRAL;
        Self { color_buffer: vec![bg; size], width, height, background_color: bg }
    }

    /// The 320×200 frame the renderer draws into.
    pub fn screen() -> Self {
        Self::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_background_color(&mut self, c: Rgba) {
        self.background_color = c;
    }

    #[inline]
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    /// Pinta `color` sobre el pixel con opacidad `alpha` (0..=255).
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, alpha: i32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.color_buffer[idx] = blend(color, self.color_buffer[idx], alpha);
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    /// Fills columns `x0..x1` of rows `top..=bottom`, clipped to the buffer.
    pub fn fill_rect(&mut self, x0: usize, x1: usize, top: usize, bottom: usize, color: Rgba) {
        let w = self.width as usize;
        let x1 = x1.min(w);
        let bottom = bottom.min(self.height as usize - 1);
        if x0 >= x1 || top > bottom {
            return;
        }
        for y in top..=bottom {
            self.color_buffer[y * w + x0..y * w + x1].fill(color);
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.color_buffer
    }

    /// RGBA8 view of the pixels, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color_buffer)
    }

    /// Sube los píxeles a una textura persistente.
    #[cfg(feature = "viewer")]
    pub fn upload_to_texture(&self, tex: &mut raylib::prelude::Texture2D) {
        use raylib::core::texture::RaylibTexture2D;
        if let Err(e) = tex.update_texture(self.as_bytes()) {
            log::warn!("texture upload failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = Framebuffer::new(8, 4);
        fb.fill_rect(6, 12, 2, 40, Rgba::WHITE);
        assert_eq!(fb.get_pixel(5, 3), Rgba::NEUTRAL);
        assert_eq!(fb.get_pixel(6, 2), Rgba::WHITE);
        assert_eq!(fb.get_pixel(7, 3), Rgba::WHITE);
        assert_eq!(fb.get_pixel(7, 1), Rgba::NEUTRAL);
    }

    #[test]
    fn blend_pixel_ignores_out_of_range() {
        let mut fb = Framebuffer::new(2, 2);
        fb.blend_pixel(-1, 0, Rgba::WHITE, 255);
        fb.blend_pixel(0, 2, Rgba::WHITE, 255);
        assert!(fb.pixels().iter().all(|&p| p == Rgba::NEUTRAL));
        fb.blend_pixel(1, 1, Rgba::BLACK, 255);
        assert_eq!(fb.get_pixel(1, 1), Rgba::BLACK);
    }

    #[test]
    fn bytes_are_rgba8() {
        let mut fb = Framebuffer::new(1, 1);
        fb.set_pixel_color(0, 0, Rgba::new(1, 2, 3, 4));
        assert_eq!(fb.as_bytes(), &[1, 2, 3, 4]);
    }
}
