//! Composites the offscreen terrain buffer over the frame.

use crate::render::color::blend;
use crate::render::framebuffer::Framebuffer;

/// Half-pixel vertical average used by sub-pixel smoothing.
const HALF: i32 = 128;

/// Copies every opaque pixel of `offscreen` onto `frame`. With `smooth`, the
/// offscreen image is shifted up half a pixel: frame row `y` averages
/// offscreen rows `y` and `y + 1`, and a pixel covered by only one of them is
/// blended half over what is already in the frame.
pub fn present(frame: &mut Framebuffer, offscreen: &Framebuffer, smooth: bool) {
    let w = frame.width.min(offscreen.width);
    let h = frame.height.min(offscreen.height);
    for y in 0..h {
        for x in 0..w {
            let upper = offscreen.get_pixel(x, y);
            if !smooth {
                if upper.is_opaque() {
                    frame.set_pixel_color(x, y, upper);
                }
                continue;
            }
            let lower = if y + 1 < offscreen.height { Some(offscreen.get_pixel(x, y + 1)) } else { None };
            let lower = lower.filter(|p| p.is_opaque());
            match (upper.is_opaque(), lower) {
                (true, Some(lower)) => frame.set_pixel_color(x, y, blend(upper, lower, HALF)),
                (true, None) => frame.blend_pixel(x as i32, y as i32, upper, HALF),
                (false, Some(lower)) => frame.blend_pixel(x as i32, y as i32, lower, HALF),
                (false, None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::Rgba;

    fn offscreen_with(rows: &[(u32, Rgba)]) -> Framebuffer {
        let mut off = Framebuffer::new(4, 4);
        off.set_background_color(Rgba::TRANSPARENT);
        off.clear();
        for &(y, c) in rows {
            off.fill_rect(0, 4, y as usize, y as usize, c);
        }
        off
    }

    #[test]
    fn without_smoothing_copies_opaque_pixels() {
        let off = offscreen_with(&[(2, Rgba::WHITE)]);
        let mut frame = Framebuffer::new(4, 4);
        present(&mut frame, &off, false);
        assert_eq!(frame.get_pixel(1, 2), Rgba::WHITE);
        assert_eq!(frame.get_pixel(1, 1), Rgba::NEUTRAL);
        assert_eq!(frame.get_pixel(1, 3), Rgba::NEUTRAL);
    }

    #[test]
    fn smoothing_averages_adjacent_rows() {
        let off = offscreen_with(&[(2, Rgba::WHITE), (3, Rgba::BLACK)]);
        let mut frame = Framebuffer::new(4, 4);
        frame.set_background_color(Rgba::BLACK);
        frame.clear();
        present(&mut frame, &off, true);
        // row 1: only row 2 is covered -> white blended half over black
        assert_eq!(frame.get_pixel(0, 1), Rgba::opaque(128, 128, 128));
        // row 2: white over black, average
        assert_eq!(frame.get_pixel(0, 2), Rgba::opaque(128, 128, 128));
        // row 3: last row, black half over black
        assert_eq!(frame.get_pixel(0, 3), Rgba::BLACK);
        assert_eq!(frame.get_pixel(0, 0), Rgba::BLACK);
    }
}
