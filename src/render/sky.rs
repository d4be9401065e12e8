//! Sky pass: copies the visible 320-wide slice of the panorama and, with fog,
//! washes it toward the fog colour near the horizon.

use crate::render::color::{Rgba, alpha_from_fraction, blend};
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::SkyPanorama;
use crate::render::{FOG_DEPTH, MIN_CAMERA_Y, SCREEN_WIDTH, SKY_HEIGHT, SKY_WIDTH};
use crate::world::camera::Camera;

/// Rows of sky visible above the horizon at camera height `camera_y`.
#[inline]
pub fn sky_height(camera_y: i32) -> usize {
    (SKY_HEIGHT as i32 - (camera_y - MIN_CAMERA_Y)).clamp(0, SKY_HEIGHT as i32) as usize
}

/// First panorama row shown.
#[inline]
pub fn sky_source_row(camera_y: i32) -> usize {
    (camera_y - MIN_CAMERA_Y).max(0) as usize
}

/// Fog over sky row `y`: linear from `1 - height / FOG_DEPTH` on the top row
/// to 1 on the horizon row `height - 1`.
pub fn sky_fog_opacity(y: usize, height: usize) -> f64 {
    if height <= 1 {
        return 1.0;
    }
    let top = 1.0 - height as f64 / FOG_DEPTH;
    top + (1.0 - top) * y as f64 / (height - 1) as f64
}

fn blit(frame: &mut Framebuffer, sky: &SkyPanorama, sx: usize, sy: usize, w: usize, h: usize, dx: usize) {
    for row in 0..h {
        for col in 0..w {
            let px = sky.pixel(sx + col, (sy + row) as i32);
            frame.set_pixel_color((dx + col) as u32, row as u32, px);
        }
    }
}

pub fn render_sky(frame: &mut Framebuffer, sky: &SkyPanorama, camera: &Camera, fog_color: Option<Rgba>) {
    let start = camera.view_start_units() as usize;
    let height = sky_height(camera.y());
    let sy = sky_source_row(camera.y());

    if start + SCREEN_WIDTH <= SKY_WIDTH {
        blit(frame, sky, start, sy, SCREEN_WIDTH, height, 0);
    } else {
        // La ventana cruza el borde del panorama: dos copias.
        let first = SKY_WIDTH - start;
        blit(frame, sky, start, sy, first, height, 0);
        blit(frame, sky, 0, sy, SCREEN_WIDTH - first, height, first);
    }

    if let Some(fog) = fog_color {
        for y in 0..height {
            let alpha = alpha_from_fraction(sky_fog_opacity(y, height));
            for x in 0..SCREEN_WIDTH {
                frame.blend_pixel(x as i32, y as i32, fog, alpha);
            }
        }
    }
}
