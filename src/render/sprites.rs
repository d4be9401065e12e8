//! Sprite drawing helpers (billboards + sorting).
//!
//! Exposes:
//! - `project_sprite`: place one billboard on screen with the terrain's perspective
//! - `project_sprites`: rebuild the per-frame visible list
//! - `draw_sprite_world`: draw a single projected billboard
//! - `draw_sprites_sorted`: sort by distance and draw farthest first

use std::f64::consts::TAU;
use std::sync::Arc;

use crate::render::casters::TerrainSources;
use crate::render::color::{Rgba, alpha_from_fraction, blend};
use crate::render::framebuffer::Framebuffer;
use crate::render::tables::LookupTables;
use crate::render::textures::Pixmap;
use crate::render::{
    DEGREES_PER_UNIT, FOG_DEPTH, FULL_CIRCLE_UNITS, HALF_FOV_UNITS, PROJECTION_DISTANCE,
    SCALE_FACTOR, SCREEN_HEIGHT, SPRITE_VISIBILITY_RADIUS, vertical_center_offset,
};
use crate::world::camera::Camera;
use crate::world::sprite::Sprite;

/// Angular tolerance on the ±30° edge of the view.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Weight of each neighbouring row under smoothing.
const HALF_ROW: i32 = 128;

/// A sprite projected for the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleSprite {
    pub image: Arc<Pixmap>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Screen row of the sprite's footprint; drives fog.
    pub row: i32,
    pub distance: f64,
}

/// Projects `sprite`, or `None` when it is out of range or outside the view.
pub fn project_sprite(
    sprite: &Sprite,
    camera: &Camera,
    lookup: &LookupTables,
    sources: &TerrainSources<'_>,
) -> Option<VisibleSprite> {
    let (fx, fz) = camera.forward();
    let dx = sprite.x - camera.x() as f64;
    let dz = sprite.z - camera.z() as f64;
    let distance = (dx * dx + dz * dz).sqrt();
    if distance > SPRITE_VISIBILITY_RADIUS || distance == 0.0 {
        return None;
    }

    let (ux, uz) = (dx / distance, dz / distance);
    let dot = fx * ux + fz * uz;
    if dot < 0.0 {
        return None; // detrás de la cámara
    }
    let theta = dot.min(1.0).acos();
    let half_fov = (HALF_FOV_UNITS as f64 * DEGREES_PER_UNIT).to_radians();
    if theta > half_fov + EDGE_TOLERANCE {
        return None;
    }

    let cross = fx * uz - ux * fz;
    let offset = theta * FULL_CIRCLE_UNITS as f64 / TAU;
    let center = HALF_FOV_UNITS as f64;
    let column = (if cross < 0.0 { center - offset } else { center + offset }) as i32;
    let column = column.max(0) as usize;

    let scale = SCALE_FACTOR / (distance + 1.0);
    let width = (scale * sprite.image.width() as f64) as i32;
    let height = (scale * sprite.image.height() as f64) as i32;

    let h = camera.y();
    let corrected = distance / lookup.inverse_distortion(column);
    let projected = (PROJECTION_DISTANCE * h as f64 / corrected).round();
    let row = (projected + (SCREEN_HEIGHT as i32 - 1 - h) as f64) as i32;

    let ground = sources.height(sprite.x as i64, sprite.z as i64);
    let top = vertical_center_offset(h, 0) as f64 + row as f64 - ground as f64 * scale;

    Some(VisibleSprite {
        image: Arc::clone(&sprite.image),
        x: (column as f64 - width as f64 / 2.0) as i32,
        y: (top - height as f64) as i32,
        width,
        height,
        row,
        distance,
    })
}

/// Clears `visible` and refills it with every sprite in view.
pub fn project_sprites(
    sprites: &[Sprite],
    camera: &Camera,
    sources: &TerrainSources<'_>,
    visible: &mut Vec<VisibleSprite>,
) {
    let lookup = LookupTables::shared();
    visible.clear();
    visible.extend(sprites.iter().filter_map(|s| project_sprite(s, camera, lookup, sources)));
}

/// Paints one projected sprite, nearest-neighbour scaled and alpha-composited.
/// With `smooth` the sprite is shifted up half a row like the terrain: frame
/// row `y` averages sprite rows `y` and `y + 1`.
pub fn draw_sprite_world(framebuffer: &mut Framebuffer, sprite: &VisibleSprite, fog_color: Option<Rgba>, smooth: bool) {
    if sprite.width <= 0 || sprite.height <= 0 {
        return;
    }
    let fb_w = framebuffer.width as i32;
    let fb_h = framebuffer.height as i32;
    let start_x = sprite.x.max(0);
    let end_x = sprite.x.saturating_add(sprite.width).min(fb_w);
    let start_y = sprite.y.saturating_sub(smooth as i32).max(0);
    let end_y = sprite.y.saturating_add(sprite.height).min(fb_h);
    let fog_alpha = alpha_from_fraction(sprite.row as f64 / FOG_DEPTH);

    let texel_at = |sx: i32, sy: i32| -> Option<Rgba> {
        if sy < sprite.y || sy >= sprite.y.saturating_add(sprite.height) {
            return None;
        }
        let tx = ((sx - sprite.x) as i64 * sprite.image.width() as i64 / sprite.width as i64) as u32;
        let ty = ((sy - sprite.y) as i64 * sprite.image.height() as i64 / sprite.height as i64) as u32;
        let texel = sprite.image.get(tx, ty);
        if texel.a == 0 {
            return None;
        }
        Some(match fog_color {
            Some(fog) => blend(texel, fog, fog_alpha).with_alpha(texel.a),
            None => texel,
        })
    };

    for sy in start_y..end_y {
        for sx in start_x..end_x {
            let upper = texel_at(sx, sy);
            let (color, alpha) = if smooth {
                match (upper, texel_at(sx, sy + 1)) {
                    (Some(u), Some(l)) => (blend(u, l, HALF_ROW), (u.a as i32 + l.a as i32) / 2),
                    (Some(c), None) | (None, Some(c)) => (c, c.a as i32 * HALF_ROW / 255),
                    (None, None) => continue,
                }
            } else {
                match upper {
                    Some(c) => (c, c.a as i32),
                    None => continue,
                }
            };
            framebuffer.blend_pixel(sx, sy, color, alpha);
        }
    }
}

/// Farthest first; equal distances keep their insertion order.
pub fn sort_far_to_near(sprites: &mut [VisibleSprite]) {
    sprites.sort_by(|a, b| b.distance.total_cmp(&a.distance));
}

pub fn draw_sprites_sorted(
    framebuffer: &mut Framebuffer,
    sprites: &mut [VisibleSprite],
    fog_color: Option<Rgba>,
    smooth: bool,
) {
    sort_far_to_near(sprites);
    for sprite in sprites.iter() {
        draw_sprite_world(framebuffer, sprite, fog_color, smooth);
    }
}
