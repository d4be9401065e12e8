//! Per-column ray caster.
//!
//! Each ray walks the screen rows from the nearest (299) to the farthest (0),
//! sampling the terrain along the ray and emitting a vertical span whenever the
//! projected top rises above everything drawn so far in that column.

use crate::render::color::{Rgba, alpha_from_fraction, blend};
use crate::render::tables::{LookupTables, RayLengthTable};
use crate::render::textures::{SkyPanorama, TextureBuffer};
use crate::render::{
    FOG_DEPTH, FULL_CIRCLE_UNITS, MAXIMUM_ROW, SCALE_FACTOR, SCREEN_HEIGHT, in_home_tile,
    vertical_center_offset,
};
use crate::world::camera::Camera;
use crate::world::heightmap::HeightField;

/// Height and texture buffers, with optional replacements outside the home tile.
#[derive(Clone, Copy)]
pub struct TerrainSources<'a> {
    pub heightmap: &'a HeightField,
    pub texturemap: &'a TextureBuffer,
    pub oob_heightmap: Option<&'a HeightField>,
    pub oob_texturemap: Option<&'a TextureBuffer>,
}

impl TerrainSources<'_> {
    /// Height at unwrapped world cell `(x, z)`. Outside the home tile the
    /// out-of-bounds map is used, or 0 when there is none.
    #[inline]
    pub fn height(&self, x: i64, z: i64) -> u8 {
        if in_home_tile(x, z) {
            self.heightmap.sample(x, z)
        } else {
            self.oob_heightmap.map_or(0, |hm| hm.sample(x, z))
        }
    }

    /// Texel at unwrapped world cell `(x, z)`, same rule as `height`.
    #[inline]
    pub fn texel(&self, x: i64, z: i64) -> Rgba {
        if in_home_tile(x, z) {
            self.texturemap.sample(x, z)
        } else {
            self.oob_texturemap.map_or(Rgba::NEUTRAL, |tm| tm.sample(x, z))
        }
    }
}

/// A vertical run of one colour in a ray's column, rows `top..=bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub top: usize,
    pub bottom: usize,
    pub color: Rgba,
}

/// Everything a ray needs for one frame.
pub struct ColumnCaster<'a> {
    pub camera: &'a Camera,
    pub lookup: &'a LookupTables,
    pub ray_lengths: &'a RayLengthTable,
    pub sources: TerrainSources<'a>,
    pub sky: &'a SkyPanorama,
    /// Water level; `None` when reflection is disabled.
    pub water_height: Option<u8>,
    /// Fog colour; `None` when fog is disabled.
    pub fog_color: Option<Rgba>,
    /// Scaled angle of screen column 0.
    pub initial_angle: usize,
}

impl<'a> ColumnCaster<'a> {
    pub fn new(
        camera: &'a Camera,
        ray_lengths: &'a RayLengthTable,
        sources: TerrainSources<'a>,
        sky: &'a SkyPanorama,
    ) -> Self {
        Self {
            camera,
            lookup: LookupTables::shared(),
            ray_lengths,
            sources,
            sky,
            water_height: None,
            fog_color: None,
            initial_angle: camera.view_start_units() as usize,
        }
    }

    pub fn with_water(mut self, water_height: Option<u8>) -> Self {
        self.water_height = water_height;
        self
    }

    pub fn with_fog(mut self, fog_color: Option<Rgba>) -> Self {
        self.fog_color = fog_color;
        self
    }

    /// Casts ray `ray` (1..=319) and appends its visible spans, nearest first.
    /// Emitted tops are strictly decreasing.
    pub fn cast_ray(&self, ray: usize, out: &mut Vec<Span>) {
        let angle = (self.initial_angle + ray) % FULL_CIRCLE_UNITS;
        let (cos, sin) = (self.lookup.cos(angle), self.lookup.sin(angle));
        let cam_x = self.camera.x() as f64;
        let cam_z = self.camera.z() as f64;
        let h = self.camera.y();
        let last_row = SCREEN_HEIGHT as i32 - 1;

        let mut previous_top = MAXIMUM_ROW as i32;
        for row in (0..=MAXIMUM_ROW).rev() {
            let len = self.ray_lengths.length(row, ray);
            let world_x = (cam_x + len * cos) as i64;
            let world_z = (cam_z + len * sin) as i64;

            let height = self.sources.height(world_x, world_z);
            let mut effective = height;
            let mut water_alpha = None;
            if let Some(water) = self.water_height {
                if height < water && in_home_tile(world_x, world_z) {
                    effective = water;
                    let depth = (water - height) as f64 / water as f64;
                    water_alpha = Some((depth * 510.0) as i32);
                }
            }

            let scale = (effective as f64 * SCALE_FACTOR / (len + 1.0)) as i32;
            let top = vertical_center_offset(h, row) - scale;
            if top >= previous_top {
                continue;
            }
            let bottom = previous_top.min(last_row);
            previous_top = top;
            if bottom < 0 || top > last_row {
                continue;
            }

            let mut color = self.sources.texel(world_x, world_z);
            if let Some(alpha) = water_alpha {
                // El cielo reflejado: fila espejo respecto del horizonte.
                let mirrored = self.sky.pixel(self.initial_angle + ray, SCREEN_HEIGHT as i32 - top);
                color = blend(mirrored, color, alpha);
            }
            if let Some(fog) = self.fog_color {
                color = blend(color, fog, alpha_from_fraction(row as f64 / FOG_DEPTH));
            }

            out.push(Span { top: top.max(0) as usize, bottom: bottom as usize, color });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tables::RayLengthTable;
    use crate::world::camera::CameraUpdate;

    fn flat_world(height: u8, color: Rgba) -> (HeightField, TextureBuffer) {
        (HeightField::flat(height), TextureBuffer::filled(color))
    }

    #[test]
    fn spans_have_strictly_decreasing_tops() {
        let hm = HeightField::from_fn(|x, z| ((x * 7 + z * 13) % 200) as u8);
        let tm = TextureBuffer::filled(Rgba::WHITE);
        let sky = SkyPanorama::filled(Rgba::BLACK);
        let mut cam = Camera::new();
        cam.apply(&CameraUpdate::new().x(1500.0).z(1500.0).y(260.0).angle(33.0));
        let table = RayLengthTable::build(cam.y(), LookupTables::shared());
        let sources = TerrainSources { heightmap: &hm, texturemap: &tm, oob_heightmap: None, oob_texturemap: None };
        let caster = ColumnCaster::new(&cam, &table, sources, &sky);
        for ray in [1, 80, 160, 319] {
            let mut spans = Vec::new();
            caster.cast_ray(ray, &mut spans);
            for pair in spans.windows(2) {
                assert!(pair[1].top < pair[0].top || pair[1].top == 0);
                assert!(pair[1].bottom <= pair[0].top);
            }
            assert!(spans.iter().all(|s| s.top <= s.bottom && s.bottom < 200));
        }
    }

    #[test]
    fn flat_ground_covers_below_horizon() {
        let (hm, tm) = flat_world(0, Rgba::opaque(10, 200, 30));
        let sky = SkyPanorama::filled(Rgba::BLACK);
        let mut cam = Camera::new();
        cam.apply(&CameraUpdate::new().x(1536.0).z(1536.0));
        let table = RayLengthTable::build(cam.y(), LookupTables::shared());
        let sources =
            TerrainSources { heightmap: &hm, texturemap: &tm, oob_heightmap: Some(&hm), oob_texturemap: Some(&tm) };
        let caster = ColumnCaster::new(&cam, &table, sources, &sky);
        let mut spans = Vec::new();
        caster.cast_ray(160, &mut spans);
        // Height 0 everywhere: the top at each row is 100 + row, so the ground
        // fills rows 100..=199.
        assert_eq!(spans.iter().map(|s| s.top).min(), Some(100));
        assert_eq!(spans[0].bottom, 199);
        assert!(spans.iter().all(|s| s.color == Rgba::opaque(10, 200, 30)));
    }

    #[test]
    fn outside_home_tile_falls_back_to_neutral() {
        let (hm, tm) = flat_world(50, Rgba::WHITE);
        let sources = TerrainSources { heightmap: &hm, texturemap: &tm, oob_heightmap: None, oob_texturemap: None };
        assert_eq!(sources.height(1023, 1500), 0);
        assert_eq!(sources.texel(1500, 2048), Rgba::NEUTRAL);
        assert_eq!(sources.height(1024, 2047), 50);

        let oob = HeightField::flat(9);
        let with_oob = TerrainSources { oob_heightmap: Some(&oob), ..sources };
        assert_eq!(with_oob.height(-5, 1500), 9);
        assert_eq!(with_oob.texel(-5, 1500), Rgba::NEUTRAL);
    }

    #[test]
    fn fog_washes_far_rows_only() {
        let (hm, tm) = flat_world(0, Rgba::WHITE);
        let sky = SkyPanorama::filled(Rgba::BLACK);
        let mut cam = Camera::new();
        cam.apply(&CameraUpdate::new().x(1536.0).z(1536.0));
        let table = RayLengthTable::build(cam.y(), LookupTables::shared());
        let sources = TerrainSources { heightmap: &hm, texturemap: &tm, oob_heightmap: None, oob_texturemap: None };
        let caster = ColumnCaster::new(&cam, &table, sources, &sky).with_fog(Some(Rgba::BLACK));
        let mut spans = Vec::new();
        caster.cast_ray(160, &mut spans);
        // first visible span comes from row 99; the horizon row is fully fogged
        assert_eq!(spans[0].color, Rgba::opaque(252, 252, 252));
        assert_eq!(spans.last().map(|s| s.color), Some(Rgba::BLACK));
    }
}
