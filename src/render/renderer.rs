//! The renderer context: owns every buffer, the camera and the per-frame
//! scratch state, and runs the frame pipeline.
//!
//! Setters validate their input first and only mutate on success, so a failed
//! call leaves the renderer exactly as it was.

use std::sync::Arc;

use log::{debug, trace};

use crate::error::{RenderError, Result};
use crate::render::casters::{ColumnCaster, TerrainSources};
use crate::render::color::Rgba;
use crate::render::framebuffer::Framebuffer;
use crate::render::present::present;
use crate::render::render3d::render_terrain;
use crate::render::sky::render_sky;
use crate::render::sprites::{VisibleSprite, draw_sprites_sorted, project_sprites};
use crate::render::tables::{LookupTables, RayLengthCache, RayLengthTable};
use crate::render::textures::{Pixmap, SkyPanorama, TextureBuffer};
use crate::render::{Capability, DEFAULT_WATER_HEIGHT, Quality};
use crate::world::camera::{Camera, CameraPose, CameraUpdate};
use crate::world::heightmap::HeightField;
use crate::world::sprite::Sprite;

#[derive(Debug)]
pub struct Renderer {
    camera: Camera,
    quality: Quality,
    fog: bool,
    reflection: bool,
    smooth: bool,
    fog_color: Rgba,
    water_height: u8,

    heightmap: HeightField,
    oob_heightmap: Option<HeightField>,
    texturemap: TextureBuffer,
    oob_texturemap: Option<TextureBuffer>,
    sky: SkyPanorama,
    sprites: Vec<Sprite>,

    ray_cache: RayLengthCache,
    ray_lengths: Arc<RayLengthTable>,
    visible: Vec<VisibleSprite>,
    offscreen: Framebuffer,
    frame: Framebuffer,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn checked_water_height(height: i32) -> Result<u8> {
    u8::try_from(height).map_err(|_| RenderError::OutOfRange {
        name: "water height",
        value: height as f64,
        min: 0.0,
        max: 255.0,
    })
}

impl Renderer {
    /// A renderer over a flat, black world under a black sky.
    pub fn new() -> Self {
        let camera = Camera::new();
        let mut ray_cache = RayLengthCache::default();
        let ray_lengths = ray_cache.get_or_build(camera.y(), LookupTables::shared());
        let mut offscreen = Framebuffer::screen();
        offscreen.set_background_color(Rgba::TRANSPARENT);
        offscreen.clear();
        Self {
            camera,
            quality: Quality::default(),
            fog: false,
            reflection: false,
            smooth: false,
            fog_color: Rgba::NEUTRAL,
            water_height: DEFAULT_WATER_HEIGHT,
            heightmap: HeightField::flat(0),
            oob_heightmap: None,
            texturemap: TextureBuffer::filled(Rgba::BLACK),
            oob_texturemap: None,
            sky: SkyPanorama::filled(Rgba::BLACK),
            sprites: Vec::new(),
            ray_cache,
            ray_lengths,
            visible: Vec::new(),
            offscreen,
            frame: Framebuffer::screen(),
        }
    }

    fn flag_mut(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::Fog => &mut self.fog,
            Capability::ReflectionMap => &mut self.reflection,
            Capability::Smooth => &mut self.smooth,
        }
    }

    /// Enabling the reflection map always starts from the default water level.
    pub fn enable(&mut self, capability: Capability) -> &mut Self {
        debug!("enable {capability}");
        *self.flag_mut(capability) = true;
        if capability == Capability::ReflectionMap {
            self.water_height = DEFAULT_WATER_HEIGHT;
        }
        self
    }

    pub fn disable(&mut self, capability: Capability) -> &mut Self {
        debug!("disable {capability}");
        *self.flag_mut(capability) = false;
        self
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::Fog => self.fog,
            Capability::ReflectionMap => self.reflection,
            Capability::Smooth => self.smooth,
        }
    }

    pub fn set_quality(&mut self, quality: Quality) -> &mut Self {
        debug!("quality {quality} (stride {})", quality.stride());
        self.quality = quality;
        self
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Applies a partial camera update. A newly accepted height switches to
    /// the ray-length table for that height, building it if needed.
    pub fn set_camera(&mut self, update: CameraUpdate) -> &mut Self {
        if self.camera.apply(&update) && self.ray_lengths.height() != self.camera.y() {
            self.ray_lengths = self.ray_cache.get_or_build(self.camera.y(), LookupTables::shared());
        }
        self
    }

    pub fn camera(&self) -> CameraPose {
        self.camera.pose()
    }

    /// Water level for the reflection map, `0..=255`.
    pub fn set_water_height(&mut self, height: i32) -> Result<&mut Self> {
        if !self.reflection {
            return Err(RenderError::CapabilityNotEnabled(Capability::ReflectionMap));
        }
        let height = checked_water_height(height)?;
        debug!("water height {height}");
        self.water_height = height;
        Ok(self)
    }

    pub fn water_height(&self) -> u8 {
        self.water_height
    }

    /// Fog colour as `#rrggbb`.
    pub fn set_fog_color(&mut self, color: &str) -> Result<&mut Self> {
        if !self.fog {
            return Err(RenderError::CapabilityNotEnabled(Capability::Fog));
        }
        self.fog_color = Rgba::from_hex(color)?;
        debug!("fog colour {}", self.fog_color);
        Ok(self)
    }

    pub fn fog_color(&self) -> Rgba {
        self.fog_color
    }

    pub fn set_heightmap(&mut self, heightmap: HeightField) -> &mut Self {
        debug!("heightmap replaced");
        self.heightmap = heightmap;
        self
    }

    pub fn set_out_of_bounds_heightmap(&mut self, heightmap: HeightField) -> &mut Self {
        debug!("out-of-bounds heightmap set");
        self.oob_heightmap = Some(heightmap);
        self
    }

    pub fn set_texturemap(&mut self, texturemap: Pixmap) -> Result<&mut Self> {
        self.texturemap = TextureBuffer::new(texturemap)?;
        debug!("texturemap replaced");
        Ok(self)
    }

    pub fn set_out_of_bounds_texturemap(&mut self, texturemap: Pixmap) -> Result<&mut Self> {
        self.oob_texturemap = Some(TextureBuffer::new(texturemap)?);
        debug!("out-of-bounds texturemap set");
        Ok(self)
    }

    pub fn set_sky(&mut self, sky: Pixmap) -> Result<&mut Self> {
        self.sky = SkyPanorama::new(sky)?;
        debug!("sky replaced");
        Ok(self)
    }

    /// Places a billboard; x and z in `[1024, 2048)`, y in `[0, 1024)`.
    pub fn add_sprite(&mut self, image: impl Into<Arc<Pixmap>>, x: f64, y: f64, z: f64) -> Result<&mut Self> {
        let sprite = Sprite::new(image, x, y, z)?;
        self.sprites.push(sprite);
        debug!("sprite added at ({x}, {y}, {z}); {} total", self.sprites.len());
        Ok(self)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Raises terrain under `mask`, anchored at world cell `(x, z)`.
    pub fn set_mask(&mut self, mask: &Pixmap, x: i64, z: i64, scale: f64) -> Result<&mut Self> {
        self.heightmap.stamp_mask(mask, x, z, scale)?;
        debug!("mask {}x{} stamped at ({x}, {z})", mask.width(), mask.height());
        Ok(self)
    }

    /// Terrain height at world cell `(x, z)`, wrapped into the height field.
    pub fn height_at(&self, x: i64, z: i64) -> u8 {
        self.heightmap.sample(x, z)
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    /// Renders one frame: sky, terrain, then sprites farthest first.
    pub fn render(&mut self) -> &Framebuffer {
        let fog = self.fog.then_some(self.fog_color);
        let water = self.reflection.then_some(self.water_height);

        self.frame.clear();
        render_sky(&mut self.frame, &self.sky, &self.camera, fog);

        let sources = TerrainSources {
            heightmap: &self.heightmap,
            texturemap: &self.texturemap,
            oob_heightmap: self.oob_heightmap.as_ref(),
            oob_texturemap: self.oob_texturemap.as_ref(),
        };
        project_sprites(&self.sprites, &self.camera, &sources, &mut self.visible);

        self.offscreen.clear();
        let caster = ColumnCaster::new(&self.camera, &self.ray_lengths, sources, &self.sky)
            .with_water(water)
            .with_fog(fog);
        render_terrain(&caster, self.quality.stride(), &mut self.offscreen);
        present(&mut self.frame, &self.offscreen, self.smooth);

        draw_sprites_sorted(&mut self.frame, &mut self.visible, fog, self.smooth);
        trace!("frame rendered, {} visible sprites", self.visible.len());
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_toggle() {
        let mut r = Renderer::new();
        assert!(!r.is_enabled(Capability::Fog));
        r.enable(Capability::Fog).enable(Capability::Smooth);
        assert!(r.is_enabled(Capability::Fog) && r.is_enabled(Capability::Smooth));
        r.disable(Capability::Fog);
        assert!(!r.is_enabled(Capability::Fog));
        assert!(!r.is_enabled(Capability::ReflectionMap));
    }

    #[test]
    fn water_height_needs_reflection_and_range() {
        let mut r = Renderer::new();
        assert_eq!(
            r.set_water_height(10).unwrap_err(),
            RenderError::CapabilityNotEnabled(Capability::ReflectionMap)
        );
        r.enable(Capability::ReflectionMap);
        assert!(matches!(r.set_water_height(256), Err(RenderError::OutOfRange { .. })));
        assert!(matches!(r.set_water_height(-1), Err(RenderError::OutOfRange { .. })));
        assert_eq!(r.water_height(), DEFAULT_WATER_HEIGHT);
        r.set_water_height(255).unwrap();
        assert_eq!(r.water_height(), 255);
    }

    #[test]
    fn reenabling_reflection_resets_water_height() {
        let mut r = Renderer::new();
        r.enable(Capability::ReflectionMap).set_water_height(120).unwrap();
        assert_eq!(r.water_height(), 120);
        r.disable(Capability::ReflectionMap).enable(Capability::ReflectionMap);
        assert_eq!(r.water_height(), DEFAULT_WATER_HEIGHT);
    }

    #[test]
    fn fog_colour_needs_fog_and_valid_hex() {
        let mut r = Renderer::new();
        assert!(matches!(r.set_fog_color("#ffffff"), Err(RenderError::CapabilityNotEnabled(Capability::Fog))));
        r.enable(Capability::Fog);
        assert!(r.set_fog_color("white").is_err());
        assert_eq!(r.fog_color(), Rgba::NEUTRAL);
        r.set_fog_color("#102030").unwrap();
        assert_eq!(r.fog_color(), Rgba::opaque(0x10, 0x20, 0x30));
    }

    #[test]
    fn camera_height_switches_ray_table() {
        let mut r = Renderer::new();
        r.set_camera(CameraUpdate::new().y(250.0));
        assert_eq!(r.ray_lengths.height(), 250);
        assert!(r.ray_cache.contains(200) && r.ray_cache.contains(250));
        r.set_camera(CameraUpdate::new().y(900.0));
        assert_eq!(r.camera().y, 250);
        assert_eq!(r.ray_lengths.height(), 250);
    }

    #[test]
    fn failed_setters_leave_state_untouched() {
        let mut r = Renderer::new();
        assert!(r.set_sky(Pixmap::filled(10, 10, Rgba::WHITE)).is_err());
        assert!(r.set_texturemap(Pixmap::filled(1024, 10, Rgba::WHITE)).is_err());
        assert!(r.add_sprite(Pixmap::filled(2, 2, Rgba::WHITE), 0.0, 0.0, 0.0).is_err());
        assert_eq!(r.sprite_count(), 0);
        r.set_camera(CameraUpdate::new().x(1536.0).z(1536.0));
        let frame = r.render();
        // black sky on top, black terrain below the horizon
        assert_eq!(frame.get_pixel(0, 0), Rgba::BLACK);
        assert_eq!(frame.get_pixel(160, 199), Rgba::BLACK);
    }

    #[test]
    fn height_at_wraps() {
        let mut r = Renderer::new();
        r.set_heightmap(HeightField::from_fn(|x, z| (x ^ z) as u8));
        assert_eq!(r.height_at(3, 5), 6);
        assert_eq!(r.height_at(3 + 1024, 5 - 2048), 6);
        assert_eq!(r.height_at(-1, 0), 255);
    }

    #[test]
    fn mask_raises_terrain() {
        let mut r = Renderer::new();
        let mask = Pixmap::filled(2, 2, Rgba::opaque(10, 0, 0));
        r.set_mask(&mask, 1030, 1030, 1.0).unwrap();
        assert_eq!(r.height_at(1031, 1031), 202);
        assert_eq!(r.height_at(1032, 1031), 0);
    }
}
