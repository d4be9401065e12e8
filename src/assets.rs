//! Scene assets for the viewer: images from disk through raylib, or
//! procedural fallbacks when a path is missing or fails to load.

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use raylib::prelude::*;

use voxelscape::render::atlas::Compositor;
use voxelscape::render::{HOME_MIN, SKY_HEIGHT, SKY_WIDTH, WORLD_SIZE};
use voxelscape::{HeightField, Pixmap, Renderer, Rgba, SceneConfig};

/// Lee una imagen como pixmap RGBA.
pub fn load_pixmap(path: &Path) -> Option<Pixmap> {
    let name = path.to_str()?;
    match Image::load_image(name) {
        Ok(img) => {
            let w = img.width().max(1) as u32;
            let h = img.height().max(1) as u32;
            let px: Vec<Rgba> = img.get_image_data().iter().map(|c| Rgba::new(c.r, c.g, c.b, c.a)).collect();
            match Pixmap::new(w, h, px) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::warn!("{}: {e}", path.display());
                    None
                }
            }
        }
        Err(e) => {
            log::warn!("could not load {}: {e}", path.display());
            None
        }
    }
}

fn load_optional(path: Option<&Path>) -> Option<Pixmap> {
    path.and_then(load_pixmap)
}

/// Colinas suaves: suma de gaussianas sobre el toro.
pub fn random_hills(rng: &mut impl Rng) -> HeightField {
    let hills: Vec<(f32, f32, f32, f32)> = (0..24)
        .map(|_| {
            (
                rng.gen_range(0.0..WORLD_SIZE as f32),
                rng.gen_range(0.0..WORLD_SIZE as f32),
                rng.gen_range(40.0..160.0),
                rng.gen_range(30.0..140.0),
            )
        })
        .collect();
    let size = WORLD_SIZE as f32;
    HeightField::from_fn(|x, z| {
        let mut h = 0.0;
        for &(cx, cz, radius, peak) in &hills {
            let mut dx = (x as f32 - cx).abs();
            let mut dz = (z as f32 - cz).abs();
            dx = dx.min(size - dx);
            dz = dz.min(size - dz);
            let d2 = (dx * dx + dz * dz) / (radius * radius);
            h += peak * (-d2).exp();
        }
        h.min(255.0) as u8
    })
}

fn noisy_band(rng: &mut impl Rng, base: Rgba) -> Pixmap {
    Pixmap::from_fn(256, 256, |_, _| {
        let jitter: i16 = rng.gen_range(-12..=12);
        let ch = |v: u8| (v as i16 + jitter).clamp(0, 255) as u8;
        Rgba::opaque(ch(base.r), ch(base.g), ch(base.b))
    })
}

/// Textura por bandas de altura: arena, pasto, roca y nieve.
pub fn banded_texture(rng: &mut impl Rng, heightmap: &HeightField) -> Option<Pixmap> {
    let mut compositor = Compositor::new();
    let bands = [
        (48, Rgba::opaque(194, 178, 128)),
        (120, Rgba::opaque(72, 128, 48)),
        (200, Rgba::opaque(110, 100, 90)),
        (255, Rgba::opaque(236, 236, 240)),
    ];
    for (height, color) in bands {
        if let Err(e) = compositor.add_texture(height, noisy_band(rng, color)) {
            log::warn!("band {height}: {e}");
        }
    }
    compositor.set_heightmap(heightmap.clone());
    match compositor.composite() {
        Ok(tex) => Some(tex.pixmap().clone()),
        Err(e) => {
            log::warn!("texture composite failed: {e}");
            None
        }
    }
}

pub fn gradient_sky(rng: &mut impl Rng) -> Pixmap {
    let zenith = Rgba::opaque(40, 80, 160);
    let horizon = Rgba::opaque(190, 210, 235);
    let clouds: Vec<(f32, f32, f32)> = (0..14)
        .map(|_| (rng.gen_range(0.0..SKY_WIDTH as f32), rng.gen_range(10.0..70.0), rng.gen_range(20.0..90.0)))
        .collect();
    Pixmap::from_fn(SKY_WIDTH as u32, SKY_HEIGHT as u32, |x, y| {
        let t = (y as f32 / (SKY_HEIGHT - 1) as f32 * 255.0) as i32;
        let mut c = voxelscape::render::color::blend(horizon, zenith, t);
        for &(cx, cy, r) in &clouds {
            let mut dx = (x as f32 - cx).abs();
            dx = dx.min(SKY_WIDTH as f32 - dx);
            let d = ((dx / r).powi(2) + ((y as f32 - cy) / (r * 0.25)).powi(2)).sqrt();
            if d < 1.0 {
                c = voxelscape::render::color::blend(Rgba::WHITE, c, ((1.0 - d) * 200.0) as i32);
            }
        }
        c
    })
}

/// Árbol simple con fondo transparente.
pub fn tree_sprite() -> Pixmap {
    Pixmap::from_fn(16, 32, |x, y| {
        let cx = x as i32 - 8;
        if y >= 22 {
            return if (-1..=1).contains(&cx) { Rgba::opaque(90, 60, 30) } else { Rgba::TRANSPARENT };
        }
        let half = (y as i32 + 2) / 3;
        if cx.abs() <= half { Rgba::opaque(30, 100 + (y as u8) * 2, 40) } else { Rgba::TRANSPARENT }
    })
}

fn mesa_mask() -> Pixmap {
    Pixmap::from_fn(48, 48, |x, y| {
        let dx = x as f32 - 24.0;
        let dy = y as f32 - 24.0;
        let d = (dx * dx + dy * dy).sqrt() / 24.0;
        if d <= 1.0 { Rgba::opaque(((1.0 - d) * 200.0) as u8, 0, 0) } else { Rgba::TRANSPARENT }
    })
}

/// Loads every configured asset into `renderer`, generating what is missing.
pub fn populate(renderer: &mut Renderer, config: &SceneConfig) -> voxelscape::Result<()> {
    let mut rng = rand::thread_rng();
    let assets = &config.assets;

    let heightmap = match load_optional(assets.heightmap.as_deref()) {
        Some(p) => HeightField::from_pixmap(&p)?,
        None => {
            log::info!("no heightmap configured; generating hills");
            random_hills(&mut rng)
        }
    };

    let texturemap = load_optional(assets.texturemap.as_deref()).or_else(|| banded_texture(&mut rng, &heightmap));
    if let Some(tex) = texturemap {
        renderer.set_texturemap(tex)?;
    }
    renderer.set_heightmap(heightmap);

    let sky = load_optional(assets.sky.as_deref()).unwrap_or_else(|| gradient_sky(&mut rng));
    renderer.set_sky(sky)?;

    if let Some(p) = load_optional(assets.out_of_bounds_heightmap.as_deref()) {
        renderer.set_out_of_bounds_heightmap(HeightField::from_pixmap(&p)?);
    }
    if let Some(p) = load_optional(assets.out_of_bounds_texturemap.as_deref()) {
        renderer.set_out_of_bounds_texturemap(p)?;
    }

    let mx = HOME_MIN + rng.gen_range(100..900);
    let mz = HOME_MIN + rng.gen_range(100..900);
    renderer.set_mask(&mesa_mask(), mx, mz, 0.25)?;

    let tree = Arc::new(tree_sprite());
    for _ in 0..40 {
        let x = rng.gen_range(HOME_MIN as f64..(HOME_MIN as f64 + WORLD_SIZE as f64));
        let z = rng.gen_range(HOME_MIN as f64..(HOME_MIN as f64 + WORLD_SIZE as f64));
        renderer.add_sprite(Arc::clone(&tree), x, 0.0, z)?;
    }
    Ok(())
}
