use proptest::prelude::*;
use std::sync::OnceLock;

use voxelscape::render::casters::{ColumnCaster, TerrainSources};
use voxelscape::render::color::blend;
use voxelscape::render::tables::{LookupTables, RayLengthTable};
use voxelscape::render::textures::{SkyPanorama, TextureBuffer};
use voxelscape::world::camera::Camera;
use voxelscape::{CameraUpdate, HeightField, Rgba};

fn rough_terrain() -> &'static HeightField {
    static HM: OnceLock<HeightField> = OnceLock::new();
    HM.get_or_init(|| HeightField::from_fn(|x, z| ((x * 31 + z * 17 + (x * z) % 97) % 256) as u8))
}

fn arb_rgba() -> impl Strategy<Value = Rgba> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgba::opaque(r, g, b))
}

proptest! {
    // Toroidal wrap: shifting by whole tiles never changes the sample
    #[test]
    fn heightfield_sampling_wraps(
        x in -1_000_000i64..1_000_000,
        z in -1_000_000i64..1_000_000,
        kx in -50i64..50,
        kz in -50i64..50,
    ) {
        let hm = rough_terrain();
        prop_assert_eq!(hm.sample(x, z), hm.sample(x + 1024 * kx, z + 1024 * kz));
        let tex = TextureBuffer::filled(Rgba::WHITE);
        prop_assert_eq!(tex.sample(x, z), tex.sample(x + 1024 * kx, z + 1024 * kz));
    }

    #[test]
    fn blend_identities(a in arb_rgba(), b in arb_rgba(), alpha in -300i32..600) {
        prop_assert_eq!(blend(a, a, alpha), a);
        prop_assert_eq!(blend(a, b, 255), a);
        prop_assert_eq!(blend(a, b, 0), b);
        prop_assert_eq!(blend(a, b, alpha).a, 255);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // Front-to-back occlusion: emitted tops strictly decrease down each column
    #[test]
    fn emitted_tops_strictly_decrease(
        angle in 0.0f64..360.0,
        x in 0.0f64..3072.0,
        z in 0.0f64..3072.0,
        y in 200.0f64..=300.0,
        ray in 1usize..320,
        water in proptest::option::of(0u8..=255),
    ) {
        let mut cam = Camera::new();
        cam.apply(&CameraUpdate::new().angle(angle).x(x).y(y).z(z));
        let table = RayLengthTable::build(cam.y(), LookupTables::shared());
        let tex = TextureBuffer::filled(Rgba::WHITE);
        let sky = SkyPanorama::filled(Rgba::BLACK);
        let sources = TerrainSources {
            heightmap: rough_terrain(),
            texturemap: &tex,
            oob_heightmap: Some(rough_terrain()),
            oob_texturemap: None,
        };
        let caster = ColumnCaster::new(&cam, &table, sources, &sky).with_water(water);
        let mut spans = Vec::new();
        caster.cast_ray(ray, &mut spans);
        for pair in spans.windows(2) {
            prop_assert!(pair[1].top < pair[0].top || pair[1].top == 0);
            prop_assert!(pair[1].bottom <= pair[0].top);
        }
        for s in &spans {
            prop_assert!(s.top <= s.bottom && s.bottom <= 199);
        }
    }
}
