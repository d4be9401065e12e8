//! Precomputed lookup tables.
//!
//! Trig and inverse-distortion tables are built once per process. Ray-length
//! tables depend on the camera height and are cached per height.

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use log::debug;

use crate::render::{
    DEGREES_PER_UNIT, FULL_CIRCLE_UNITS, HALF_FOV_UNITS, MAXIMUM_ROW, PROJECTION_DISTANCE,
    ROW_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH,
};

/// Ray columns `0..=320`; the two edges are guard entries.
pub const RAY_COLUMNS: usize = SCREEN_WIDTH + 1;

/// Heights kept in the ray-length cache before the oldest is dropped.
pub const RAY_LENGTH_CACHE_CAPACITY: usize = 8;

pub struct LookupTables {
    sine: Box<[f64]>,
    cosine: Box<[f64]>,
    inverse_distortion: [f64; RAY_COLUMNS],
}

impl LookupTables {
    fn build() -> Self {
        let (sine, cosine): (Vec<f64>, Vec<f64>) = (0..FULL_CIRCLE_UNITS)
            .map(|a| (a as f64 * DEGREES_PER_UNIT).to_radians().sin_cos())
            .unzip();

        let mut inverse_distortion = [0.0; RAY_COLUMNS];
        for (ray, entry) in inverse_distortion.iter_mut().enumerate() {
            let offset = ray as f64 - HALF_FOV_UNITS as f64;
            *entry = 1.0 / (offset * DEGREES_PER_UNIT).to_radians().cos();
        }
        // Bordes exactos de ±30°; el centro queda en 1 sin error de redondeo.
        inverse_distortion[0] = 2.0;
        inverse_distortion[SCREEN_WIDTH] = 2.0;
        inverse_distortion[HALF_FOV_UNITS] = 1.0;

        Self { sine: sine.into_boxed_slice(), cosine: cosine.into_boxed_slice(), inverse_distortion }
    }

    /// Process-wide tables, built on first use.
    pub fn shared() -> &'static LookupTables {
        static TABLES: OnceLock<LookupTables> = OnceLock::new();
        TABLES.get_or_init(LookupTables::build)
    }

    #[inline]
    pub fn sin(&self, angle: usize) -> f64 {
        self.sine[angle % FULL_CIRCLE_UNITS]
    }

    #[inline]
    pub fn cos(&self, angle: usize) -> f64 {
        self.cosine[angle % FULL_CIRCLE_UNITS]
    }

    /// `1 / cos` of the angle between ray column `ray` and the view centre.
    #[inline]
    pub fn inverse_distortion(&self, ray: usize) -> f64 {
        self.inverse_distortion[ray.min(SCREEN_WIDTH)]
    }
}

/// Distance along each ray for every screen row at one camera height.
pub struct RayLengthTable {
    height: i32,
    lengths: Box<[f64]>,
}

impl std::fmt::Debug for RayLengthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayLengthTable").field("height", &self.height).finish()
    }
}

impl RayLengthTable {
    pub fn build(height: i32, tables: &LookupTables) -> Self {
        let h = height as f64;
        let mut lengths = vec![0.0; ROW_COUNT * RAY_COLUMNS];
        for row in 0..=MAXIMUM_ROW {
            let denom = h - (SCREEN_HEIGHT as f64 - 1.0 - row as f64);
            let base = PROJECTION_DISTANCE * h / denom;
            let line = &mut lengths[row * RAY_COLUMNS..(row + 1) * RAY_COLUMNS];
            for (ray, len) in line.iter_mut().enumerate() {
                *len = tables.inverse_distortion(ray) * base;
            }
        }
        Self { height, lengths: lengths.into_boxed_slice() }
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn length(&self, row: usize, ray: usize) -> f64 {
        self.lengths[row * RAY_COLUMNS + ray]
    }
}

/// Bounded per-height cache of ray-length tables; evicts the oldest entry.
#[derive(Debug)]
pub struct RayLengthCache {
    capacity: usize,
    tables: VecDeque<Arc<RayLengthTable>>,
}

impl Default for RayLengthCache {
    fn default() -> Self {
        Self::new(RAY_LENGTH_CACHE_CAPACITY)
    }
}

impl RayLengthCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), tables: VecDeque::new() }
    }

    pub fn get_or_build(&mut self, height: i32, lookup: &LookupTables) -> Arc<RayLengthTable> {
        if let Some(t) = self.tables.iter().find(|t| t.height == height) {
            return Arc::clone(t);
        }
        if self.tables.len() == self.capacity {
            if let Some(old) = self.tables.pop_front() {
                debug!("evicting ray-length table for height {}", old.height);
            }
        }
        debug!("building ray-length table for height {height}");
        let table = Arc::new(RayLengthTable::build(height, lookup));
        self.tables.push_back(Arc::clone(&table));
        table
    }

    pub fn contains(&self, height: i32) -> bool {
        self.tables.iter().any(|t| t.height == height)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trig_quadrants() {
        let t = LookupTables::shared();
        assert_eq!(t.sin(0), 0.0);
        assert!((t.cos(480)).abs() < 1e-12);
        assert!((t.sin(480) - 1.0).abs() < 1e-12);
        assert!((t.cos(960) + 1.0).abs() < 1e-12);
        assert_eq!(t.sin(1920 + 7), t.sin(7));
    }

    #[test]
    fn inverse_distortion_guards() {
        let t = LookupTables::shared();
        assert_eq!(t.inverse_distortion(0), 2.0);
        assert_eq!(t.inverse_distortion(320), 2.0);
        assert_eq!(t.inverse_distortion(160), 1.0);
        // 80 unidades = 15°
        let expected = 1.0 / 15f64.to_radians().cos();
        assert!((t.inverse_distortion(80) - expected).abs() < 1e-12);
        assert!((t.inverse_distortion(240) - expected).abs() < 1e-12);
    }

    #[test]
    fn ray_length_formula() {
        let t = LookupTables::shared();
        let table = RayLengthTable::build(200, t);
        // row 199: denominator h, so length = invDist * 75
        assert!((table.length(199, 160) - 75.0).abs() < 1e-12);
        // row 0: denominator 1
        assert!((table.length(0, 160) - 75.0 * 200.0).abs() < 1e-9);
        let edge = t.inverse_distortion(1) * 75.0 * 200.0 / (200.0 - (199.0 - 250.0));
        assert!((table.length(250, 1) - edge).abs() < 1e-12);
    }

    #[test]
    fn lengths_shrink_toward_the_viewer() {
        let table = RayLengthTable::build(250, LookupTables::shared());
        for row in 1..=MAXIMUM_ROW {
            assert!(table.length(row, 100) < table.length(row - 1, 100));
        }
    }

    #[test]
    fn cache_evicts_oldest() {
        let t = LookupTables::shared();
        let mut cache = RayLengthCache::new(2);
        let a = cache.get_or_build(200, t);
        let again = cache.get_or_build(200, t);
        assert!(Arc::ptr_eq(&a, &again));
        cache.get_or_build(201, t);
        cache.get_or_build(202, t);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(200));
        assert!(cache.contains(201) && cache.contains(202));
    }
}
