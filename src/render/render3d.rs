//! Terrain pass: casts one ray per `stride` columns and paints the spans.

use crate::render::SCREEN_WIDTH;
use crate::render::casters::{ColumnCaster, Span};
use crate::render::framebuffer::Framebuffer;

/// Screen columns covered by the ray cast at column `ray`. The first ray also
/// covers the columns to its left, which get no ray of their own.
#[inline]
pub fn ray_columns(ray: usize, stride: usize) -> (usize, usize) {
    let x0 = if ray == stride { 0 } else { ray };
    (x0, (ray + stride).min(SCREEN_WIDTH))
}

fn paint_spans(target: &mut Framebuffer, ray: usize, stride: usize, spans: &[Span]) {
    let (x0, x1) = ray_columns(ray, stride);
    for span in spans {
        target.fill_rect(x0, x1, span.top, span.bottom, span.color);
    }
}

/// Renders the terrain into `target` (expected transparent-cleared).
#[cfg(not(feature = "parallel"))]
pub fn render_terrain(caster: &ColumnCaster<'_>, stride: usize, target: &mut Framebuffer) {
    let mut spans = Vec::with_capacity(64);
    for ray in (stride..SCREEN_WIDTH).step_by(stride) {
        spans.clear();
        caster.cast_ray(ray, &mut spans);
        paint_spans(target, ray, stride, &spans);
    }
}

/// Renders the terrain into `target` (expected transparent-cleared). Rays
/// are cast on the rayon pool; painting stays on the calling thread.
#[cfg(feature = "parallel")]
pub fn render_terrain(caster: &ColumnCaster<'_>, stride: usize, target: &mut Framebuffer) {
    use rayon::prelude::*;

    let columns: Vec<(usize, Vec<Span>)> = (stride..SCREEN_WIDTH)
        .step_by(stride)
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|ray| {
            let mut spans = Vec::with_capacity(64);
            caster.cast_ray(ray, &mut spans);
            (ray, spans)
        })
        .collect();
    for (ray, spans) in &columns {
        paint_spans(target, *ray, stride, spans);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_ray_covers_left_edge() {
        assert_eq!(ray_columns(2, 2), (0, 4));
        assert_eq!(ray_columns(4, 2), (4, 6));
        assert_eq!(ray_columns(1, 1), (0, 2));
        assert_eq!(ray_columns(316, 4), (316, 320));
        assert_eq!(ray_columns(318, 2), (318, 320));
    }

    #[test]
    fn every_column_is_covered_for_each_stride() {
        for stride in [1, 2, 4] {
            let mut covered = [false; SCREEN_WIDTH];
            for ray in (stride..SCREEN_WIDTH).step_by(stride) {
                let (x0, x1) = ray_columns(ray, stride);
                covered[x0..x1].iter_mut().for_each(|c| *c = true);
            }
            assert!(covered.iter().all(|&c| c), "stride {stride}");
        }
    }
}
