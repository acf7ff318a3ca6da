//! Contrast stages operating on Lab lightness.
//!
//! Both stages leave a\* and b\* untouched, so hue does not shift.
//!
//! - [`local_contrast`]: contrast-limited adaptive histogram equalization
//!   (CLAHE) over an 8×8 tile grid, with bilinear blending between tile
//!   mappings to hide tile seams.
//! - [`stretch_contrast`]: linear remap pushing the 1st/99th lightness
//!   percentiles to black/white.

use super::color::{self, LabPlanes};
use image::RgbImage;

const GRID: u32 = 8;
const BINS: usize = 256;
/// Minimum accepted clip limit; lower values are raised to it.
pub const MIN_CLIP: f32 = 0.5;

pub const LOW_PERCENTILE: f32 = 1.0;
pub const HIGH_PERCENTILE: f32 = 99.0;

/// CLAHE on the lightness channel.
///
/// `clip` bounds each histogram bin at `clip × tile_area / 256` samples
/// before the tile's mapping is built; the clipped excess is spread evenly
/// over all bins, which flattens the mapping in low-texture tiles.
pub fn local_contrast(img: &RgbImage, clip: f32) -> RgbImage {
    let mut lab = color::rgb_to_lab(img);
    let bins: Vec<u8> = lab.l.iter().map(|&l| lightness_bin(l)).collect();
    let mapped = clahe(&bins, lab.width, lab.height, clip.max(MIN_CLIP));
    for (l, m) in lab.l.iter_mut().zip(mapped) {
        *l = m * 100.0 / 255.0;
    }
    color::lab_to_rgb(&lab)
}

#[inline]
fn lightness_bin(l: f32) -> u8 {
    color::to_u8(l * 255.0 / 100.0)
}

/// Per-tile lookup tables, row-major over the tile grid.
struct TileMaps {
    cols: u32,
    rows: u32,
    luts: Vec<[f32; BINS]>,
}

impl TileMaps {
    fn lut(&self, col: u32, row: u32) -> &[f32; BINS] {
        &self.luts[(row * self.cols + col) as usize]
    }
}

/// Equalize an 8-bit plane; returns mapped values on the 0–255 scale.
fn clahe(plane: &[u8], width: u32, height: u32, clip: f32) -> Vec<f32> {
    let cols = GRID.min(width);
    let rows = GRID.min(height);
    let tile_x = |i: u32| (i * width / cols, (i + 1) * width / cols);
    let tile_y = |j: u32| (j * height / rows, (j + 1) * height / rows);

    let mut luts = Vec::with_capacity((cols * rows) as usize);
    for j in 0..rows {
        let (y0, y1) = tile_y(j);
        for i in 0..cols {
            let (x0, x1) = tile_x(i);
            let mut hist = [0f32; BINS];
            for y in y0..y1 {
                let row = &plane[(y * width) as usize..((y + 1) * width) as usize];
                for &v in &row[x0 as usize..x1 as usize] {
                    hist[v as usize] += 1.0;
                }
            }
            let area = ((x1 - x0) * (y1 - y0)) as f32;
            luts.push(tile_lut(&mut hist, area, clip));
        }
    }
    let maps = TileMaps { cols, rows, luts };

    let tile_w = width as f32 / cols as f32;
    let tile_h = height as f32 / rows as f32;
    let mut out = Vec::with_capacity(plane.len());
    for y in 0..height {
        let (r0, r1, fy) = neighbors(y, tile_h, rows);
        for x in 0..width {
            let (c0, c1, fx) = neighbors(x, tile_w, cols);
            let v = plane[(y * width + x) as usize] as usize;
            let top = maps.lut(c0, r0)[v] * (1.0 - fx) + maps.lut(c1, r0)[v] * fx;
            let bottom = maps.lut(c0, r1)[v] * (1.0 - fx) + maps.lut(c1, r1)[v] * fx;
            out.push(top * (1.0 - fy) + bottom * fy);
        }
    }
    out
}

/// The two tiles whose centers bracket `pos`, and the blend weight of the
/// second one.
fn neighbors(pos: u32, tile: f32, count: u32) -> (u32, u32, f32) {
    let t = (pos as f32 + 0.5) / tile - 0.5;
    let first = t.floor().clamp(0.0, (count - 1) as f32);
    let second = (first + 1.0).min((count - 1) as f32);
    let weight = (t - first).clamp(0.0, 1.0);
    (first as u32, second as u32, weight)
}

/// Clip a tile histogram, redistribute the excess, and build its CDF mapping.
fn tile_lut(hist: &mut [f32; BINS], area: f32, clip: f32) -> [f32; BINS] {
    let limit = (clip * area / BINS as f32).max(1.0);
    let mut excess = 0.0;
    for h in hist.iter_mut() {
        if *h > limit {
            excess += *h - limit;
            *h = limit;
        }
    }
    let share = excess / BINS as f32;

    // Each bin maps to the midpoint of its CDF step, which keeps an
    // unclipped uniform histogram close to the identity mapping.
    let scale = 255.0 / area.max(1.0);
    let mut below = 0.0;
    std::array::from_fn(|i| {
        let count = hist[i] + share;
        let mid = below + count / 2.0;
        below += count;
        (mid * scale).clamp(0.0, 255.0)
    })
}

/// Percentile-based linear stretch of lightness.
///
/// When the percentile window is empty (a flat image) the input is returned
/// unchanged.
pub fn stretch_contrast(img: &RgbImage) -> RgbImage {
    let mut lab = color::rgb_to_lab(img);
    let Some((lo, hi)) = lightness_window(&lab) else {
        return img.clone();
    };
    let gain = 100.0 / (hi - lo);
    for l in lab.l.iter_mut() {
        *l = ((*l - lo) * gain).clamp(0.0, 100.0);
    }
    color::lab_to_rgb(&lab)
}

fn lightness_window(lab: &LabPlanes) -> Option<(f32, f32)> {
    let mut sorted = lab.l.clone();
    sorted.sort_unstable_by(f32::total_cmp);
    let lo = percentile(&sorted, LOW_PERCENTILE);
    let hi = percentile(&sorted, HIGH_PERCENTILE);
    (hi - lo > f32::EPSILON).then_some((lo, hi))
}

/// Linear-interpolated percentile of an ascending slice.
fn percentile(sorted: &[f32], p: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f32;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let frac = rank - below as f32;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}
