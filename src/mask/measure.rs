//! Flood-fill measurement of the ink inside a joint mask.
//!
//! Joint masks are black shapes on a white background. The recorded size of a
//! joint is the bounding box of the connected black region that contains the
//! first black pixel in raster order. Rows are scanned from the bottom of the
//! picture upwards, left to right within a row, matching the bottom-left grid
//! origin used by the generator.
//!
//! ## Algorithm
//!
//! 1. Raster-scan (bottom row first) for the first opaque pure-black pixel.
//! 2. Flood fill with 4-connectivity using an explicit stack; a bit per pixel
//!    marks pixels that were already pushed, so each pixel is visited once and
//!    memory stays bounded for large masks.
//! 3. Track min/max of x and y over all visited pixels.
//!
//! Anything that is not opaque pure black counts as background.

use crate::image::image_formats::RasterImage;
use crate::utils::error::{PuzzleError, Result};
use bitvec::prelude::*;

/// Inclusive bounding box of a flood-filled region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskExtent {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl MaskExtent {
    /// `max_x - min_x`: a single-pixel region has width 0.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    /// `max_y - min_y`: a single-pixel region has height 0.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }
}

/// Returns the first opaque black pixel, scanning rows bottom-up.
fn find_seed(mask: &RasterImage) -> Option<(u32, u32)> {
    (0..mask.height()).rev().find_map(|y| {
        (0..mask.width())
            .find(|&x| mask.get_pixel(x, y).is_black())
            .map(|x| (x, y))
    })
}

/// Measures the connected black region of `mask` that is reached first.
///
/// Fails with [`PuzzleError::EmptyMask`] when the mask contains no black pixel.
pub fn measure_joint_extent(mask: &RasterImage) -> Result<MaskExtent> {
    let (seed_x, seed_y) = find_seed(mask).ok_or(PuzzleError::EmptyMask)?;

    let width = mask.width();
    let height = mask.height();
    let mut queued: BitVec = bitvec![0; width as usize * height as usize];
    let mut stack: Vec<(u32, u32)> = vec![(seed_x, seed_y)];
    queued.set(mask.index_of(seed_x, seed_y), true);

    let mut extent = MaskExtent {
        min_x: seed_x,
        min_y: seed_y,
        max_x: seed_x,
        max_y: seed_y,
    };

    while let Some((x, y)) = stack.pop() {
        extent.min_x = extent.min_x.min(x);
        extent.min_y = extent.min_y.min(y);
        extent.max_x = extent.max_x.max(x);
        extent.max_y = extent.max_y.max(y);

        let mut visit = |nx: u32, ny: u32| {
            let idx = mask.index_of(nx, ny);
            if !queued[idx] && mask.pixels()[idx].is_black() {
                queued.set(idx, true);
                stack.push((nx, ny));
            }
        };

        if x + 1 < width {
            visit(x + 1, y);
        }
        if y + 1 < height {
            visit(x, y + 1);
        }
        if x > 0 {
            visit(x - 1, y);
        }
        if y > 0 {
            visit(x, y - 1);
        }
    }

    Ok(extent)
}
