// src/image/transform.rs

//! Rotation and resampling for `RasterImage`.
//!
//! Both operations return a new image. Resampling fills the output row by row;
//! with the `rayon` feature the rows are distributed across worker threads.
//! Every output row is computed from the source alone, so the parallel and
//! sequential paths produce identical pixels.

use crate::image::image_formats::{RasterImage, Rgba};
use crate::utils::error::{PuzzleError, Result};

/// Sampling filter used by [`RasterImage::resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    /// Bilinear interpolation between the four neighbouring source pixels.
    #[default]
    Bilinear,
    /// Nearest source pixel, no blending.
    Point,
}

/// Counter-clockwise quarter-turn rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(degrees: u32) -> Option<Rotation> {
        match degrees {
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Integer (sin, cos) of the angle.
    fn sin_cos(self) -> (i64, i64) {
        match self {
            Rotation::Deg90 => (1, 0),
            Rotation::Deg180 => (0, -1),
            Rotation::Deg270 => (-1, 0),
        }
    }
}

impl RasterImage {
    /// Rotates the image counter-clockwise about its centre.
    ///
    /// Each output pixel is inverse-mapped into the source with nearest-neighbour
    /// sampling in a bottom-left-origin frame whose centre is
    /// `(width / 2 - 1, height / 2)`. Output pixels that map outside the source
    /// become [`Rgba::TRANSPARENT_WHITE`]. The output keeps the source dimensions.
    pub fn rotate(&self, rotation: Rotation) -> RasterImage {
        let w = self.width() as i64;
        let h = self.height() as i64;
        let xc = w / 2 - 1;
        let yc = h / 2;
        let (sn, cs) = rotation.sin_cos();

        RasterImage::from_fn(self.width(), self.height(), |i, row| {
            let i = i as i64;
            let j = h - 1 - row as i64;
            let x = cs * (i - xc) + sn * (j - yc) + xc;
            let y = -sn * (i - xc) + cs * (j - yc) + yc;
            if x >= 0 && x < w && y >= 0 && y < h {
                self.get_pixel(x as u32, (h - 1 - y) as u32)
            } else {
                Rgba::TRANSPARENT_WHITE
            }
        })
    }

    /// Rotates by a multiple of 90 degrees given as a number.
    pub fn rotate_degrees(&self, degrees: u32) -> Result<RasterImage> {
        let rotation = Rotation::from_degrees(degrees).ok_or_else(|| {
            PuzzleError::InvalidArgument(format!(
                "rotation must be 90, 180 or 270 degrees, got {}",
                degrees
            ))
        })?;
        Ok(self.rotate(rotation))
    }

    /// Resamples the image to `new_width` x `new_height`.
    pub fn resize(&self, new_width: u32, new_height: u32, filter: Resample) -> Result<RasterImage> {
        if self.is_empty() {
            return Err(PuzzleError::InvalidArgument(
                "cannot resize an empty image".to_string(),
            ));
        }
        if new_width == 0 || new_height == 0 {
            return Err(PuzzleError::InvalidArgument(format!(
                "resize target {}x{} is empty",
                new_width, new_height
            )));
        }

        let sampler = Sampler::new(self, new_width, new_height, filter);
        let mut out = vec![Rgba::TRANSPARENT; new_width as usize * new_height as usize];

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            out.par_chunks_mut(new_width as usize)
                .enumerate()
                .for_each(|(y, row)| sampler.fill_row(y as u32, row));
        }
        #[cfg(not(feature = "rayon"))]
        {
            out.chunks_mut(new_width as usize)
                .enumerate()
                .for_each(|(y, row)| sampler.fill_row(y as u32, row));
        }

        RasterImage::from_vec(new_width, new_height, out)
    }

    /// Scales both axes by `scale`, truncating the target size.
    pub fn scale(&self, scale: f32, filter: Resample) -> Result<RasterImage> {
        let new_width = (self.width() as f32 * scale) as u32;
        let new_height = (self.height() as f32 * scale) as u32;
        self.resize(new_width, new_height, filter)
    }
}

/// Read-only resampling state shared by all output rows.
struct Sampler<'a> {
    src: &'a RasterImage,
    filter: Resample,
    ratio_x: f32,
    ratio_y: f32,
}

impl<'a> Sampler<'a> {
    fn new(src: &'a RasterImage, new_width: u32, new_height: u32, filter: Resample) -> Self {
        let (ratio_x, ratio_y) = match filter {
            // Maps the last output pixel onto the last source pixel pair.
            Resample::Bilinear => (
                (src.width() - 1) as f32 / new_width as f32,
                (src.height() - 1) as f32 / new_height as f32,
            ),
            Resample::Point => (
                src.width() as f32 / new_width as f32,
                src.height() as f32 / new_height as f32,
            ),
        };
        Sampler {
            src,
            filter,
            ratio_x,
            ratio_y,
        }
    }

    fn fill_row(&self, y: u32, row: &mut [Rgba]) {
        match self.filter {
            Resample::Bilinear => self.bilinear_row(y, row),
            Resample::Point => self.point_row(y, row),
        }
    }

    fn bilinear_row(&self, y: u32, row: &mut [Rgba]) {
        let max_x = self.src.width() - 1;
        let max_y = self.src.height() - 1;

        let fy = y as f32 * self.ratio_y;
        let y1 = (fy.floor() as u32).min(max_y);
        let y2 = (y1 + 1).min(max_y);
        let y_lerp = fy - y1 as f32;

        for (x, out) in row.iter_mut().enumerate() {
            let fx = x as f32 * self.ratio_x;
            let x1 = (fx.floor() as u32).min(max_x);
            let x2 = (x1 + 1).min(max_x);
            let x_lerp = fx - x1 as f32;

            let top = lerp(self.src.get_pixel(x1, y1), self.src.get_pixel(x2, y1), x_lerp);
            let bottom = lerp(self.src.get_pixel(x1, y2), self.src.get_pixel(x2, y2), x_lerp);
            *out = to_rgba(lerp_f(top, bottom, y_lerp));
        }
    }

    fn point_row(&self, y: u32, row: &mut [Rgba]) {
        let max_x = self.src.width() - 1;
        let sy = ((y as f32 * self.ratio_y) as u32).min(self.src.height() - 1);
        for (x, out) in row.iter_mut().enumerate() {
            let sx = ((x as f32 * self.ratio_x) as u32).min(max_x);
            *out = self.src.get_pixel(sx, sy);
        }
    }
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> [f32; 4] {
    let a = [a.r as f32, a.g as f32, a.b as f32, a.a as f32];
    let b = [b.r as f32, b.g as f32, b.b as f32, b.a as f32];
    lerp_f(a, b, t)
}

fn lerp_f(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn to_rgba(c: [f32; 4]) -> Rgba {
    let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Rgba::new(q(c[0]), q(c[1]), q(c[2]), q(c[3]))
}
