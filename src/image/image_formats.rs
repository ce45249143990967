// src/image/image_formats.rs

//! In-memory RGBA raster images.
//!
//! `RasterImage` is the single pixel buffer used throughout the puzzle maker:
//! source pictures, joint mask styles, the stamped joint-content layers and the
//! helper image. Pixels are stored row-major with the origin at the top-left,
//! which is also the PNG row order, so encoding needs no flipping.

use crate::utils::error::{PuzzleError, Result};
use bytemuck::{Pod, Zeroable};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

// --- Pixel Type Definitions ---

/// A single RGBA pixel with 8-bit components.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, the value of a freshly allocated buffer.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Fill colour for pixels that rotation maps outside the source.
    pub const TRANSPARENT_WHITE: Rgba = Rgba::new(255, 255, 255, 0);

    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    /// True for opaque pure black, the only foreground value of a joint mask.
    pub fn is_black(&self) -> bool {
        *self == Rgba::BLACK
    }

    pub fn is_white_rgb(&self) -> bool {
        self.r == 255 && self.g == 255 && self.b == 255
    }

    /// Perceptual grayscale of this pixel (0.299 R + 0.587 G + 0.114 B).
    pub fn luminance(&self) -> u8 {
        let gray = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        gray.round().clamp(0.0, 255.0) as u8
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(arr: [u8; 4]) -> Self {
        Rgba::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(p: Rgba) -> Self {
        [p.r, p.g, p.b, p.a]
    }
}

// --- RasterImage Type ---

/// A 2D buffer of RGBA pixels stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<Rgba>,
}

impl RasterImage {
    /// Creates a new image with the given dimensions, initialized to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_pixel(width, height, Rgba::TRANSPARENT)
    }

    /// Creates an image filled with a single pixel value.
    pub fn from_pixel(width: u32, height: u32, pixel: Rgba) -> Self {
        RasterImage {
            width,
            height,
            data: vec![pixel; width as usize * height as usize],
        }
    }

    /// Creates an image from a row-major vector of pixels.
    pub fn from_vec(width: u32, height: u32, data: Vec<Rgba>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(PuzzleError::InvalidArgument(format!(
                "pixel buffer holds {} pixels, {}x{} needs {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(RasterImage {
            width,
            height,
            data,
        })
    }

    /// Creates an image by calling a function for each pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgba,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        RasterImage {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major index of `(x, y)`.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.width && y < self.height);
        self.data[self.index_of(x, y)]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba) {
        assert!(x < self.width && y < self.height);
        let idx = self.index_of(x, y);
        self.data[idx] = pixel;
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    /// Returns raw pixel data as a byte slice (RGBA8).
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Encodes the image as an RGBA8 PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Err(PuzzleError::InvalidArgument(
                "cannot encode an empty image".to_string(),
            ));
        }
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(
            self.as_raw(),
            self.width,
            self.height,
            ExtendedColorType::Rgba8,
        )?;
        Ok(out)
    }

    /// Decodes a PNG of any colour type into an RGBA8 image.
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
        Ok(Self::from(decoded.into_rgba8()))
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let data = bytemuck::cast_slice::<u8, Rgba>(img.as_raw()).to_vec();
        RasterImage {
            width,
            height,
            data,
        }
    }
}

impl From<&RasterImage> for RgbaImage {
    fn from(img: &RasterImage) -> Self {
        RgbaImage::from_fn(img.width, img.height, |x, y| {
            image::Rgba(img.get_pixel(x, y).into())
        })
    }
}
