//! Desaturated copy of the puzzle picture, shown as a solving aid.

use crate::image::image_formats::{RasterImage, Rgba};

/// Returns a grayscale copy of `source` using the perceptual weights of
/// [`Rgba::luminance`]. Alpha is kept as is.
pub fn build_helper_image(source: &RasterImage) -> RasterImage {
    let mut helper = source.clone();
    for px in helper.pixels_mut() {
        let gray = px.luminance();
        *px = Rgba::new(gray, gray, gray, px.a);
    }
    helper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_image_is_gray_with_alpha_kept() {
        let source = RasterImage::from_fn(3, 2, |x, y| Rgba::new(200, (x * 40) as u8, 10, (y * 100 + 50) as u8));
        let helper = build_helper_image(&source);
        assert_eq!(helper.dimensions(), (3, 2));
        for (src, out) in source.pixels().iter().zip(helper.pixels()) {
            assert_eq!(out.r, out.g);
            assert_eq!(out.g, out.b);
            assert_eq!(out.r, src.luminance());
            assert_eq!(out.a, src.a);
        }
    }

    #[test]
    fn test_primary_weights() {
        let source = RasterImage::from_fn(4, 1, |x, _| match x {
            0 => Rgba::opaque(255, 0, 0),
            1 => Rgba::opaque(0, 255, 0),
            2 => Rgba::opaque(0, 0, 255),
            _ => Rgba::WHITE,
        });
        let helper = build_helper_image(&source);
        let grays: Vec<u8> = helper.pixels().iter().map(|p| p.r).collect();
        assert_eq!(grays, vec![76, 150, 29, 255]);
    }

    #[test]
    fn test_source_is_untouched() {
        let source = RasterImage::from_pixel(2, 2, Rgba::opaque(10, 200, 30));
        let copy = source.clone();
        let _ = build_helper_image(&source);
        assert_eq!(source, copy);
    }
}
