//! Joint mask styles and their four oriented, piece-sized variants.
//!
//! A style is a square black-on-white picture of a Left joint: the tab grows
//! out of the mask's right edge, which is stamped against the piece border.
//! The other orientations are counter-clockwise rotations of it:
//!
//! | edge   | rotation |
//! |--------|----------|
//! | Left   | 0°       |
//! | Bottom | 90°      |
//! | Right  | 180°     |
//! | Top    | 270°     |
//!
//! Every variant is then resized so its width is `joint_scale` times the piece
//! width, keeping the style's aspect ratio. The variants are built once per
//! generation and shared by all cells.

use crate::image::image_formats::{RasterImage, Rgba};
use crate::image::transform::Rotation;
use crate::mask::measure::{measure_joint_extent, MaskExtent};
use crate::puzzle::joint::JointPosition;
use crate::puzzle::params::MakerParams;
use crate::utils::error::{PuzzleError, Result};
use log::{debug, error};

/// True when a pixel of an oriented mask should be stamped as joint ink.
///
/// Transparent pixels (including the fill that rotation leaves behind) and
/// white pixels are background.
pub fn is_stamp_ink(pixel: Rgba) -> bool {
    pixel.a >= 128 && !pixel.is_white_rgb()
}

/// Checks the user-supplied styles before any image processing.
///
/// Styles must be non-empty and square. With `strict` set, every pixel must be
/// opaque black, opaque white or fully transparent.
pub fn validate_styles(styles: &[RasterImage], strict: bool) -> Result<()> {
    if styles.is_empty() {
        return Err(PuzzleError::InvalidArgument(
            "at least one joint mask style is required".to_string(),
        ));
    }

    for (style, img) in styles.iter().enumerate() {
        if img.is_empty() {
            return Err(PuzzleError::InvalidArgument(format!(
                "joint mask style {} is empty",
                style
            )));
        }
        if img.width() != img.height() {
            return Err(PuzzleError::InvalidMaskShape {
                style,
                width: img.width(),
                height: img.height(),
            });
        }
        if strict {
            let bad = img
                .pixels()
                .iter()
                .position(|p| p.a != 0 && *p != Rgba::BLACK && *p != Rgba::WHITE);
            if let Some(idx) = bad {
                let width = img.width() as usize;
                return Err(PuzzleError::NonBinaryMask {
                    style,
                    x: (idx % width) as u32,
                    y: (idx / width) as u32,
                });
            }
        }
    }
    Ok(())
}

/// The four piece-sized orientations of one style plus its measured extent.
#[derive(Debug, Clone)]
pub struct OrientedMask {
    left: RasterImage,
    bottom: RasterImage,
    right: RasterImage,
    top: RasterImage,
    extent: MaskExtent,
}

impl OrientedMask {
    /// The variant used for joints on `position`.
    pub fn get(&self, position: JointPosition) -> &RasterImage {
        match position {
            JointPosition::Left => &self.left,
            JointPosition::Bottom => &self.bottom,
            JointPosition::Right => &self.right,
            JointPosition::Top => &self.top,
        }
    }

    /// Ink extent of the resized left variant; recorded on every joint drawn
    /// with this style regardless of edge.
    pub fn extent(&self) -> MaskExtent {
        self.extent
    }
}

/// All prepared styles for one generation run.
#[derive(Debug, Clone)]
pub struct JointMaskSet {
    styles: Vec<OrientedMask>,
}

impl JointMaskSet {
    /// Validates `styles`, then builds the oriented variants sized for pieces
    /// `piece_width` pixels wide.
    ///
    /// Fails with [`PuzzleError::EmptyMask`] if a resized style has no black
    /// pixel left to measure.
    pub fn prepare(styles: &[RasterImage], piece_width: u32, params: &MakerParams) -> Result<Self> {
        validate_styles(styles, params.strict_mask_validation)?;

        let mut prepared = Vec::with_capacity(styles.len());
        for (idx, style) in styles.iter().enumerate() {
            let (mask_w, mask_h) = mask_size(style, piece_width, params.joint_scale);
            if mask_w == 0 || mask_h == 0 {
                return Err(PuzzleError::InvalidArgument(format!(
                    "pieces {} px wide are too small for joint scale {}",
                    piece_width, params.joint_scale
                )));
            }

            let resize = |img: &RasterImage| img.resize(mask_w, mask_h, params.resample);
            let left = resize(style)?;
            let bottom = resize(&style.rotate(Rotation::Deg90))?;
            let right = resize(&style.rotate(Rotation::Deg180))?;
            let top = resize(&style.rotate(Rotation::Deg270))?;

            let extent = measure_joint_extent(&left).inspect_err(|_| {
                error!(
                    "joint mask style {} has no black pixel after resizing to {}x{}",
                    idx, mask_w, mask_h
                );
            })?;
            debug!(
                "joint mask style {}: {}x{} -> {}x{}, ink {}x{}",
                idx,
                style.width(),
                style.height(),
                mask_w,
                mask_h,
                extent.width(),
                extent.height()
            );

            prepared.push(OrientedMask {
                left,
                bottom,
                right,
                top,
                extent,
            });
        }

        Ok(JointMaskSet { styles: prepared })
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn style(&self, idx: usize) -> &OrientedMask {
        &self.styles[idx]
    }
}

/// Target size of a style's variants: `joint_scale * piece_width` wide, height
/// from the style's aspect ratio, both truncated.
fn mask_size(style: &RasterImage, piece_width: u32, joint_scale: f32) -> (u32, u32) {
    let width = (piece_width as f32 * joint_scale) as u32;
    let aspect = style.width() as f32 / style.height() as f32;
    let height = (width as f32 / aspect) as u32;
    (width, height)
}
