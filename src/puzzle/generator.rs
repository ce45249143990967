//! Joint assignment and rasterization for a full piece grid.
//!
//! The generator walks the grid row by row (row 0 is the bottom row, see
//! [`crate::puzzle::grid`]) and, for every cell, handles the edges in the order
//! Right, Left, Top, Bottom:
//!
//! * **Right** / **Top** edges are drawn fresh: a style is picked uniformly and
//!   the joint type comes from a uniform real draw compared against
//!   [`FEMALE_THRESHOLD`]. Right draws over `[1, 18)` (P(female) = 8/17), Top
//!   over `[1, 17)` (P(female) = 7/16). The two ranges differ on purpose and
//!   must stay as they are.
//! * **Left** / **Bottom** edges copy the complement of the neighbour's Right /
//!   Top joint, so every shared edge is male on one side and female on the
//!   other. Only the style used for drawing is picked again.
//!
//! Male joints are stamped as opaque black into a full-size layer per edge
//! direction. The stamp lands in the neighbouring cell, where the neighbour has
//! the matching female notch. Once every cell is done, each stamped pixel is
//! filled with the source picture's pixel, and the same pixel is made
//! transparent in the cut-out copy of the source.

use crate::image::geom::Rect;
use crate::image::image_formats::{RasterImage, Rgba};
use crate::mask::joint_mask::{is_stamp_ink, JointMaskSet};
use crate::puzzle::grid::GridPos;
use crate::puzzle::joint::{JointInfo, JointPosition, JointType};
use crate::puzzle::piece::PieceInfo;
use crate::utils::error::{PuzzleError, Result};
use log::{debug, error};
use rand::Rng;
use std::ops::Range;

/// Draw range for Right-edge joint types.
pub const RIGHT_DRAW_RANGE: Range<f32> = 1.0..18.0;

/// Draw range for Top-edge joint types.
pub const TOP_DRAW_RANGE: Range<f32> = 1.0..17.0;

/// Draws at or above this value are female.
pub const FEMALE_THRESHOLD: f32 = 10.0;

/// Marker written into direction layers where a male joint was stamped.
const STAMP: Rgba = Rgba::BLACK;

/// Draws a joint type from a uniform value in `range`.
pub fn draw_joint_type<R: Rng + ?Sized>(rng: &mut R, range: Range<f32>) -> JointType {
    if rng.random_range(range) >= FEMALE_THRESHOLD {
        JointType::Female
    } else {
        JointType::Male
    }
}

/// Everything grid generation produces.
#[derive(Debug, Clone)]
pub struct GeneratedGrid {
    pub rows: u32,
    pub cols: u32,
    pub piece_width: u32,
    pub piece_height: u32,
    /// Row-major, `rows * cols` entries.
    pub pieces: Vec<PieceInfo>,
    pub image_with_joints_cut_out: RasterImage,
    pub top_joints_image: RasterImage,
    pub bottom_joints_image: RasterImage,
    pub left_joints_image: RasterImage,
    pub right_joints_image: RasterImage,
}

/// Per-direction stamp layers, all the size of the source image.
struct JointLayers {
    top: RasterImage,
    bottom: RasterImage,
    left: RasterImage,
    right: RasterImage,
}

impl JointLayers {
    fn new(width: u32, height: u32) -> Self {
        JointLayers {
            top: RasterImage::new(width, height),
            bottom: RasterImage::new(width, height),
            left: RasterImage::new(width, height),
            right: RasterImage::new(width, height),
        }
    }

    fn get_mut(&mut self, position: JointPosition) -> &mut RasterImage {
        match position {
            JointPosition::Top => &mut self.top,
            JointPosition::Bottom => &mut self.bottom,
            JointPosition::Left => &mut self.left,
            JointPosition::Right => &mut self.right,
        }
    }
}

/// Walks a `rows` x `cols` grid over one source image.
pub struct PieceGridGenerator<'a> {
    source: &'a RasterImage,
    masks: &'a JointMaskSet,
    rows: u32,
    cols: u32,
    piece_width: u32,
    piece_height: u32,
}

impl<'a> PieceGridGenerator<'a> {
    /// Creates a generator. Cell size is the source size divided by the grid
    /// size, truncated.
    pub fn new(source: &'a RasterImage, masks: &'a JointMaskSet, rows: u32, cols: u32) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(PuzzleError::InvalidDimensions { rows, cols });
        }
        if masks.is_empty() {
            return Err(PuzzleError::InvalidArgument(
                "no prepared joint mask styles".to_string(),
            ));
        }
        let piece_width = source.width() / cols;
        let piece_height = source.height() / rows;
        if piece_width == 0 || piece_height == 0 {
            return Err(PuzzleError::InvalidArgument(format!(
                "{}x{} image is too small for a {}x{} grid",
                source.width(),
                source.height(),
                rows,
                cols
            )));
        }
        Ok(PieceGridGenerator {
            source,
            masks,
            rows,
            cols,
            piece_width,
            piece_height,
        })
    }

    /// Assigns joints to every cell and rasterizes the joint layers.
    ///
    /// Nothing is returned unless the whole grid succeeds.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedGrid> {
        let (width, height) = self.source.dimensions();
        let mut layers = JointLayers::new(width, height);
        let mut pieces: Vec<PieceInfo> = (0..self.rows * self.cols).map(PieceInfo::new).collect();

        for row in 0..self.rows {
            for col in 0..self.cols {
                self.generate_cell(row, col, &mut pieces, &mut layers, rng)?;
            }
        }

        let image_with_joints_cut_out = self.fill_joint_layers(&mut layers);
        debug!(
            "generated {}x{} grid, pieces {}x{} px",
            self.rows, self.cols, self.piece_width, self.piece_height
        );

        Ok(GeneratedGrid {
            rows: self.rows,
            cols: self.cols,
            piece_width: self.piece_width,
            piece_height: self.piece_height,
            pieces,
            image_with_joints_cut_out,
            top_joints_image: layers.top,
            bottom_joints_image: layers.bottom,
            left_joints_image: layers.left,
            right_joints_image: layers.right,
        })
    }

    fn index(&self, row: u32, col: u32) -> usize {
        (row * self.cols + col) as usize
    }

    fn generate_cell<R: Rng + ?Sized>(
        &self,
        row: u32,
        col: u32,
        pieces: &mut [PieceInfo],
        layers: &mut JointLayers,
        rng: &mut R,
    ) -> Result<()> {
        let pos = GridPos::new(row, col);
        let idx = self.index(row, col);

        if col < self.cols - 1 {
            let style = self.pick_style(rng);
            let joint_type = draw_joint_type(rng, RIGHT_DRAW_RANGE);
            self.place_joint(pos, JointPosition::Right, joint_type, style, &mut pieces[idx], layers)?;
        }

        if col > 0 {
            let style = self.pick_style(rng);
            let neighbor = self.neighbor_joint(pieces, row, col - 1, JointPosition::Right)?;
            let joint_type = neighbor.joint_type().complement();
            self.place_joint(pos, JointPosition::Left, joint_type, style, &mut pieces[idx], layers)?;
        }

        if row < self.rows - 1 {
            let style = self.pick_style(rng);
            let joint_type = draw_joint_type(rng, TOP_DRAW_RANGE);
            self.place_joint(pos, JointPosition::Top, joint_type, style, &mut pieces[idx], layers)?;
        }

        if row > 0 {
            let style = self.pick_style(rng);
            let neighbor = self.neighbor_joint(pieces, row - 1, col, JointPosition::Top)?;
            let joint_type = neighbor.joint_type().complement();
            self.place_joint(pos, JointPosition::Bottom, joint_type, style, &mut pieces[idx], layers)?;
        }

        Ok(())
    }

    fn pick_style<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.masks.len())
    }

    /// Looks up a joint that an earlier cell must already have recorded.
    fn neighbor_joint(
        &self,
        pieces: &[PieceInfo],
        row: u32,
        col: u32,
        position: JointPosition,
    ) -> Result<JointInfo> {
        pieces[self.index(row, col)].joint(position).ok_or_else(|| {
            error!(
                "grid generation: cell ({}, {}) has no {:?} joint",
                row, col, position
            );
            PuzzleError::GenerationInvariant { row, col, position }
        })
    }

    /// Records a joint on `piece` and stamps it if it is male.
    fn place_joint(
        &self,
        pos: GridPos,
        position: JointPosition,
        joint_type: JointType,
        style: usize,
        piece: &mut PieceInfo,
        layers: &mut JointLayers,
    ) -> Result<()> {
        let oriented = self.masks.style(style);
        let extent = oriented.extent();
        let joint = JointInfo::new(joint_type, position, extent.width(), extent.height());
        if !piece.add_joint(joint) {
            error!(
                "grid generation: cell ({}, {}) already has a {:?} joint",
                pos.row, pos.col, position
            );
            return Err(PuzzleError::GenerationInvariant {
                row: pos.row,
                col: pos.col,
                position,
            });
        }

        if joint_type == JointType::Male {
            let mask = oriented.get(position);
            let (x, y) = self.joint_origin(pos, position, mask);
            stamp(layers.get_mut(position), mask, x, y);
        }
        Ok(())
    }

    /// Bottom-left corner of a joint mask, in bottom-left-origin image space.
    fn joint_origin(&self, pos: GridPos, position: JointPosition, mask: &RasterImage) -> (i64, i64) {
        let pw = self.piece_width as i64;
        let ph = self.piece_height as i64;
        let piece_x = pos.col as i64 * pw;
        let piece_y = pos.row as i64 * ph;
        let mw = mask.width() as i64;
        let mh = mask.height() as i64;

        match position {
            JointPosition::Right => (piece_x + pw, piece_y + ph / 2 - mh / 2),
            JointPosition::Left => (piece_x - mw, piece_y + ph / 2 - mh / 2),
            JointPosition::Top => (piece_x + pw / 2 - mw / 2, piece_y + ph),
            JointPosition::Bottom => (piece_x + pw / 2 - mw / 2, piece_y - mh),
        }
    }

    /// Copies source pixels under stamps into the layers and returns the
    /// source with those pixels made transparent.
    fn fill_joint_layers(&self, layers: &mut JointLayers) -> RasterImage {
        let mut cut_out = self.source.clone();
        let source = self.source.pixels();

        for (idx, out) in cut_out.pixels_mut().iter_mut().enumerate() {
            let mut touched = false;
            for layer in [
                &mut layers.top,
                &mut layers.bottom,
                &mut layers.left,
                &mut layers.right,
            ] {
                let px = &mut layer.pixels_mut()[idx];
                if *px == STAMP {
                    *px = source[idx];
                    touched = true;
                }
            }
            if touched {
                *out = Rgba::TRANSPARENT;
            }
        }
        cut_out
    }
}

/// Stamps the ink pixels of `mask` into `dest` with the mask's bottom-left
/// corner at `(x, y)` in bottom-left-origin coordinates. Parts falling
/// outside `dest` are clipped.
fn stamp(dest: &mut RasterImage, mask: &RasterImage, x: i64, y: i64) {
    let dest_h = dest.height() as i64;
    let top = dest_h - y - mask.height() as i64;

    let dest_rect = Rect::new(0, 0, dest.width(), dest.height());
    let mask_rect = Rect::new(x as i32, top as i32, mask.width(), mask.height());
    let overlap = dest_rect.intersection(&mask_rect);
    if overlap.is_empty() {
        return;
    }

    for dy in 0..overlap.height {
        for dx in 0..overlap.width {
            let dest_x = (overlap.x + dx as i32) as u32;
            let dest_y = (overlap.y + dy as i32) as u32;
            let mask_x = (dest_x as i32 - mask_rect.x) as u32;
            let mask_y = (dest_y as i32 - mask_rect.y) as u32;
            if is_stamp_ink(mask.get_pixel(mask_x, mask_y)) {
                dest.put_pixel(dest_x, dest_y, STAMP);
            }
        }
    }
}
