//! Grid addressing shared by generation and runtime piece matching.
//!
//! ## Coordinate convention
//!
//! Row 0 is the **bottom** row of the picture and rows grow upwards; column 0
//! is the left column. A piece's `Top` edge therefore faces row + 1 and its
//! `Bottom` edge faces row - 1. Piece IDs are row-major: `id = row * cols + col`.

use crate::puzzle::joint::JointPosition;
use crate::puzzle::piece::PieceInfo;

/// A cell address in the puzzle grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: u32,
    pub col: u32,
}

impl GridPos {
    pub fn new(row: u32, col: u32) -> Self {
        GridPos { row, col }
    }
}

/// Converts a row-major piece ID into its grid cell.
pub fn array_pos_to_rc(id: u32, rows: u32, cols: u32) -> Option<GridPos> {
    if rows == 0 || cols == 0 || id >= rows.checked_mul(cols)? {
        return None;
    }
    Some(GridPos::new(id / cols, id % cols))
}

/// Converts a grid cell into its row-major piece ID.
pub fn rc_to_array_pos(pos: GridPos, rows: u32, cols: u32) -> Option<u32> {
    if pos.row >= rows || pos.col >= cols {
        return None;
    }
    Some(pos.row * cols + pos.col)
}

/// The cell across `side` from `pos`, if it lies inside the grid.
pub fn neighbor(pos: GridPos, side: JointPosition, rows: u32, cols: u32) -> Option<GridPos> {
    let (row, col) = match side {
        JointPosition::Top => (pos.row.checked_add(1)?, pos.col),
        JointPosition::Bottom => (pos.row.checked_sub(1)?, pos.col),
        JointPosition::Left => (pos.row, pos.col.checked_sub(1)?),
        JointPosition::Right => (pos.row, pos.col.checked_add(1)?),
    };
    (row < rows && col < cols).then_some(GridPos::new(row, col))
}

/// True when `piece`'s `side` joint and `other`'s facing joint interlock.
///
/// This is the check a gameplay layer repeats when two pieces touch.
pub fn can_join(piece: &PieceInfo, side: JointPosition, other: &PieceInfo) -> bool {
    match (piece.joint(side), other.joint(side.opposite())) {
        (Some(a), Some(b)) => a.fits(&b),
        _ => false,
    }
}

/// Texture coordinates of one piece inside the puzzle image, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

/// Per-piece inset keeping samples away from neighbouring cells.
const UV_INSET: f32 = 0.0012;

/// UV rectangle for the cell at `pos`, shrunk by a small inset that scales
/// with the grid size.
pub fn piece_uv_rect(pos: GridPos, rows: u32, cols: u32) -> UvRect {
    let piece_w = 1.0 / cols as f32;
    let piece_h = 1.0 / rows as f32;

    let start_x = piece_w * pos.col as f32 + UV_INSET * cols as f32;
    let start_y = piece_h * pos.row as f32 + UV_INSET * rows as f32;
    UvRect {
        start_x,
        start_y,
        end_x: start_x + piece_w - 2.0 * UV_INSET * cols as f32,
        end_y: start_y + piece_h - 2.0 * UV_INSET * rows as f32,
    }
}
