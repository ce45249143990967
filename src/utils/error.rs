// src/utils/error.rs

use crate::puzzle::joint::JointPosition;
use thiserror::Error;

/// The primary error type for all operations in the puzzle maker library.
#[derive(Error, Debug)]
pub enum PuzzleError {
    /// A required input was missing or empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The grid has fewer than two rows or two columns.
    #[error("Invalid grid dimensions: {rows} rows x {cols} cols (both must be at least 2)")]
    InvalidDimensions { rows: u32, cols: u32 },

    /// A joint style image is not square.
    #[error("Joint mask style {style} must be square, got {width}x{height}")]
    InvalidMaskShape { style: usize, width: u32, height: u32 },

    /// A joint style image contains a pixel that is neither black nor white.
    #[error("Joint mask style {style} has a non black/white pixel at ({x}, {y})")]
    NonBinaryMask { style: usize, x: u32, y: u32 },

    /// The flood fill found no black foreground pixel.
    #[error("Joint mask contains no black foreground pixel")]
    EmptyMask,

    /// Grid generation found a neighbour joint missing or an edge already taken.
    #[error("Generation invariant violated at row {row}, col {col} ({position:?} joint)")]
    GenerationInvariant {
        row: u32,
        col: u32,
        position: JointPosition,
    },

    /// The stream does not start with the expected magic version number.
    #[error("Version mismatch: expected magic {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },

    /// Any other failure while reading a `.pm` stream.
    #[error("Corrupt puzzle file: {source}")]
    CorruptFile {
        #[source]
        source: Box<PuzzleError>,
    },

    /// A save was attempted with missing or inconsistent state.
    #[error("Incomplete puzzle state: {0}")]
    IncompleteState(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
}

impl PuzzleError {
    /// Wraps `self` as the cause of a `CorruptFile` error.
    pub fn into_corrupt(self) -> PuzzleError {
        PuzzleError::CorruptFile {
            source: Box::new(self),
        }
    }
}

/// A specialized `Result` type for puzzle maker operations.
pub type Result<T> = std::result::Result<T, PuzzleError>;
