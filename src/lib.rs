//! A Rust library for cutting pictures into jigsaw puzzles.
//!
//! Given a source picture and one or more joint mask styles, the crate cuts
//! the picture into a grid of interlocking pieces, renders the images a game
//! needs to draw them, and stores the result in a `.pm` file.
//!
//! # Quick Start
//!
//! ```ignore
//! use puzzle_maker::{JointPosition, PuzzlePieceMaker, RasterImage};
//!
//! let picture = RasterImage::decode_png(&std::fs::read("picture.png")?)?;
//! let style = RasterImage::decode_png(&std::fs::read("joint.png")?)?;
//!
//! let puzzle = PuzzlePieceMaker::generate(&picture, &[style], 4, 5)?;
//! for piece in puzzle.pieces() {
//!     println!("{}", piece);
//! }
//! let right_tabs = puzzle.joint_content_image(JointPosition::Right);
//!
//! puzzle.save_file("picture.pm")?;
//! let again = PuzzlePieceMaker::load_file("picture.pm")?;
//! ```
//!
//! # Outputs
//!
//! - **Image with joints cut out**: the picture with male-joint pixels made
//!   transparent, used for the piece bodies
//! - **Joint content images**: one per edge direction, holding the picture
//!   pixels of every male joint on that kind of edge
//! - **Background image**: a grayscale copy shown as a solving aid
//! - **Piece records**: joint type, edge and measured size for every piece
//!
//! # Grid Convention
//!
//! Row 0 is the bottom row of the picture. A piece's `Top` edge faces row + 1.
//! Pieces are numbered row-major, `id = row * cols + col`.
//!
//! # Features
//!
//! - **rayon**: resample joint masks row-parallel

// Core modules
pub mod image;
pub mod mask;
pub mod pm;
pub mod puzzle;
pub mod utils;

// Public API
pub use puzzle::{
    GridPos, JointInfo, JointPosition, JointType, MakerParams, PieceInfo, PuzzleParts,
    PuzzlePieceMaker,
};

// Image types
pub use crate::image::{RasterImage, Resample, Rgba};

// Container format
pub use pm::PM_MAGIC_VERSION;

// Error types
pub use utils::error::{PuzzleError, Result};
