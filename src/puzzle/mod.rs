pub mod generator;
pub mod grid;
pub mod helper_image;
pub mod joint;
pub mod maker;
pub mod params;
pub mod piece;

// Re-export commonly used types
pub use grid::{array_pos_to_rc, can_join, neighbor, piece_uv_rect, rc_to_array_pos, GridPos, UvRect};
pub use joint::{JointInfo, JointPosition, JointType};
pub use maker::{PuzzleParts, PuzzlePieceMaker};
pub use params::MakerParams;
pub use piece::PieceInfo;
