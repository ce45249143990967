//! The puzzle aggregate: generation, accessors and persistence.
//!
//! A [`PuzzlePieceMaker`] is only ever observed fully built. Generation and
//! loading assemble everything into locals first and construct the maker at
//! the very end, so a failure leaves nothing half-initialised behind.
//! Accessors hand out owned copies; the maker is the sole owner of its
//! buffers.

use crate::image::image_formats::RasterImage;
use crate::mask::joint_mask::JointMaskSet;
use crate::pm::codec::{encode_puzzle, read_puzzle, write_puzzle};
use crate::puzzle::generator::PieceGridGenerator;
use crate::puzzle::grid::{rc_to_array_pos, GridPos};
use crate::puzzle::helper_image::build_helper_image;
use crate::puzzle::joint::JointPosition;
use crate::puzzle::params::MakerParams;
use crate::puzzle::piece::PieceInfo;
use crate::utils::error::{PuzzleError, Result};
use log::{info, warn};
use rand::Rng;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Plain owned puzzle state, as stored in a `.pm` file.
///
/// Use [`PuzzleParts::validate`] (or [`PuzzlePieceMaker::from_parts`]) before
/// trusting hand-built values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleParts {
    pub rows: u32,
    pub cols: u32,
    pub piece_width: u32,
    pub piece_height: u32,
    pub original_image: RasterImage,
    pub image_with_joints_cut_out: RasterImage,
    pub background_image: RasterImage,
    pub top_joints_image: RasterImage,
    pub bottom_joints_image: RasterImage,
    pub left_joints_image: RasterImage,
    pub right_joints_image: RasterImage,
    pub joint_mask_styles: Vec<RasterImage>,
    /// Row-major, `rows * cols` entries with IDs matching their index.
    pub pieces: Vec<PieceInfo>,
}

impl PuzzleParts {
    /// Checks that every field is present and consistent.
    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 || self.cols < 2 {
            return Err(PuzzleError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.piece_width == 0 || self.piece_height == 0 {
            return Err(PuzzleError::IncompleteState(format!(
                "piece size {}x{} is empty",
                self.piece_width, self.piece_height
            )));
        }

        if self.original_image.is_empty() {
            return Err(PuzzleError::IncompleteState("original image is missing".to_string()));
        }
        let size = self.original_image.dimensions();
        for (name, image) in [
            ("image with joints cut out", &self.image_with_joints_cut_out),
            ("background image", &self.background_image),
            ("top joints image", &self.top_joints_image),
            ("bottom joints image", &self.bottom_joints_image),
            ("left joints image", &self.left_joints_image),
            ("right joints image", &self.right_joints_image),
        ] {
            if image.is_empty() {
                return Err(PuzzleError::IncompleteState(format!("{} is missing", name)));
            }
            if image.dimensions() != size {
                return Err(PuzzleError::IncompleteState(format!(
                    "{} is {}x{}, original image is {}x{}",
                    name,
                    image.width(),
                    image.height(),
                    size.0,
                    size.1
                )));
            }
        }

        if self.joint_mask_styles.is_empty() {
            return Err(PuzzleError::IncompleteState(
                "no joint mask styles".to_string(),
            ));
        }
        if self.joint_mask_styles.iter().any(RasterImage::is_empty) {
            return Err(PuzzleError::IncompleteState(
                "joint mask style is empty".to_string(),
            ));
        }

        let expected = self.rows as usize * self.cols as usize;
        if self.pieces.len() != expected {
            return Err(PuzzleError::IncompleteState(format!(
                "{} pieces for a {}x{} grid",
                self.pieces.len(),
                self.rows,
                self.cols
            )));
        }
        if let Some((idx, piece)) = self
            .pieces
            .iter()
            .enumerate()
            .find(|(idx, piece)| piece.id() as usize != *idx)
        {
            return Err(PuzzleError::IncompleteState(format!(
                "piece at index {} has id {}",
                idx,
                piece.id()
            )));
        }
        Ok(())
    }
}

/// A generated (or loaded) jigsaw puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzlePieceMaker {
    parts: PuzzleParts,
}

impl PuzzlePieceMaker {
    /// Generates a puzzle with default parameters and a thread-local RNG.
    pub fn generate(image: &RasterImage, joint_mask_styles: &[RasterImage], rows: u32, cols: u32) -> Result<Self> {
        Self::generate_with(
            image,
            joint_mask_styles,
            rows,
            cols,
            &MakerParams::default(),
            &mut rand::rng(),
        )
    }

    /// Generates a puzzle from `image` cut into `rows` x `cols` pieces.
    ///
    /// Arguments are checked before any image work starts. `rng` drives style
    /// choice and joint types; a seeded generator gives reproducible puzzles.
    pub fn generate_with<R: Rng + ?Sized>(
        image: &RasterImage,
        joint_mask_styles: &[RasterImage],
        rows: u32,
        cols: u32,
        params: &MakerParams,
        rng: &mut R,
    ) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(PuzzleError::InvalidDimensions { rows, cols });
        }
        if joint_mask_styles.is_empty() {
            return Err(PuzzleError::InvalidArgument(
                "at least one joint mask style is required".to_string(),
            ));
        }
        if image.is_empty() {
            return Err(PuzzleError::InvalidArgument("puzzle image is empty".to_string()));
        }
        let piece_width = image.width() / cols;
        let piece_height = image.height() / rows;
        if piece_width == 0 || piece_height == 0 {
            return Err(PuzzleError::InvalidArgument(format!(
                "{}x{} image is too small for a {}x{} grid",
                image.width(),
                image.height(),
                rows,
                cols
            )));
        }

        info!(
            "generating {}x{} puzzle from {}x{} image with {} joint style(s)",
            rows,
            cols,
            image.width(),
            image.height(),
            joint_mask_styles.len()
        );

        let masks = JointMaskSet::prepare(joint_mask_styles, piece_width, params)?;
        let grid = PieceGridGenerator::new(image, &masks, rows, cols)?.generate(rng)?;
        let background_image = build_helper_image(image);

        let parts = PuzzleParts {
            rows,
            cols,
            piece_width: grid.piece_width,
            piece_height: grid.piece_height,
            original_image: image.clone(),
            image_with_joints_cut_out: grid.image_with_joints_cut_out,
            background_image,
            top_joints_image: grid.top_joints_image,
            bottom_joints_image: grid.bottom_joints_image,
            left_joints_image: grid.left_joints_image,
            right_joints_image: grid.right_joints_image,
            joint_mask_styles: joint_mask_styles.to_vec(),
            pieces: grid.pieces,
        };
        info!("generated {} pieces of {}x{} px", parts.pieces.len(), parts.piece_width, parts.piece_height);
        Ok(PuzzlePieceMaker { parts })
    }

    /// Builds a maker from previously extracted or hand-assembled state.
    pub fn from_parts(parts: PuzzleParts) -> Result<Self> {
        parts.validate()?;
        Ok(PuzzlePieceMaker { parts })
    }

    pub fn into_parts(self) -> PuzzleParts {
        self.parts
    }

    pub fn rows(&self) -> u32 {
        self.parts.rows
    }

    pub fn cols(&self) -> u32 {
        self.parts.cols
    }

    /// Cell width before joint protrusion.
    pub fn piece_width(&self) -> u32 {
        self.parts.piece_width
    }

    /// Cell height before joint protrusion.
    pub fn piece_height(&self) -> u32 {
        self.parts.piece_height
    }

    pub fn image_width(&self) -> u32 {
        self.parts.original_image.width()
    }

    pub fn image_height(&self) -> u32 {
        self.parts.original_image.height()
    }

    pub fn original_image(&self) -> RasterImage {
        self.parts.original_image.clone()
    }

    /// The source picture with every male-joint pixel made transparent.
    pub fn image_with_joints_cut_out(&self) -> RasterImage {
        self.parts.image_with_joints_cut_out.clone()
    }

    /// Grayscale solving aid.
    pub fn background_image(&self) -> RasterImage {
        self.parts.background_image.clone()
    }

    /// Content of the male joints on `position` edges, full image size.
    pub fn joint_content_image(&self, position: JointPosition) -> RasterImage {
        match position {
            JointPosition::Top => self.parts.top_joints_image.clone(),
            JointPosition::Bottom => self.parts.bottom_joints_image.clone(),
            JointPosition::Left => self.parts.left_joints_image.clone(),
            JointPosition::Right => self.parts.right_joints_image.clone(),
        }
    }

    pub fn joint_mask_styles(&self) -> Vec<RasterImage> {
        self.parts.joint_mask_styles.clone()
    }

    /// All pieces, row-major.
    pub fn pieces(&self) -> Vec<PieceInfo> {
        self.parts.pieces.clone()
    }

    /// The piece at `row`, `col` (row 0 is the bottom row).
    pub fn piece(&self, row: u32, col: u32) -> Option<PieceInfo> {
        let id = rc_to_array_pos(GridPos::new(row, col), self.parts.rows, self.parts.cols)?;
        self.parts.pieces.get(id as usize).cloned()
    }

    /// Writes the puzzle as a `.pm` stream. No byte is written unless the
    /// whole container could be encoded.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_puzzle(&self.parts, writer)?;
        info!("saved {}x{} puzzle", self.parts.rows, self.parts.cols);
        Ok(())
    }

    /// Saves to `path`.
    ///
    /// The container is written to a sibling temporary file which then
    /// replaces `path`, so an existing file is only overwritten by a complete
    /// one. Nothing is created when encoding fails.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = encode_puzzle(&self.parts)?;
        let tmp_path = temp_sibling(path);

        let written = File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, path));
        if let Err(e) = written {
            warn!("saving {} failed: {}", path.display(), e);
            if tmp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp_path) {
                    warn!("could not remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        info!(
            "saved {}x{} puzzle to {} ({} bytes)",
            self.parts.rows,
            self.parts.cols,
            path.display(),
            bytes.len()
        );
        Ok(())
    }

    /// Reads a puzzle from a `.pm` stream.
    pub fn load<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let parts = read_puzzle(reader)?;
        info!("loaded {}x{} puzzle", parts.rows, parts.cols);
        Ok(PuzzlePieceMaker { parts })
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PuzzleError::from(e).into_corrupt())?;
        let maker = Self::load(&mut BufReader::new(file))?;
        info!("loaded puzzle from {}", path.display());
        Ok(maker)
    }

    /// Replaces this puzzle with one read from `reader`. On failure `self` is
    /// left exactly as it was.
    pub fn reload<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        let loaded = Self::load(reader)?;
        *self = loaded;
        Ok(())
    }
}

/// `<path>.tmp` next to `path`.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_formats::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn style() -> RasterImage {
        RasterImage::from_fn(20, 20, |x, y| {
            if x >= 10 && (5..15).contains(&y) {
                Rgba::BLACK
            } else {
                Rgba::WHITE
            }
        })
    }

    fn source() -> RasterImage {
        RasterImage::from_fn(120, 90, |x, y| Rgba::opaque(x as u8, y as u8, 128))
    }

    fn maker(seed: u64) -> PuzzlePieceMaker {
        PuzzlePieceMaker::generate_with(
            &source(),
            &[style()],
            3,
            4,
            &MakerParams::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_fills_every_field() {
        let m = maker(1);
        assert_eq!((m.rows(), m.cols()), (3, 4));
        assert_eq!((m.piece_width(), m.piece_height()), (30, 30));
        assert_eq!((m.image_width(), m.image_height()), (120, 90));
        assert_eq!(m.pieces().len(), 12);
        assert_eq!(m.joint_mask_styles(), vec![style()]);
        assert_eq!(m.original_image(), source());
        assert_eq!(m.background_image(), build_helper_image(&source()));
    }

    #[test]
    fn test_argument_checks_come_first() {
        let src = source();
        assert!(matches!(
            PuzzlePieceMaker::generate(&src, &[style()], 1, 5),
            Err(PuzzleError::InvalidDimensions { rows: 1, cols: 5 })
        ));
        assert!(matches!(
            PuzzlePieceMaker::generate(&src, &[], 3, 3),
            Err(PuzzleError::InvalidArgument(_))
        ));
        assert!(matches!(
            PuzzlePieceMaker::generate(&RasterImage::new(0, 0), &[style()], 3, 3),
            Err(PuzzleError::InvalidArgument(_))
        ));
        assert!(matches!(
            PuzzlePieceMaker::generate(&src, &[RasterImage::from_pixel(20, 10, Rgba::WHITE)], 3, 3),
            Err(PuzzleError::InvalidMaskShape { .. })
        ));
    }

    #[test]
    fn test_piece_lookup() {
        let m = maker(2);
        assert_eq!(m.piece(2, 3).map(|p| p.id()), Some(11));
        assert_eq!(m.piece(3, 0), None);
        assert_eq!(m.piece(0, 4), None);
    }

    #[test]
    fn test_accessors_return_copies() {
        let m = maker(3);
        let mut cut = m.image_with_joints_cut_out();
        cut.put_pixel(0, 0, Rgba::opaque(1, 2, 3));
        assert_ne!(m.image_with_joints_cut_out(), cut);

        let mut pieces = m.pieces();
        pieces.clear();
        assert_eq!(m.pieces().len(), 12);
    }

    #[test]
    fn test_parts_round_trip() {
        let m = maker(4);
        let parts = m.clone().into_parts();
        assert_eq!(PuzzlePieceMaker::from_parts(parts).unwrap(), m);
    }

    #[test]
    fn test_from_parts_rejects_missing_image() {
        let mut parts = maker(5).into_parts();
        parts.left_joints_image = RasterImage::new(0, 0);
        assert!(matches!(
            PuzzlePieceMaker::from_parts(parts),
            Err(PuzzleError::IncompleteState(_))
        ));
    }

    #[test]
    fn test_save_load_in_memory() {
        let m = maker(6);
        let mut out = Vec::new();
        m.save(&mut out).unwrap();
        let back = PuzzlePieceMaker::load(&mut Cursor::new(out)).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_failed_reload_keeps_state() {
        let mut m = maker(7);
        let before = m.clone();
        let garbage = vec![0u8; 3];
        assert!(m.reload(&mut Cursor::new(garbage)).is_err());
        assert_eq!(m, before);

        let other = maker(8);
        let mut out = Vec::new();
        other.save(&mut out).unwrap();
        m.reload(&mut Cursor::new(out)).unwrap();
        assert_eq!(m, other);
    }
}
