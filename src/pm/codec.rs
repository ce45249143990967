// src/pm/codec.rs

//! Reader and writer for `.pm` puzzle files.
//!
//! ## Layout
//!
//! All integers are little-endian `i32`; `blob` is an `i32` length followed by
//! that many bytes of PNG data.
//!
//! ```text
//! magic (6640331)  cols  rows  piece_width  piece_height
//! blob original            blob cut-out           blob background
//! blob top joints          blob bottom joints     blob left joints   blob right joints
//! style_count  blob style * style_count
//! rows * cols pieces, row-major:
//!     id  joint_count  (type  width  height  position) * joint_count
//! ```
//!
//! Joint type codes are 0 = Male, 1 = Female. Position codes are 0 = Top,
//! 1 = Left, 2 = Right, 3 = Bottom.

use crate::image::image_formats::RasterImage;
use crate::pm::byte_stream::{PmRead, PmWrite};
use crate::puzzle::joint::{JointInfo, JointPosition, JointType};
use crate::puzzle::maker::PuzzleParts;
use crate::puzzle::piece::PieceInfo;
use crate::utils::error::{PuzzleError, Result};
use log::{debug, warn};
use std::io::{Read, Write};

/// First field of every `.pm` file.
pub const PM_MAGIC_VERSION: i32 = 6640331;

/// Most joints a piece can carry, one per edge.
const MAX_JOINTS_PER_PIECE: u32 = 4;

/// Encodes `parts` into a complete `.pm` byte image.
///
/// Validation and PNG encoding happen before anything is returned, so a
/// failure never yields a partial container.
pub fn encode_puzzle(parts: &PuzzleParts) -> Result<Vec<u8>> {
    parts.validate()?;

    let mut out = Vec::new();
    out.write_i32_le(PM_MAGIC_VERSION)?;
    out.write_count(parts.cols, "cols")?;
    out.write_count(parts.rows, "rows")?;
    out.write_count(parts.piece_width, "piece width")?;
    out.write_count(parts.piece_height, "piece height")?;

    for (name, image) in [
        ("original image", &parts.original_image),
        ("image with joints cut out", &parts.image_with_joints_cut_out),
        ("background image", &parts.background_image),
        ("top joints image", &parts.top_joints_image),
        ("bottom joints image", &parts.bottom_joints_image),
        ("left joints image", &parts.left_joints_image),
        ("right joints image", &parts.right_joints_image),
    ] {
        let png = image.encode_png()?;
        debug!("pm write: {} {}x{}, {} bytes", name, image.width(), image.height(), png.len());
        out.write_blob(&png)?;
    }

    out.write_count(parts.joint_mask_styles.len() as u32, "style count")?;
    for style in &parts.joint_mask_styles {
        out.write_blob(&style.encode_png()?)?;
    }

    for piece in &parts.pieces {
        out.write_count(piece.id(), "piece id")?;
        out.write_count(piece.total_joints() as u32, "joint count")?;
        for joint in piece.joints() {
            out.write_i32_le(joint.joint_type().code())?;
            out.write_count(joint.width(), "joint width")?;
            out.write_count(joint.height(), "joint height")?;
            out.write_i32_le(joint.position().code())?;
        }
    }

    debug!("pm write: {} bytes total", out.len());
    Ok(out)
}

/// Writes `parts` to `writer` as a `.pm` stream.
///
/// Nothing reaches `writer` unless the whole container was encoded.
pub fn write_puzzle<W: Write + ?Sized>(parts: &PuzzleParts, writer: &mut W) -> Result<()> {
    let bytes = encode_puzzle(parts)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Reads a `.pm` stream.
///
/// A wrong magic number fails with [`PuzzleError::VersionMismatch`] before any
/// further read. Every other failure is reported as
/// [`PuzzleError::CorruptFile`] with the underlying error as its source.
pub fn read_puzzle<R: Read + ?Sized>(reader: &mut R) -> Result<PuzzleParts> {
    let magic = reader.read_i32_le().map_err(PuzzleError::into_corrupt)?;
    if magic != PM_MAGIC_VERSION {
        warn!(
            "pm read: magic {} does not match {}, refusing to read further",
            magic, PM_MAGIC_VERSION
        );
        return Err(PuzzleError::VersionMismatch {
            expected: PM_MAGIC_VERSION,
            found: magic,
        });
    }

    read_body(reader).map_err(PuzzleError::into_corrupt)
}

fn read_body<R: Read + ?Sized>(reader: &mut R) -> Result<PuzzleParts> {
    let cols = reader.read_count("cols")?;
    let rows = reader.read_count("rows")?;
    let piece_width = reader.read_count("piece width")?;
    let piece_height = reader.read_count("piece height")?;
    if rows < 2 || cols < 2 {
        return Err(PuzzleError::InvalidDimensions { rows, cols });
    }
    let piece_count = rows
        .checked_mul(cols)
        .ok_or_else(|| PuzzleError::InvalidArgument(format!("{}x{} grid is too large", rows, cols)))?;
    debug!("pm read: {}x{} grid, pieces {}x{} px", rows, cols, piece_width, piece_height);

    let original_image = read_image(reader)?;
    let image_with_joints_cut_out = read_image(reader)?;
    let background_image = read_image(reader)?;
    let top_joints_image = read_image(reader)?;
    let bottom_joints_image = read_image(reader)?;
    let left_joints_image = read_image(reader)?;
    let right_joints_image = read_image(reader)?;

    let style_count = reader.read_count("style count")?;
    let mut joint_mask_styles = Vec::new();
    for _ in 0..style_count {
        joint_mask_styles.push(read_image(reader)?);
    }

    let mut pieces = Vec::new();
    for index in 0..piece_count {
        pieces.push(read_piece(reader, index)?);
    }

    let parts = PuzzleParts {
        rows,
        cols,
        piece_width,
        piece_height,
        original_image,
        image_with_joints_cut_out,
        background_image,
        top_joints_image,
        bottom_joints_image,
        left_joints_image,
        right_joints_image,
        joint_mask_styles,
        pieces,
    };
    parts.validate()?;
    Ok(parts)
}

fn read_image<R: Read + ?Sized>(reader: &mut R) -> Result<RasterImage> {
    let png = reader.read_blob()?;
    RasterImage::decode_png(&png)
}

fn read_piece<R: Read + ?Sized>(reader: &mut R, index: u32) -> Result<PieceInfo> {
    let id = reader.read_count("piece id")?;
    if id != index {
        return Err(PuzzleError::InvalidArgument(format!(
            "piece {} stored with id {}",
            index, id
        )));
    }

    let joint_count = reader.read_count("joint count")?;
    if joint_count > MAX_JOINTS_PER_PIECE {
        return Err(PuzzleError::InvalidArgument(format!(
            "piece {} has {} joints",
            id, joint_count
        )));
    }

    let mut piece = PieceInfo::new(id);
    for _ in 0..joint_count {
        let type_code = reader.read_i32_le()?;
        let width = reader.read_count("joint width")?;
        let height = reader.read_count("joint height")?;
        let position_code = reader.read_i32_le()?;

        let joint_type = JointType::from_code(type_code).ok_or_else(|| {
            PuzzleError::InvalidArgument(format!("piece {}: unknown joint type {}", id, type_code))
        })?;
        let position = JointPosition::from_code(position_code).ok_or_else(|| {
            PuzzleError::InvalidArgument(format!(
                "piece {}: unknown joint position {}",
                id, position_code
            ))
        })?;
        if !piece.add_joint(JointInfo::new(joint_type, position, width, height)) {
            return Err(PuzzleError::InvalidArgument(format!(
                "piece {}: two joints on {:?} edge",
                id, position
            )));
        }
    }
    Ok(piece)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_formats::Rgba;
    use std::io::{self, Cursor};

    /// Counts `read` calls on the wrapped reader.
    struct CountingReader<R> {
        inner: R,
        reads: usize,
    }

    impl<R: Read> Read for CountingReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            self.inner.read(buf)
        }
    }

    fn image(seed: u8) -> RasterImage {
        RasterImage::from_fn(4, 4, |x, y| Rgba::new(seed, x as u8 * 10, y as u8 * 10, 255))
    }

    fn sample_parts() -> PuzzleParts {
        let mut pieces: Vec<PieceInfo> = (0..4).map(PieceInfo::new).collect();
        pieces[0].add_joint(JointInfo::new(JointType::Male, JointPosition::Right, 3, 2));
        pieces[0].add_joint(JointInfo::new(JointType::Female, JointPosition::Top, 2, 3));
        pieces[1].add_joint(JointInfo::new(JointType::Female, JointPosition::Left, 3, 2));
        pieces[2].add_joint(JointInfo::new(JointType::Male, JointPosition::Bottom, 2, 3));
        PuzzleParts {
            rows: 2,
            cols: 2,
            piece_width: 2,
            piece_height: 2,
            original_image: image(1),
            image_with_joints_cut_out: image(2),
            background_image: image(3),
            top_joints_image: image(4),
            bottom_joints_image: image(5),
            left_joints_image: image(6),
            right_joints_image: image(7),
            joint_mask_styles: vec![RasterImage::from_pixel(3, 3, Rgba::BLACK)],
            pieces,
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode_puzzle(&sample_parts()).unwrap();
        let header: Vec<i32> = bytes[..20]
            .chunks(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(header, vec![PM_MAGIC_VERSION, 2, 2, 2, 2]);
        // The first blob is a PNG.
        assert_eq!(&bytes[24..28], b"\x89PNG");
    }

    #[test]
    fn test_piece_records_close_the_stream() {
        let bytes = encode_puzzle(&sample_parts()).unwrap();
        // Pieces 2 and 3: id 2, one joint (Male=0, 2, 3, Bottom=3); id 3, none.
        let tail: Vec<i32> = bytes[bytes.len() - 32..]
            .chunks(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(tail, vec![2, 1, 0, 2, 3, 3, 3, 0]);
    }

    #[test]
    fn test_write_then_read() {
        let parts = sample_parts();
        let mut out = Vec::new();
        write_puzzle(&parts, &mut out).unwrap();
        let back = read_puzzle(&mut Cursor::new(out)).unwrap();
        assert_eq!(back.rows, 2);
        assert_eq!(back.cols, 2);
        assert_eq!(back.pieces, parts.pieces);
        assert_eq!(back.original_image, parts.original_image);
        assert_eq!(back.right_joints_image, parts.right_joints_image);
        assert_eq!(back.joint_mask_styles, parts.joint_mask_styles);
    }

    #[test]
    fn test_every_style_is_read_back() {
        let mut parts = sample_parts();
        parts.joint_mask_styles = vec![
            RasterImage::from_pixel(3, 3, Rgba::BLACK),
            RasterImage::from_pixel(5, 5, Rgba::WHITE),
            image(9),
        ];
        let bytes = encode_puzzle(&parts).unwrap();
        let back = read_puzzle(&mut bytes.as_slice()).unwrap();
        assert_eq!(back.joint_mask_styles, parts.joint_mask_styles);
        assert_eq!(back.pieces, parts.pieces);
        assert_eq!(back, parts);
    }

    #[test]
    fn test_version_mismatch_reads_once() {
        let mut bytes = encode_puzzle(&sample_parts()).unwrap();
        bytes[..4].copy_from_slice(&1234i32.to_le_bytes());
        let mut reader = CountingReader {
            inner: Cursor::new(bytes),
            reads: 0,
        };
        match read_puzzle(&mut reader) {
            Err(PuzzleError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, PM_MAGIC_VERSION);
                assert_eq!(found, 1234);
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.rows)),
        }
        assert_eq!(reader.reads, 1);
    }

    #[test]
    fn test_truncated_stream_is_corrupt() {
        let bytes = encode_puzzle(&sample_parts()).unwrap();
        let truncated = bytes[..bytes.len() - 6].to_vec();
        match read_puzzle(&mut Cursor::new(truncated)) {
            Err(PuzzleError::CorruptFile { source }) => {
                assert!(matches!(*source, PuzzleError::Io(_)));
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.rows)),
        }
    }

    #[test]
    fn test_empty_stream_is_corrupt() {
        assert!(matches!(
            read_puzzle(&mut Cursor::new(Vec::new())),
            Err(PuzzleError::CorruptFile { .. })
        ));
    }

    #[test]
    fn test_unknown_joint_code_is_corrupt() {
        let mut bytes = encode_puzzle(&sample_parts()).unwrap();
        // Position code of piece 2's only joint.
        let at = bytes.len() - 12;
        bytes[at..at + 4].copy_from_slice(&9i32.to_le_bytes());
        assert!(matches!(
            read_puzzle(&mut Cursor::new(bytes)),
            Err(PuzzleError::CorruptFile { .. })
        ));
    }

    #[test]
    fn test_duplicate_joint_position_is_corrupt() {
        let mut bytes = encode_puzzle(&sample_parts()).unwrap();
        // Piece 3 claims two Top joints.
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&2i32.to_le_bytes());
        for _ in 0..2 {
            for v in [1i32, 1, 1, 0] {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        match read_puzzle(&mut Cursor::new(bytes)) {
            Err(PuzzleError::CorruptFile { source }) => {
                assert!(matches!(*source, PuzzleError::InvalidArgument(_)));
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.rows)),
        }
    }

    #[test]
    fn test_invalid_parts_are_not_encoded() {
        let mut parts = sample_parts();
        parts.pieces.pop();
        let mut out = Vec::new();
        assert!(matches!(
            write_puzzle(&parts, &mut out),
            Err(PuzzleError::IncompleteState(_))
        ));
        assert!(out.is_empty());
    }
}
