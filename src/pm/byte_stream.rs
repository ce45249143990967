// src/pm/byte_stream.rs

//! Little-endian primitives for the `.pm` container.
//!
//! Every integer in the format is a signed 32-bit little-endian value, and
//! every embedded blob is preceded by such a length.

use crate::utils::error::{PuzzleError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Reads `.pm` primitives from any reader.
pub trait PmRead: Read {
    fn read_i32_le(&mut self) -> Result<i32> {
        Ok(ReadBytesExt::read_i32::<LittleEndian>(self)?)
    }

    /// Reads a non-negative count or dimension.
    fn read_count(&mut self, what: &str) -> Result<u32> {
        let value = self.read_i32_le()?;
        u32::try_from(value)
            .map_err(|_| PuzzleError::InvalidArgument(format!("negative {}: {}", what, value)))
    }

    /// Reads a length-prefixed blob.
    ///
    /// The buffer grows with the data actually read, so a bogus length in a
    /// truncated stream fails with `UnexpectedEof` instead of allocating it.
    fn read_blob(&mut self) -> Result<Vec<u8>> {
        let len = self.read_count("blob length")? as u64;
        let mut data = Vec::new();
        Read::take(&mut *self, len).read_to_end(&mut data)?;
        if data.len() as u64 != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("blob truncated: expected {} bytes, got {}", len, data.len()),
            )
            .into());
        }
        Ok(data)
    }
}

impl<R: Read + ?Sized> PmRead for R {}

/// Writes `.pm` primitives to any writer.
pub trait PmWrite: Write {
    fn write_i32_le(&mut self, value: i32) -> Result<()> {
        Ok(WriteBytesExt::write_i32::<LittleEndian>(self, value)?)
    }

    /// Writes an unsigned value that must fit the format's signed field.
    fn write_count(&mut self, value: u32, what: &str) -> Result<()> {
        let value = i32::try_from(value).map_err(|_| {
            PuzzleError::InvalidArgument(format!("{} {} does not fit in 32 bits", what, value))
        })?;
        self.write_i32_le(value)
    }

    /// Writes `data` preceded by its length.
    fn write_blob(&mut self, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
        self.write_count(len, "blob length")?;
        self.write_all(data)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> PmWrite for W {}
