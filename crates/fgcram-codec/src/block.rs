//! Raw block framing.
//!
//! Every structure in a container is carried in a block: a method byte, a
//! content-type byte, an ITF8 content id, ITF8 compressed and raw sizes, the
//! payload, and (for major version 3 and up) a CRC32 trailer covering all
//! preceding bytes of the frame.
//!
//! This module produces and consumes *raw* (method 0) frames only; compressed
//! payloads are the business of the external compression codecs. Slice header
//! blocks are always written raw.

use crate::itf8::{read_itf8, write_itf8};
use std::io::{self, Read, Write};
use thiserror::Error;

/// First major version whose block frames carry a CRC32 trailer.
pub const MIN_MAJOR_WITH_CRC: u8 = 3;

/// Errors produced while framing or un-framing a block.
#[derive(Error, Debug)]
pub enum BlockError {
    /// Underlying reader or writer failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The content-type byte is not one this crate knows.
    #[error("unknown block content type: {0}")]
    UnknownContentType(u8),

    /// The block was written with a compression method this reader does not
    /// handle.
    #[error("unsupported block compression method: {0}")]
    UnsupportedMethod(u8),

    /// A declared block length is negative.
    #[error("invalid block length: {0}")]
    InvalidLength(i32),

    /// Raw blocks must declare identical compressed and raw sizes.
    #[error("raw block size mismatch: compressed {compressed}, raw {raw}")]
    SizeMismatch {
        /// Declared compressed size.
        compressed: i32,
        /// Declared raw size.
        raw: i32,
    },

    /// The CRC32 trailer does not match the frame contents.
    #[error("block checksum mismatch: computed {computed:#010x}, stored {stored:#010x}")]
    ChecksumMismatch {
        /// CRC computed over the frame as read.
        computed: u32,
        /// CRC stored in the trailer.
        stored: u32,
    },
}

/// The kind of payload a block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// The SAM file header.
    FileHeader,
    /// A container compression header.
    CompressionHeader,
    /// A slice header.
    MappedSliceHeader,
    /// An external data series block.
    External,
    /// The core bit-packed data block.
    Core,
}

impl ContentType {
    /// The on-wire content-type byte.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            ContentType::FileHeader => 0,
            ContentType::CompressionHeader => 1,
            ContentType::MappedSliceHeader => 2,
            ContentType::External => 4,
            ContentType::Core => 5,
        }
    }

    fn from_id(id: u8) -> Result<Self, BlockError> {
        match id {
            0 => Ok(ContentType::FileHeader),
            1 => Ok(ContentType::CompressionHeader),
            2 => Ok(ContentType::MappedSliceHeader),
            4 => Ok(ContentType::External),
            5 => Ok(ContentType::Core),
            other => Err(BlockError::UnknownContentType(other)),
        }
    }
}

/// On-wire value of the raw (uncompressed) method byte.
const METHOD_RAW: u8 = 0;

/// A single uncompressed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    content_type: ContentType,
    content_id: i32,
    data: Vec<u8>,
}

impl Block {
    /// Creates a raw block with the given payload.
    ///
    /// Non-external blocks carry content id 0 on the wire; use
    /// [`Block::external`] for external data blocks.
    #[must_use]
    pub fn raw(content_type: ContentType, data: Vec<u8>) -> Self {
        Self { content_type, content_id: 0, data }
    }

    /// Creates a raw external block with the given content id.
    #[must_use]
    pub fn external(content_id: i32, data: Vec<u8>) -> Self {
        Self { content_type: ContentType::External, content_id, data }
    }

    /// The block's content type.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// The block's content id (0 for non-external blocks).
    #[must_use]
    pub fn content_id(&self) -> i32 {
        self.content_id
    }

    /// The uncompressed payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the block, returning its payload.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Writes the block frame, including the CRC32 trailer for `major >= 3`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write<W: Write>(&self, major: u8, out: &mut W) -> Result<(), BlockError> {
        let mut frame = Vec::with_capacity(self.data.len() + 16);
        frame.push(METHOD_RAW);
        frame.push(self.content_type.id());
        write_itf8(self.content_id, &mut frame)?;
        write_itf8(self.data.len() as i32, &mut frame)?;
        write_itf8(self.data.len() as i32, &mut frame)?;
        frame.extend_from_slice(&self.data);

        out.write_all(&frame)?;
        if major >= MIN_MAJOR_WITH_CRC {
            out.write_all(&crc32fast::hash(&frame).to_le_bytes())?;
        }
        Ok(())
    }

    /// Reads one block frame, verifying the CRC32 trailer for `major >= 3`.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, truncation, an unknown content type,
    /// a non-raw compression method, inconsistent declared sizes, or a CRC
    /// mismatch.
    pub fn read<R: Read>(major: u8, input: &mut R) -> Result<Self, BlockError> {
        let mut reader = CrcReader::new(input);

        let mut prefix = [0u8; 2];
        reader.read_exact(&mut prefix)?;
        let [method, content_type_id] = prefix;
        if method != METHOD_RAW {
            return Err(BlockError::UnsupportedMethod(method));
        }
        let content_type = ContentType::from_id(content_type_id)?;

        let content_id = read_itf8(&mut reader)?;
        let compressed_size = read_itf8(&mut reader)?;
        let raw_size = read_itf8(&mut reader)?;
        if compressed_size < 0 {
            return Err(BlockError::InvalidLength(compressed_size));
        }
        if raw_size < 0 {
            return Err(BlockError::InvalidLength(raw_size));
        }
        if compressed_size != raw_size {
            return Err(BlockError::SizeMismatch { compressed: compressed_size, raw: raw_size });
        }

        let mut data = vec![0u8; raw_size as usize];
        reader.read_exact(&mut data)?;

        let computed = reader.finalize();
        if major >= MIN_MAJOR_WITH_CRC {
            let mut crc_bytes = [0u8; 4];
            input.read_exact(&mut crc_bytes)?;
            let stored = u32::from_le_bytes(crc_bytes);
            if computed != stored {
                return Err(BlockError::ChecksumMismatch { computed, stored });
            }
        }

        Ok(Self { content_type, content_id, data })
    }
}

/// A reader that folds everything it reads into a CRC32.
struct CrcReader<'a, R> {
    inner: &'a mut R,
    hasher: crc32fast::Hasher,
}

impl<'a, R: Read> CrcReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, hasher: crc32fast::Hasher::new() }
    }

    fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

impl<R: Read> Read for CrcReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}
