//! Slice header block serialization.
//!
//! The slice header travels in its own raw block. Field order on the wire:
//!
//! ```text
//! ITF8  reference context id     (>= 0 single, -2 multi, -1 unmapped)
//! ITF8  alignment start          (0 for multi-reference and unmapped)
//! ITF8  alignment span
//! ITF8  record count
//! LTF8  global record counter
//! ITF8  block count              (1 core + external blocks)
//! ITF8  external content id count, then that many ITF8 ids
//! ITF8  embedded reference content id (-1 when absent)
//! 16B   reference MD5            (zero-filled when absent)
//! opt.  tag chain                (present iff major >= 3)
//! ```
//!
//! A write followed by a read reproduces every field, including the tag
//! chain order and the embedded-reference sentinel.

use crate::compression_header::CompressionHeader;
use crate::errors::{CramError, Result};
use crate::reference_context::ReferenceContext;
use crate::slice::Slice;
use crate::slice_tags::{SliceTags, ValidationStringency};
use fgcram_codec::{
    Block, ContentType, read_itf8, read_itf8_array, read_ltf8, write_itf8, write_itf8_array,
    write_ltf8,
};
use std::io::{Cursor, Read, Write};
use std::sync::Arc;

/// First major version that carries a slice tag chain.
const MIN_MAJOR_WITH_TAGS: u8 = 3;

/// Serializes a slice's header block.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write<W: Write>(major: u8, slice: &Slice, out: &mut W) -> Result<()> {
    let mut content = Vec::new();

    write_itf8(slice.reference_context().serializable_id(), &mut content)?;
    write_itf8(slice.alignment_start(), &mut content)?;
    write_itf8(slice.alignment_span(), &mut content)?;
    write_itf8(slice.nof_records(), &mut content)?;
    write_ltf8(slice.global_record_counter() as i64, &mut content)?;

    // one core block plus the external blocks, embedded reference included
    let external_content_ids = slice.external_content_ids();
    write_itf8(1 + external_content_ids.len() as i32, &mut content)?;
    write_itf8_array(external_content_ids, &mut content)?;
    write_itf8(slice.embedded_reference_content_id(), &mut content)?;

    match slice.reference_md5() {
        Some(md5) => content.write_all(md5)?,
        None => content.write_all(&[0u8; 16])?,
    }

    if major >= MIN_MAJOR_WITH_TAGS {
        slice.tags().write(&mut content)?;
    }

    Block::raw(ContentType::MappedSliceHeader, content).write(major, out)?;
    Ok(())
}

/// Reads a slice header block and reconstructs the slice.
///
/// # Errors
///
/// * [`CramError::Structural`] when the block's content type is not a slice
///   header, the header is truncated, or (below major version 3) trailing
///   bytes follow the MD5.
/// * Tag parse failures according to `stringency`.
pub fn read<R: Read>(
    major: u8,
    compression_header: Arc<CompressionHeader>,
    stringency: ValidationStringency,
    input: &mut R,
) -> Result<Slice> {
    let block = Block::read(major, input)?;
    if block.content_type() != ContentType::MappedSliceHeader {
        return Err(CramError::structural(format!(
            "slice header block expected, found {:?}",
            block.content_type()
        )));
    }

    let content = block.into_data();
    let mut cursor = Cursor::new(content.as_slice());

    let reference_context = ReferenceContext::from_serializable_id(
        read_itf8(&mut cursor).map_err(truncated)?,
    )?;
    let alignment_start = read_itf8(&mut cursor).map_err(truncated)?;
    let alignment_span = read_itf8(&mut cursor).map_err(truncated)?;
    let nof_records = read_itf8(&mut cursor).map_err(truncated)?;
    let global_record_counter = read_ltf8(&mut cursor).map_err(truncated)?;
    if global_record_counter < 0 {
        return Err(CramError::structural(format!(
            "negative global record counter: {global_record_counter}"
        )));
    }
    let nof_blocks = read_itf8(&mut cursor).map_err(truncated)?;
    let external_content_ids = read_itf8_array(&mut cursor).map_err(truncated)?;
    let embedded_reference_content_id = read_itf8(&mut cursor).map_err(truncated)?;

    let mut md5 = [0u8; 16];
    cursor.read_exact(&mut md5).map_err(truncated)?;
    let reference_md5 = if md5 == [0u8; 16] { None } else { Some(md5) };

    let remaining = &content[cursor.position() as usize..];
    let tags = if major >= MIN_MAJOR_WITH_TAGS {
        SliceTags::read(remaining, stringency)?
    } else {
        if !remaining.is_empty() {
            return Err(CramError::structural(format!(
                "{} trailing bytes after slice header MD5",
                remaining.len()
            )));
        }
        SliceTags::new()
    };

    Ok(Slice::from_header_fields(
        reference_context,
        alignment_start,
        alignment_span,
        nof_records,
        global_record_counter as u64,
        nof_blocks,
        external_content_ids,
        embedded_reference_content_id,
        reference_md5,
        tags,
        compression_header,
    ))
}

fn truncated(err: std::io::Error) -> CramError {
    CramError::structural(format!("truncated slice header block: {err}"))
}
