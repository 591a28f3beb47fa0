//! Binary tag set carried at the tail of a slice header.
//!
//! Slice headers for major version 3 and up may end with a chain of SAM-format
//! binary tags: a two-byte tag name, a type byte, and a value. The chain is
//! read into an order-preserving collection and written back verbatim, so
//! unknown tags survive a round trip untouched.

use crate::errors::{CramError, Result};
use bstr::BString;
use std::io::Write;

/// How tag parse failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationStringency {
    /// Fail the read with a structural error.
    #[default]
    Strict,
    /// Log a warning and keep the tags parsed so far.
    Lenient,
    /// Keep the tags parsed so far without logging.
    Silent,
}

/// A single tag value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Printable character (`A`).
    Character(u8),
    /// Signed 8-bit integer (`c`).
    Int8(i8),
    /// Unsigned 8-bit integer (`C`).
    UInt8(u8),
    /// Signed 16-bit integer (`s`).
    Int16(i16),
    /// Unsigned 16-bit integer (`S`).
    UInt16(u16),
    /// Signed 32-bit integer (`i`).
    Int32(i32),
    /// Unsigned 32-bit integer (`I`).
    UInt32(u32),
    /// 32-bit float (`f`).
    Float(f32),
    /// NUL-terminated string (`Z`).
    String(BString),
    /// NUL-terminated hex string (`H`).
    Hex(BString),
    /// Typed array (`B`).
    Array(TagArray),
}

/// Element payload of a `B`-typed tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TagArray {
    /// `B:c`
    Int8(Vec<i8>),
    /// `B:C`
    UInt8(Vec<u8>),
    /// `B:s`
    Int16(Vec<i16>),
    /// `B:S`
    UInt16(Vec<u16>),
    /// `B:i`
    Int32(Vec<i32>),
    /// `B:I`
    UInt32(Vec<u32>),
    /// `B:f`
    Float(Vec<f32>),
}

/// One tag in the chain: a two-byte name and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceTag {
    /// Two-character tag name.
    pub tag: [u8; 2],
    /// Tag value.
    pub value: TagValue,
}

impl SliceTag {
    /// Creates a tag from its name bytes and value.
    #[must_use]
    pub fn new(tag: [u8; 2], value: TagValue) -> Self {
        Self { tag, value }
    }
}

/// An ordered tag chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliceTags(Vec<SliceTag>);

impl SliceTags {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the chain holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of tags in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Appends a tag, preserving insertion order.
    pub fn push(&mut self, tag: SliceTag) {
        self.0.push(tag);
    }

    /// The tags in chain order.
    #[must_use]
    pub fn tags(&self) -> &[SliceTag] {
        &self.0
    }

    /// Parses a binary tag chain from `bytes`.
    ///
    /// # Errors
    ///
    /// With [`ValidationStringency::Strict`], a truncated or unknown-typed
    /// tag is a structural error. The lenient and silent stringencies keep
    /// whatever parsed cleanly before the failure.
    pub fn read(bytes: &[u8], stringency: ValidationStringency) -> Result<Self> {
        let mut tags = SliceTags::new();
        let mut offset = 0;

        while offset < bytes.len() {
            match parse_tag(bytes, offset) {
                Ok((tag, next_offset)) => {
                    tags.push(tag);
                    offset = next_offset;
                }
                Err(reason) => {
                    return match stringency {
                        ValidationStringency::Strict => Err(CramError::structural(reason)),
                        ValidationStringency::Lenient => {
                            log::warn!("dropping malformed slice tag data: {reason}");
                            Ok(tags)
                        }
                        ValidationStringency::Silent => Ok(tags),
                    };
                }
            }
        }

        Ok(tags)
    }

    /// Writes the chain in chain order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for SliceTag { tag, value } in &self.0 {
            out.write_all(tag)?;
            match value {
                TagValue::Character(c) => out.write_all(&[b'A', *c])?,
                TagValue::Int8(v) => {
                    out.write_all(&[b'c'])?;
                    out.write_all(&v.to_le_bytes())?;
                }
                TagValue::UInt8(v) => out.write_all(&[b'C', *v])?,
                TagValue::Int16(v) => {
                    out.write_all(&[b's'])?;
                    out.write_all(&v.to_le_bytes())?;
                }
                TagValue::UInt16(v) => {
                    out.write_all(&[b'S'])?;
                    out.write_all(&v.to_le_bytes())?;
                }
                TagValue::Int32(v) => {
                    out.write_all(&[b'i'])?;
                    out.write_all(&v.to_le_bytes())?;
                }
                TagValue::UInt32(v) => {
                    out.write_all(&[b'I'])?;
                    out.write_all(&v.to_le_bytes())?;
                }
                TagValue::Float(v) => {
                    out.write_all(&[b'f'])?;
                    out.write_all(&v.to_le_bytes())?;
                }
                TagValue::String(s) => {
                    out.write_all(&[b'Z'])?;
                    out.write_all(s)?;
                    out.write_all(&[0])?;
                }
                TagValue::Hex(s) => {
                    out.write_all(&[b'H'])?;
                    out.write_all(s)?;
                    out.write_all(&[0])?;
                }
                TagValue::Array(array) => {
                    out.write_all(&[b'B'])?;
                    write_array(array, out)?;
                }
            }
        }
        Ok(())
    }
}

fn write_array<W: Write>(array: &TagArray, out: &mut W) -> std::io::Result<()> {
    macro_rules! write_elements {
        ($subtype:expr, $values:expr) => {{
            out.write_all(&[$subtype])?;
            out.write_all(&($values.len() as u32).to_le_bytes())?;
            for v in $values {
                out.write_all(&v.to_le_bytes())?;
            }
        }};
    }
    match array {
        TagArray::Int8(values) => write_elements!(b'c', values),
        TagArray::UInt8(values) => write_elements!(b'C', values),
        TagArray::Int16(values) => write_elements!(b's', values),
        TagArray::UInt16(values) => write_elements!(b'S', values),
        TagArray::Int32(values) => write_elements!(b'i', values),
        TagArray::UInt32(values) => write_elements!(b'I', values),
        TagArray::Float(values) => write_elements!(b'f', values),
    }
    Ok(())
}

fn parse_tag(bytes: &[u8], offset: usize) -> std::result::Result<(SliceTag, usize), String> {
    if bytes.len() < offset + 3 {
        return Err(format!("truncated tag header at offset {offset}"));
    }
    let tag = [bytes[offset], bytes[offset + 1]];
    let type_byte = bytes[offset + 2];
    let mut cursor = offset + 3;

    let value = match type_byte {
        b'A' => TagValue::Character(take_fixed::<1>(bytes, &mut cursor)?[0]),
        b'c' => TagValue::Int8(i8::from_le_bytes(take_fixed(bytes, &mut cursor)?)),
        b'C' => TagValue::UInt8(take_fixed::<1>(bytes, &mut cursor)?[0]),
        b's' => TagValue::Int16(i16::from_le_bytes(take_fixed(bytes, &mut cursor)?)),
        b'S' => TagValue::UInt16(u16::from_le_bytes(take_fixed(bytes, &mut cursor)?)),
        b'i' => TagValue::Int32(i32::from_le_bytes(take_fixed(bytes, &mut cursor)?)),
        b'I' => TagValue::UInt32(u32::from_le_bytes(take_fixed(bytes, &mut cursor)?)),
        b'f' => TagValue::Float(f32::from_le_bytes(take_fixed(bytes, &mut cursor)?)),
        b'Z' => TagValue::String(take_nul_terminated(bytes, &mut cursor)?),
        b'H' => TagValue::Hex(take_nul_terminated(bytes, &mut cursor)?),
        b'B' => TagValue::Array(parse_array(bytes, &mut cursor)?),
        other => {
            return Err(format!("unknown tag value type {:?} at offset {offset}", other as char));
        }
    };

    Ok((SliceTag::new(tag, value), cursor))
}

fn parse_array(bytes: &[u8], cursor: &mut usize) -> std::result::Result<TagArray, String> {
    let subtype = take_fixed::<1>(bytes, cursor)?[0];
    let count = u32::from_le_bytes(take_fixed(bytes, cursor)?) as usize;

    macro_rules! read_elements {
        ($variant:ident, $ty:ty) => {{
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(<$ty>::from_le_bytes(take_fixed(bytes, cursor)?));
            }
            Ok(TagArray::$variant(values))
        }};
    }

    match subtype {
        b'c' => read_elements!(Int8, i8),
        b'C' => read_elements!(UInt8, u8),
        b's' => read_elements!(Int16, i16),
        b'S' => read_elements!(UInt16, u16),
        b'i' => read_elements!(Int32, i32),
        b'I' => read_elements!(UInt32, u32),
        b'f' => read_elements!(Float, f32),
        other => Err(format!("unknown tag array subtype {:?}", other as char)),
    }
}

fn take_fixed<const N: usize>(
    bytes: &[u8],
    cursor: &mut usize,
) -> std::result::Result<[u8; N], String> {
    let end = *cursor + N;
    if bytes.len() < end {
        return Err(format!("truncated tag value at offset {cursor}"));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[*cursor..end]);
    *cursor = end;
    Ok(out)
}

fn take_nul_terminated(bytes: &[u8], cursor: &mut usize) -> std::result::Result<BString, String> {
    let rest = &bytes[*cursor..];
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| format!("unterminated string tag at offset {cursor}"))?;
    let value = BString::from(&rest[..nul]);
    *cursor += nul + 1;
    Ok(value)
}
