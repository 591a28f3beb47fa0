//! LTF8 variable-length integer encoding.
//!
//! LTF8 extends the ITF8 prefix scheme to 64-bit values in 1-9 bytes. Unlike
//! ITF8, continuation bytes always carry full octets; the 9-byte form has a
//! `0xFF` prefix byte followed by the value's eight big-endian bytes.

use crate::itf8::read_byte;
use std::io::{self, Read, Write};

/// Writes `value` as LTF8, returning the number of bytes written.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_ltf8<W: Write>(value: i64, out: &mut W) -> io::Result<usize> {
    let v = value as u64;
    if v >> 7 == 0 {
        out.write_all(&[v as u8])?;
        Ok(1)
    } else if v >> 14 == 0 {
        out.write_all(&[(v >> 8) as u8 | 0x80, v as u8])?;
        Ok(2)
    } else if v >> 21 == 0 {
        out.write_all(&[(v >> 16) as u8 | 0xC0, (v >> 8) as u8, v as u8])?;
        Ok(3)
    } else if v >> 28 == 0 {
        out.write_all(&[(v >> 24) as u8 | 0xE0, (v >> 16) as u8, (v >> 8) as u8, v as u8])?;
        Ok(4)
    } else if v >> 35 == 0 {
        out.write_all(&[
            (v >> 32) as u8 | 0xF0,
            (v >> 24) as u8,
            (v >> 16) as u8,
            (v >> 8) as u8,
            v as u8,
        ])?;
        Ok(5)
    } else if v >> 42 == 0 {
        out.write_all(&[
            (v >> 40) as u8 | 0xF8,
            (v >> 32) as u8,
            (v >> 24) as u8,
            (v >> 16) as u8,
            (v >> 8) as u8,
            v as u8,
        ])?;
        Ok(6)
    } else if v >> 49 == 0 {
        out.write_all(&[
            (v >> 48) as u8 | 0xFC,
            (v >> 40) as u8,
            (v >> 32) as u8,
            (v >> 24) as u8,
            (v >> 16) as u8,
            (v >> 8) as u8,
            v as u8,
        ])?;
        Ok(7)
    } else if v >> 56 == 0 {
        out.write_all(&[
            0xFE,
            (v >> 48) as u8,
            (v >> 40) as u8,
            (v >> 32) as u8,
            (v >> 24) as u8,
            (v >> 16) as u8,
            (v >> 8) as u8,
            v as u8,
        ])?;
        Ok(8)
    } else {
        out.write_all(&[
            0xFF,
            (v >> 56) as u8,
            (v >> 48) as u8,
            (v >> 40) as u8,
            (v >> 32) as u8,
            (v >> 24) as u8,
            (v >> 16) as u8,
            (v >> 8) as u8,
            v as u8,
        ])?;
        Ok(9)
    }
}

/// Reads a single LTF8-encoded value.
///
/// # Errors
///
/// Returns an error if the input ends before the encoding is complete.
pub fn read_ltf8<R: Read>(input: &mut R) -> io::Result<i64> {
    let b1 = u64::from(read_byte(input)?);

    // Count of continuation bytes is given by the leading ones of b1.
    let value = if b1 & 0x80 == 0 {
        b1
    } else if b1 & 0x40 == 0 {
        (b1 & 0x7F) << 8 | read_be(input, 1)?
    } else if b1 & 0x20 == 0 {
        (b1 & 0x3F) << 16 | read_be(input, 2)?
    } else if b1 & 0x10 == 0 {
        (b1 & 0x1F) << 24 | read_be(input, 3)?
    } else if b1 & 0x08 == 0 {
        (b1 & 0x0F) << 32 | read_be(input, 4)?
    } else if b1 & 0x04 == 0 {
        (b1 & 0x07) << 40 | read_be(input, 5)?
    } else if b1 & 0x02 == 0 {
        (b1 & 0x03) << 48 | read_be(input, 6)?
    } else if b1 & 0x01 == 0 {
        read_be(input, 7)?
    } else {
        read_be(input, 8)?
    };
    Ok(value as i64)
}

/// Reads `n` bytes as a big-endian unsigned value.
fn read_be<R: Read>(input: &mut R, n: usize) -> io::Result<u64> {
    let mut value = 0u64;
    for _ in 0..n {
        value = value << 8 | u64::from(read_byte(input)?);
    }
    Ok(value)
}
