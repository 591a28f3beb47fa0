//! CRAM index (`.crai`) entries.
//!
//! The `.crai` flavor of the index is a gzipped text table with one line per
//! slice (or per constituent context of a multi-reference slice):
//! `seqId start span containerOffset sliceOffset sliceSize`, tab separated.
//! Entries are produced from the same decomposition that feeds the binary
//! index, with the slice's encoded byte size supplied by the container
//! writer.

use crate::bai_entry::BaiEntry;
use std::cmp::Ordering;
use std::fmt;

/// One line of a `.crai` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraiEntry {
    sequence_id: i32,
    alignment_start: i32,
    alignment_span: i32,
    container_start_byte_offset: i64,
    slice_byte_offset_from_compression_header: i64,
    slice_byte_size: i64,
}

impl CraiEntry {
    /// Builds a `.crai` entry from a binary-index entry and the slice's
    /// encoded byte size.
    #[must_use]
    pub fn from_bai_entry(entry: &BaiEntry, slice_byte_size: i64) -> Self {
        Self {
            sequence_id: entry.reference_context().serializable_id(),
            alignment_start: entry.alignment_start(),
            alignment_span: entry.alignment_span().alignment_span(),
            container_start_byte_offset: entry.container_start_byte_offset(),
            slice_byte_offset_from_compression_header: entry
                .slice_byte_offset_from_compression_header(),
            slice_byte_size,
        }
    }

    /// The reference sequence id (`-1` for unmapped-unplaced).
    #[must_use]
    pub fn sequence_id(&self) -> i32 {
        self.sequence_id
    }

    /// 1-based alignment start.
    #[must_use]
    pub fn alignment_start(&self) -> i32 {
        self.alignment_start
    }

    /// Number of reference bases covered.
    #[must_use]
    pub fn alignment_span(&self) -> i32 {
        self.alignment_span
    }

    /// Byte offset of the containing container.
    #[must_use]
    pub fn container_start_byte_offset(&self) -> i64 {
        self.container_start_byte_offset
    }

    /// Byte offset of the slice from the end of the compression header.
    #[must_use]
    pub fn slice_byte_offset_from_compression_header(&self) -> i64 {
        self.slice_byte_offset_from_compression_header
    }

    /// Encoded byte size of the slice.
    #[must_use]
    pub fn slice_byte_size(&self) -> i64 {
        self.slice_byte_size
    }
}

/// `.crai` lines sort by sequence id, then alignment start, then span.
impl Ord for CraiEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sequence_id
            .cmp(&other.sequence_id)
            .then_with(|| self.alignment_start.cmp(&other.alignment_start))
            .then_with(|| self.alignment_span.cmp(&other.alignment_span))
    }
}

impl PartialOrd for CraiEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CraiEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.sequence_id,
            self.alignment_start,
            self.alignment_span,
            self.container_start_byte_offset,
            self.slice_byte_offset_from_compression_header,
            self.slice_byte_size
        )
    }
}
