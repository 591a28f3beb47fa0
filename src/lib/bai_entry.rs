//! Per-slice entries for binary-index construction.
//!
//! Each sealed slice contributes one entry for a single-reference or
//! unmapped-unplaced context. Multi-reference slices are decomposed into one
//! entry per constituent context before reaching this type, so a
//! multi-reference context can never appear here.

use crate::alignment_span::AlignmentSpan;
use crate::errors::{CramError, Result};
use crate::reference_context::ReferenceContext;
use std::cmp::Ordering;

/// One row of the binary alignment index.
#[derive(Debug, Clone)]
pub struct BaiEntry {
    reference_context: ReferenceContext,
    alignment_span: AlignmentSpan,
    container_start_byte_offset: i64,
    slice_byte_offset_from_compression_header: i64,
    landmark_index: i32,
}

impl BaiEntry {
    /// Creates an index entry.
    ///
    /// For unmapped-unplaced contexts the alignment start and span are
    /// meaningless; a start of `-1` and a span of `1` are tolerated for
    /// legacy inputs. Use [`BaiEntry::new_strict`] to reject them.
    ///
    /// # Errors
    ///
    /// Returns a policy error when the context is multi-reference, or when an
    /// unmapped-unplaced context carries an alignment start outside `{0, -1}`
    /// or a span outside `{0, 1}`.
    pub fn new(
        reference_context: ReferenceContext,
        alignment_span: AlignmentSpan,
        container_start_byte_offset: i64,
        slice_byte_offset_from_compression_header: i64,
        landmark_index: i32,
    ) -> Result<Self> {
        if reference_context.is_multiple_reference() {
            return Err(CramError::policy(
                "attempt to create an index entry from a multi-reference context",
            ));
        }
        if reference_context.is_unmapped_unplaced() {
            let start = alignment_span.alignment_start();
            let span = alignment_span.alignment_span();
            if !matches!(start, 0 | -1) || !matches!(span, 0 | 1) {
                return Err(CramError::policy(format!(
                    "unmapped index entry with non-sentinel alignment start ({start}) or span \
                     ({span})"
                )));
            }
        }

        Ok(Self {
            reference_context,
            alignment_span,
            container_start_byte_offset,
            slice_byte_offset_from_compression_header,
            landmark_index,
        })
    }

    /// Creates an index entry, rejecting the legacy `-1` start / `1` span
    /// tolerance for unmapped-unplaced contexts.
    ///
    /// # Errors
    ///
    /// As [`BaiEntry::new`], plus a policy error when an unmapped-unplaced
    /// context carries any non-zero alignment start or span.
    pub fn new_strict(
        reference_context: ReferenceContext,
        alignment_span: AlignmentSpan,
        container_start_byte_offset: i64,
        slice_byte_offset_from_compression_header: i64,
        landmark_index: i32,
    ) -> Result<Self> {
        if reference_context.is_unmapped_unplaced()
            && (alignment_span.alignment_start() != 0 || alignment_span.alignment_span() != 0)
        {
            return Err(CramError::policy(format!(
                "unmapped index entry with non-zero alignment start ({}) or span ({})",
                alignment_span.alignment_start(),
                alignment_span.alignment_span()
            )));
        }
        Self::new(
            reference_context,
            alignment_span,
            container_start_byte_offset,
            slice_byte_offset_from_compression_header,
            landmark_index,
        )
    }

    /// The entry's reference context (never multi-reference).
    #[must_use]
    pub fn reference_context(&self) -> ReferenceContext {
        self.reference_context
    }

    /// The entry's alignment extent and record counts.
    #[must_use]
    pub fn alignment_span(&self) -> &AlignmentSpan {
        &self.alignment_span
    }

    /// 1-based alignment start of the covered region.
    #[must_use]
    pub fn alignment_start(&self) -> i32 {
        self.alignment_span.alignment_start()
    }

    /// Byte offset of the containing container in the stream.
    #[must_use]
    pub fn container_start_byte_offset(&self) -> i64 {
        self.container_start_byte_offset
    }

    /// Byte offset of the slice from the end of the compression header.
    #[must_use]
    pub fn slice_byte_offset_from_compression_header(&self) -> i64 {
        self.slice_byte_offset_from_compression_header
    }

    /// The slice's 0-based position within its container's slice array.
    #[must_use]
    pub fn landmark_index(&self) -> i32 {
        self.landmark_index
    }
}

/// Sort by reference sequence id ascending with unmapped-unplaced entries
/// last; placed entries additionally by alignment start; ties broken by
/// container offset, then slice offset. Alignment start is skipped for
/// unmapped entries, whose start carries no meaning.
impl Ord for BaiEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        let unmapped = self.reference_context.is_unmapped_unplaced();
        match (unmapped, other.reference_context.is_unmapped_unplaced()) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        if !unmapped {
            let by_reference = self
                .reference_context
                .serializable_id()
                .cmp(&other.reference_context.serializable_id());
            if by_reference != Ordering::Equal {
                return by_reference;
            }

            let by_start = self.alignment_start().cmp(&other.alignment_start());
            if by_start != Ordering::Equal {
                return by_start;
            }
        }

        self.container_start_byte_offset
            .cmp(&other.container_start_byte_offset)
            .then_with(|| {
                self.slice_byte_offset_from_compression_header
                    .cmp(&other.slice_byte_offset_from_compression_header)
            })
    }
}

impl PartialOrd for BaiEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Equality follows the ordering key, so sorting is total and reflexive on
/// equal keys.
impl PartialEq for BaiEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BaiEntry {}
