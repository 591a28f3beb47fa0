//! Sealed slices.
//!
//! A slice is the smallest indexable unit in a container: a bounded run of
//! records, usually sharing one reference context, bound to the container's
//! compression header. Slices are built from staged records when a container
//! is sealed; per-reference alignment statistics are computed at construction
//! so multi-reference slices can later be decomposed into per-context index
//! entries.

use crate::alignment_span::AlignmentSpan;
use crate::bai_entry::BaiEntry;
use crate::compression_header::CompressionHeader;
use crate::crai::CraiEntry;
use crate::errors::{CramError, Result};
use crate::record::{CramRecord, NO_REFERENCE_INDEX};
use crate::reference_context::ReferenceContext;
use crate::slice_tags::SliceTags;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Sentinel written when a slice carries no embedded reference block.
pub const NO_EMBEDDED_REFERENCE_ID: i32 = -1;

/// A sealed slice, ready for header serialization and index-entry emission.
#[derive(Debug, Clone)]
pub struct Slice {
    reference_context: ReferenceContext,
    alignment_start: i32,
    alignment_span: i32,
    nof_records: i32,
    global_record_counter: u64,
    nof_blocks: i32,
    external_content_ids: Vec<i32>,
    embedded_reference_content_id: i32,
    reference_md5: Option<[u8; 16]>,
    tags: SliceTags,
    compression_header: Arc<CompressionHeader>,
    /// Per-reference-context statistics; populated on the write side only.
    reference_spans: BTreeMap<i32, AlignmentSpan>,
    container_start_byte_offset: i64,
    byte_offset_from_compression_header: i64,
    landmark_index: i32,
}

impl Slice {
    /// Builds a slice from the records staged for it.
    ///
    /// The compression header supplies the external content ids and the
    /// embedded-reference id the slice will declare; `reference_md5` is the
    /// snapshot of the current reference region (absent for multi-reference
    /// and unmapped slices).
    ///
    /// # Errors
    ///
    /// * [`CramError::State`] when the context is `Uninitialized`.
    /// * [`CramError::Structural`] when the slice would be empty, or the
    ///   declared embedded-reference id is not among the external content ids
    ///   (the embedded reference block is stored as an external block).
    pub fn from_staged_records(
        reference_context: ReferenceContext,
        records: &[CramRecord],
        global_record_counter: u64,
        compression_header: Arc<CompressionHeader>,
        container_start_byte_offset: i64,
        reference_md5: Option<[u8; 16]>,
    ) -> Result<Self> {
        if reference_context == ReferenceContext::Uninitialized {
            return Err(CramError::state("cannot seal a slice with an uninitialized context"));
        }
        if records.is_empty() {
            return Err(CramError::structural("cannot seal an empty slice"));
        }

        let external_content_ids = compression_header.external_content_ids().to_vec();
        let embedded_reference_content_id = compression_header
            .embedded_reference_content_id()
            .unwrap_or(NO_EMBEDDED_REFERENCE_ID);
        if embedded_reference_content_id != NO_EMBEDDED_REFERENCE_ID
            && !external_content_ids.contains(&embedded_reference_content_id)
        {
            return Err(CramError::structural(format!(
                "embedded reference content id {embedded_reference_content_id} is not an \
                 external block of the container"
            )));
        }

        let reference_spans = compute_reference_spans(records);
        let (alignment_start, alignment_span) = match reference_context {
            ReferenceContext::SingleReference(id) => reference_spans
                .get(&id)
                .map_or((0, 0), |span| (span.alignment_start(), span.alignment_span())),
            _ => (0, 0),
        };

        // one core block plus the external data blocks (the embedded
        // reference block, when present, is one of the external blocks)
        let nof_blocks = 1 + external_content_ids.len() as i32;

        Ok(Self {
            reference_context,
            alignment_start,
            alignment_span,
            nof_records: records.len() as i32,
            global_record_counter,
            nof_blocks,
            external_content_ids,
            embedded_reference_content_id,
            reference_md5,
            tags: SliceTags::new(),
            compression_header,
            reference_spans,
            container_start_byte_offset,
            byte_offset_from_compression_header: 0,
            landmark_index: 0,
        })
    }

    /// Rebuilds a slice from parsed header fields. Used by the header codec's
    /// read side; per-reference statistics are not available on this path.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_header_fields(
        reference_context: ReferenceContext,
        alignment_start: i32,
        alignment_span: i32,
        nof_records: i32,
        global_record_counter: u64,
        nof_blocks: i32,
        external_content_ids: Vec<i32>,
        embedded_reference_content_id: i32,
        reference_md5: Option<[u8; 16]>,
        tags: SliceTags,
        compression_header: Arc<CompressionHeader>,
    ) -> Self {
        Self {
            reference_context,
            alignment_start,
            alignment_span,
            nof_records,
            global_record_counter,
            nof_blocks,
            external_content_ids,
            embedded_reference_content_id,
            reference_md5,
            tags,
            compression_header,
            reference_spans: BTreeMap::new(),
            container_start_byte_offset: 0,
            byte_offset_from_compression_header: 0,
            landmark_index: 0,
        }
    }

    /// The slice's reference context.
    #[must_use]
    pub fn reference_context(&self) -> ReferenceContext {
        self.reference_context
    }

    /// 1-based alignment start (0 for multi-reference and unmapped slices).
    #[must_use]
    pub fn alignment_start(&self) -> i32 {
        self.alignment_start
    }

    /// Number of reference bases covered.
    #[must_use]
    pub fn alignment_span(&self) -> i32 {
        self.alignment_span
    }

    /// Number of records in the slice.
    #[must_use]
    pub fn nof_records(&self) -> i32 {
        self.nof_records
    }

    /// Global record counter at the slice's first record.
    #[must_use]
    pub fn global_record_counter(&self) -> u64 {
        self.global_record_counter
    }

    /// Number of blocks the slice serializes to (core plus external).
    #[must_use]
    pub fn nof_blocks(&self) -> i32 {
        self.nof_blocks
    }

    /// Content ids of the slice's external blocks.
    #[must_use]
    pub fn external_content_ids(&self) -> &[i32] {
        &self.external_content_ids
    }

    /// Content id of the embedded reference block (`-1` when absent).
    #[must_use]
    pub fn embedded_reference_content_id(&self) -> i32 {
        self.embedded_reference_content_id
    }

    /// MD5 of the reference bases backing this slice, when recorded.
    #[must_use]
    pub fn reference_md5(&self) -> Option<&[u8; 16]> {
        self.reference_md5.as_ref()
    }

    /// The slice's tag chain.
    #[must_use]
    pub fn tags(&self) -> &SliceTags {
        &self.tags
    }

    /// Replaces the slice's tag chain.
    pub fn set_tags(&mut self, tags: SliceTags) {
        self.tags = tags;
    }

    /// The container-wide compression header this slice is bound to.
    #[must_use]
    pub fn compression_header(&self) -> &Arc<CompressionHeader> {
        &self.compression_header
    }

    /// Byte offset of the containing container in the stream.
    #[must_use]
    pub fn container_start_byte_offset(&self) -> i64 {
        self.container_start_byte_offset
    }

    /// Byte offset of this slice from the end of the compression header.
    #[must_use]
    pub fn byte_offset_from_compression_header(&self) -> i64 {
        self.byte_offset_from_compression_header
    }

    /// The slice's 0-based position within its container's slice array.
    #[must_use]
    pub fn landmark_index(&self) -> i32 {
        self.landmark_index
    }

    /// Records the slice's position within its container, set by the
    /// container writer once block offsets are known.
    pub fn set_container_position(
        &mut self,
        byte_offset_from_compression_header: i64,
        landmark_index: i32,
    ) {
        self.byte_offset_from_compression_header = byte_offset_from_compression_header;
        self.landmark_index = landmark_index;
    }

    /// Emits the slice's binary-index entries.
    ///
    /// Single-reference and unmapped slices contribute exactly one entry.
    /// Multi-reference slices are decomposed into one entry per constituent
    /// context, in ascending reference id order with the unmapped-unplaced
    /// partition last; the multi-reference context itself is never emitted.
    ///
    /// # Errors
    ///
    /// * [`CramError::State`] for an uninitialized context.
    /// * [`CramError::Policy`] from index-entry validation.
    pub fn bai_entries(&self) -> Result<Vec<BaiEntry>> {
        match self.reference_context {
            ReferenceContext::Uninitialized => {
                Err(CramError::state("cannot index a slice with an uninitialized context"))
            }
            ReferenceContext::SingleReference(id) => {
                let span = self.reference_spans.get(&id).copied().unwrap_or_else(|| {
                    AlignmentSpan::new(self.alignment_start, self.alignment_span, 0, 0, 0)
                });
                Ok(vec![self.bai_entry(ReferenceContext::SingleReference(id), span)?])
            }
            ReferenceContext::UnmappedUnplaced => {
                let span = self
                    .reference_spans
                    .get(&NO_REFERENCE_INDEX)
                    .copied()
                    .unwrap_or_else(|| AlignmentSpan::unmapped_unplaced(self.nof_records as u64));
                Ok(vec![self.bai_entry(ReferenceContext::UnmappedUnplaced, span)?])
            }
            ReferenceContext::MultipleReference => {
                let mut entries = Vec::with_capacity(self.reference_spans.len());
                for (&reference_id, span) in &self.reference_spans {
                    if reference_id != NO_REFERENCE_INDEX {
                        entries.push(self.bai_entry(
                            ReferenceContext::SingleReference(reference_id),
                            *span,
                        )?);
                    }
                }
                if let Some(span) = self.reference_spans.get(&NO_REFERENCE_INDEX) {
                    entries.push(self.bai_entry(ReferenceContext::UnmappedUnplaced, *span)?);
                }
                Ok(entries)
            }
        }
    }

    /// Emits the slice's `.crai` entries, decomposed the same way as
    /// [`Slice::bai_entries`].
    ///
    /// # Errors
    ///
    /// As [`Slice::bai_entries`].
    pub fn crai_entries(&self, slice_byte_size: i64) -> Result<Vec<CraiEntry>> {
        Ok(self
            .bai_entries()?
            .iter()
            .map(|entry| CraiEntry::from_bai_entry(entry, slice_byte_size))
            .collect())
    }

    fn bai_entry(&self, context: ReferenceContext, span: AlignmentSpan) -> Result<BaiEntry> {
        BaiEntry::new(
            context,
            span,
            self.container_start_byte_offset,
            self.byte_offset_from_compression_header,
            self.landmark_index,
        )
    }
}

/// Header-field equality: everything that survives a write/read round trip.
impl PartialEq for Slice {
    fn eq(&self, other: &Self) -> bool {
        self.reference_context == other.reference_context
            && self.alignment_start == other.alignment_start
            && self.alignment_span == other.alignment_span
            && self.nof_records == other.nof_records
            && self.global_record_counter == other.global_record_counter
            && self.nof_blocks == other.nof_blocks
            && self.external_content_ids == other.external_content_ids
            && self.embedded_reference_content_id == other.embedded_reference_content_id
            && self.reference_md5 == other.reference_md5
            && self.tags == other.tags
    }
}

fn compute_reference_spans(records: &[CramRecord]) -> BTreeMap<i32, AlignmentSpan> {
    let mut spans: BTreeMap<i32, AlignmentSpan> = BTreeMap::new();
    for record in records {
        let (key, span) = if record.is_placed() {
            let counts = if record.is_unmapped() { (0, 1) } else { (1, 0) };
            (
                record.reference_index(),
                AlignmentSpan::new(
                    record.alignment_start(),
                    record.alignment_end() - record.alignment_start() + 1,
                    counts.0,
                    counts.1,
                    0,
                ),
            )
        } else {
            (NO_REFERENCE_INDEX, AlignmentSpan::unmapped_unplaced(1))
        };
        spans.entry(key).and_modify(|existing| existing.merge(&span)).or_insert(span);
    }
    spans
}
