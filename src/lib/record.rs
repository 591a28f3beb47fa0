//! Per-slice record values.
//!
//! The record-level encoder (bases, qualities, read features) is an external
//! collaborator; what the slicing pipeline needs from each alignment is the
//! projection captured here: placement, flags, mate hints, and the mate-link
//! state that the slice encoder consults when emitting intra-slice mate
//! references.

use crate::errors::Result;
use crate::header::ReadGroupIndex;
use bstr::BString;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record_buf::RecordBuf;

/// Sentinel for "no reference sequence" (unmapped or unplaced).
pub const NO_REFERENCE_INDEX: i32 = -1;

/// Sentinel for "no alignment start".
pub const NO_ALIGNMENT_START: i32 = 0;

/// The slicing-relevant projection of one aligned record.
///
/// A record is *detached* when its mate could not be resolved within the
/// slice; detached records store their mate info verbatim rather than as an
/// intra-slice reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CramRecord {
    index: usize,
    flags: Flags,
    read_name: BString,
    reference_index: i32,
    alignment_start: i32,
    read_length: i32,
    mate_reference_index: i32,
    mate_alignment_start: i32,
    template_length: i32,
    read_group_id: i32,
    detached: bool,
    next_mate_index: Option<usize>,
    previous_mate_index: Option<usize>,
}

impl CramRecord {
    /// Projects an alignment into a slice record.
    ///
    /// `index` is the record's position within its slice; the read group id is
    /// resolved through the header's read-group table (`-1` when the record
    /// carries no known `RG` tag).
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` reserves room for stricter
    /// validation of malformed inputs.
    pub fn from_alignment(
        record: &RecordBuf,
        index: usize,
        read_groups: &ReadGroupIndex,
    ) -> Result<Self> {
        let read_name: &[u8] = record.name().map_or(&[], <_ as AsRef<[u8]>>::as_ref);
        let reference_index =
            record.reference_sequence_id().map_or(NO_REFERENCE_INDEX, |id| id as i32);
        let alignment_start =
            record.alignment_start().map_or(NO_ALIGNMENT_START, |p| usize::from(p) as i32);
        let mate_reference_index =
            record.mate_reference_sequence_id().map_or(NO_REFERENCE_INDEX, |id| id as i32);
        let mate_alignment_start =
            record.mate_alignment_start().map_or(NO_ALIGNMENT_START, |p| usize::from(p) as i32);

        Ok(Self {
            index,
            flags: record.flags(),
            read_name: BString::from(read_name),
            reference_index,
            alignment_start,
            read_length: record.sequence().len() as i32,
            mate_reference_index,
            mate_alignment_start,
            template_length: record.template_length(),
            read_group_id: read_groups.resolve(record),
            detached: false,
            next_mate_index: None,
            previous_mate_index: None,
        })
    }

    /// The record's position within its slice.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The record's BAM flags.
    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The record's read name.
    #[must_use]
    pub fn read_name(&self) -> &BString {
        &self.read_name
    }

    /// Reference sequence index (`-1` when unplaced).
    #[must_use]
    pub fn reference_index(&self) -> i32 {
        self.reference_index
    }

    /// 1-based alignment start (`0` when unplaced).
    #[must_use]
    pub fn alignment_start(&self) -> i32 {
        self.alignment_start
    }

    /// 1-based inclusive alignment end, derived from the stored read length.
    #[must_use]
    pub fn alignment_end(&self) -> i32 {
        self.alignment_start + self.read_length.max(1) - 1
    }

    /// Number of bases in the read.
    #[must_use]
    pub fn read_length(&self) -> i32 {
        self.read_length
    }

    /// The mate's reference sequence index as declared by this record.
    #[must_use]
    pub fn mate_reference_index(&self) -> i32 {
        self.mate_reference_index
    }

    /// The mate's 1-based alignment start as declared by this record.
    #[must_use]
    pub fn mate_alignment_start(&self) -> i32 {
        self.mate_alignment_start
    }

    /// Template length (TLEN).
    #[must_use]
    pub fn template_length(&self) -> i32 {
        self.template_length
    }

    /// Read group id resolved from the header table (`-1` when absent).
    #[must_use]
    pub fn read_group_id(&self) -> i32 {
        self.read_group_id
    }

    /// True when the record is part of a paired template.
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.flags.is_segmented()
    }

    /// True for secondary alignments.
    #[must_use]
    pub fn is_secondary(&self) -> bool {
        self.flags.is_secondary()
    }

    /// True for supplementary alignments.
    #[must_use]
    pub fn is_supplementary(&self) -> bool {
        self.flags.is_supplementary()
    }

    /// True when the record itself is unmapped.
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.flags.is_unmapped()
    }

    /// True when the record is on the reverse strand.
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.flags.is_reverse_complemented()
    }

    /// True when this record declares its mate unmapped.
    #[must_use]
    pub fn is_mate_unmapped(&self) -> bool {
        self.flags.is_mate_unmapped()
    }

    /// True when this record declares its mate on the reverse strand.
    #[must_use]
    pub fn is_mate_reverse(&self) -> bool {
        self.flags.is_mate_reverse_complemented()
    }

    /// True when the record has both a reference index and an alignment start.
    ///
    /// Records with only one of the pair are treated as unplaced.
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.reference_index != NO_REFERENCE_INDEX && self.alignment_start != NO_ALIGNMENT_START
    }

    /// True when the record's mate was not resolved within the slice.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Marks or clears the detached state.
    pub fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
    }

    /// Slice-local index of the downstream mate, if linked.
    #[must_use]
    pub fn next_mate_index(&self) -> Option<usize> {
        self.next_mate_index
    }

    /// Slice-local index of the upstream mate, if this record is a link target.
    #[must_use]
    pub fn previous_mate_index(&self) -> Option<usize> {
        self.previous_mate_index
    }

    /// True when a downstream in-slice mate is linked.
    #[must_use]
    pub fn has_mate_downstream(&self) -> bool {
        self.next_mate_index.is_some()
    }

    /// Number of records between this one and its downstream mate.
    ///
    /// `-1` when no downstream mate is linked.
    #[must_use]
    pub fn records_to_next_fragment(&self) -> i32 {
        match self.next_mate_index {
            Some(next) => (next - self.index - 1) as i32,
            None => -1,
        }
    }

    /// Links `mate_index` as this record's downstream in-slice mate.
    pub fn attach_to_mate(&mut self, mate_index: usize) {
        debug_assert!(mate_index > self.index);
        self.next_mate_index = Some(mate_index);
    }

    /// Records that the record at `mate_index` links down to this one.
    pub fn set_previous_mate(&mut self, mate_index: usize) {
        self.previous_mate_index = Some(mate_index);
    }

    /// Severs any mate links, in both directions.
    pub fn clear_mate_links(&mut self) {
        self.next_mate_index = None;
        self.previous_mate_index = None;
    }
}
