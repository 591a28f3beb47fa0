//! Container compression header interface.
//!
//! Building a compression header (choosing encodings and data series for a
//! container) is an external concern. The slicing pipeline only requires the
//! pieces of the finished header that slices consult: the external content ids
//! each slice will emit a data block for, the embedded-reference block id when
//! one is present, and the preservation booleans.

use crate::errors::Result;
use crate::record::CramRecord;

/// The parts of a container compression header visible to slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionHeader {
    records_have_names: bool,
    alignment_starts_are_deltas: bool,
    external_content_ids: Vec<i32>,
    embedded_reference_content_id: Option<i32>,
}

impl CompressionHeader {
    /// Creates a header from its slice-visible parts.
    #[must_use]
    pub fn new(
        records_have_names: bool,
        alignment_starts_are_deltas: bool,
        external_content_ids: Vec<i32>,
        embedded_reference_content_id: Option<i32>,
    ) -> Self {
        Self {
            records_have_names,
            alignment_starts_are_deltas,
            external_content_ids,
            embedded_reference_content_id,
        }
    }

    /// True when read names are preserved in the container.
    #[must_use]
    pub fn records_have_names(&self) -> bool {
        self.records_have_names
    }

    /// True when alignment starts are delta-encoded.
    #[must_use]
    pub fn alignment_starts_are_deltas(&self) -> bool {
        self.alignment_starts_are_deltas
    }

    /// Content ids of the external data blocks each slice emits.
    #[must_use]
    pub fn external_content_ids(&self) -> &[i32] {
        &self.external_content_ids
    }

    /// Content id of the embedded reference block, when present.
    #[must_use]
    pub fn embedded_reference_content_id(&self) -> Option<i32> {
        self.embedded_reference_content_id
    }
}

impl Default for CompressionHeader {
    fn default() -> Self {
        Self::new(true, true, Vec::new(), None)
    }
}

/// Builds a [`CompressionHeader`] from every record that will live in the
/// container.
///
/// Implementations must be shown *all* records destined for the container, no
/// matter how they are distributed across its slices.
pub trait CompressionHeaderBuilder {
    /// Builds the container's compression header.
    ///
    /// # Errors
    ///
    /// Returns an error if the record stream cannot be summarized into a
    /// coherent set of encodings.
    fn build(&self, records: &mut dyn Iterator<Item = &CramRecord>) -> Result<CompressionHeader>;
}
