//! Tunable parameters for slice and container construction.

/// CRAM major version written by default.
pub const DEFAULT_MAJOR_VERSION: u8 = 3;

/// Parameters governing how records are packed into slices and containers.
///
/// The defaults match common writer settings: up to 10,000 records per slice,
/// single-reference slices of fewer than 1,000 records eligible for
/// multi-reference packing, one slice per container.
#[derive(Debug, Clone)]
pub struct EncodingStrategy {
    /// CRAM major format version to write.
    pub major_version: u8,
    /// Maximum number of records accumulated into one slice.
    pub records_per_slice: usize,
    /// Below this record count a single-reference run may be folded into a
    /// multi-reference slice instead of forming an undersized slice.
    pub min_single_reference_slice_size: usize,
    /// Number of slices staged before a container is sealed.
    pub slices_per_container: usize,
}

impl Default for EncodingStrategy {
    fn default() -> Self {
        Self {
            major_version: DEFAULT_MAJOR_VERSION,
            records_per_slice: 10_000,
            min_single_reference_slice_size: 1_000,
            slices_per_container: 1,
        }
    }
}

impl EncodingStrategy {
    /// Sets the maximum records per slice.
    #[must_use]
    pub fn with_records_per_slice(mut self, records_per_slice: usize) -> Self {
        self.records_per_slice = records_per_slice;
        self
    }

    /// Sets the minimum single-reference slice size.
    #[must_use]
    pub fn with_min_single_reference_slice_size(mut self, size: usize) -> Self {
        self.min_single_reference_slice_size = size;
        self
    }

    /// Sets the number of slices per container.
    #[must_use]
    pub fn with_slices_per_container(mut self, slices_per_container: usize) -> Self {
        self.slices_per_container = slices_per_container;
        self
    }
}
