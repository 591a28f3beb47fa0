//! Slice partitioning policy.
//!
//! For each incoming record the writer asks the partitioner what to do with
//! the records accumulated so far: keep accumulating (possibly under a new
//! context, when a single-reference run is promoted to multi-reference), or
//! seal the current container and start fresh.
//!
//! A container may not mix single-reference and multi-reference slices. The
//! partitioner enforces this at the decision point: when a reference
//! transition arrives below the minimum single-reference slice size but a
//! sibling slice is already staged, it flushes rather than promoting to
//! multi-reference.

use crate::encoding_strategy::EncodingStrategy;
use crate::errors::{CramError, Result};
use crate::record::NO_REFERENCE_INDEX;
use crate::reference_context::ReferenceContext;

/// The partitioner's directive for the next record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceAssignment {
    /// Keep accumulating records under the given context.
    Accumulate(ReferenceContext),
    /// Seal the current container; subsequent records start a new one.
    FlushContainer,
}

/// Decides when a slice is emitted and a container sealed.
#[derive(Debug, Clone)]
pub struct SlicePartitioner {
    max_records_per_slice: usize,
    min_single_reference_slice_size: usize,
    coordinate_sorted: bool,
}

impl SlicePartitioner {
    /// Creates a partitioner from the encoding strategy and the input's sort
    /// order.
    #[must_use]
    pub fn new(strategy: &EncodingStrategy, coordinate_sorted: bool) -> Self {
        Self {
            max_records_per_slice: strategy.records_per_slice,
            min_single_reference_slice_size: strategy.min_single_reference_slice_size,
            coordinate_sorted,
        }
    }

    /// Decides whether the accumulated records should be flushed before
    /// admitting the next record.
    ///
    /// * `current` - context of the records accumulated so far
    /// * `next_reference_index` - reference index of the next record
    ///   (`-1` for unmapped)
    /// * `record_count` - number of records accumulated so far
    /// * `staged_slice_count` - slices already staged for the current
    ///   container
    ///
    /// # Errors
    ///
    /// * [`CramError::State`] when asked to transition from `Uninitialized`
    ///   while records have already accumulated.
    /// * [`CramError::Policy`] when coordinate-sorted input presents a mapped
    ///   record after unmapped ones, or the next reference index is invalid.
    pub fn should_emit_slice(
        &self,
        current: ReferenceContext,
        next_reference_index: i32,
        record_count: usize,
        staged_slice_count: usize,
    ) -> Result<SliceAssignment> {
        if next_reference_index < NO_REFERENCE_INDEX {
            return Err(CramError::policy(format!(
                "invalid next reference index: {next_reference_index}"
            )));
        }

        match current {
            ReferenceContext::Uninitialized => {
                if record_count != 0 {
                    return Err(CramError::state(
                        "reference context should have been initialized if records have \
                         previously been processed",
                    ));
                }
                Ok(SliceAssignment::Accumulate(context_for(next_reference_index)))
            }

            ReferenceContext::UnmappedUnplaced => {
                if next_reference_index == NO_REFERENCE_INDEX {
                    // still unmapped
                    if record_count < self.max_records_per_slice {
                        Ok(SliceAssignment::Accumulate(ReferenceContext::UnmappedUnplaced))
                    } else {
                        Ok(SliceAssignment::FlushContainer)
                    }
                } else if self.coordinate_sorted {
                    Err(CramError::policy(
                        "invalid coordinate-sorted input: unmapped records must be last",
                    ))
                } else if record_count >= self.max_records_per_slice {
                    Ok(SliceAssignment::FlushContainer)
                } else {
                    // Unsorted input: let the mapped record join the unmapped
                    // ones; no index query depends on this slice's context.
                    Ok(SliceAssignment::Accumulate(ReferenceContext::MultipleReference))
                }
            }

            ReferenceContext::MultipleReference => {
                if self.coordinate_sorted {
                    // Emit a small multi-ref slice so the stream can get back
                    // on track for single-reference.
                    if record_count < self.min_single_reference_slice_size {
                        Ok(SliceAssignment::Accumulate(ReferenceContext::MultipleReference))
                    } else {
                        Ok(SliceAssignment::FlushContainer)
                    }
                } else if record_count >= self.max_records_per_slice {
                    Ok(SliceAssignment::FlushContainer)
                } else {
                    Ok(SliceAssignment::Accumulate(ReferenceContext::MultipleReference))
                }
            }

            ReferenceContext::SingleReference(current_id) => {
                if next_reference_index == current_id {
                    // still on the same reference contig
                    if record_count >= self.max_records_per_slice {
                        Ok(SliceAssignment::FlushContainer)
                    } else {
                        Ok(SliceAssignment::Accumulate(ReferenceContext::SingleReference(
                            current_id,
                        )))
                    }
                } else if record_count < self.min_single_reference_slice_size {
                    if staged_slice_count > 0 {
                        // A sibling slice is already staged: flush instead of
                        // promoting, so a multi-ref slice never shares a
                        // container with single-ref slices.
                        Ok(SliceAssignment::FlushContainer)
                    } else {
                        Ok(SliceAssignment::Accumulate(ReferenceContext::MultipleReference))
                    }
                } else {
                    Ok(SliceAssignment::FlushContainer)
                }
            }
        }
    }
}

fn context_for(reference_index: i32) -> ReferenceContext {
    if reference_index == NO_REFERENCE_INDEX {
        ReferenceContext::UnmappedUnplaced
    } else {
        ReferenceContext::SingleReference(reference_index)
    }
}
