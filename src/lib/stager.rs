//! Staging area for slices awaiting container seal.
//!
//! A slice cannot be built until its container's compression header exists,
//! and the compression header cannot be built until every record that will
//! live in the container has been seen. Staged slices hold converted records
//! in admission order until the container is sealed.

use crate::errors::{CramError, Result};
use crate::record::CramRecord;
use crate::reference_context::ReferenceContext;

/// An in-flight slice: an ordered run of records under one reference context,
/// plus the global record counter at which the run began.
#[derive(Debug, Clone)]
pub struct StagedSlice {
    reference_context: ReferenceContext,
    records: Vec<CramRecord>,
    global_record_counter: u64,
}

impl StagedSlice {
    /// The context shared by the staged records.
    #[must_use]
    pub fn reference_context(&self) -> ReferenceContext {
        self.reference_context
    }

    /// The staged records, in admission order.
    #[must_use]
    pub fn records(&self) -> &[CramRecord] {
        &self.records
    }

    /// The global record counter at which this slice began.
    #[must_use]
    pub fn global_record_counter(&self) -> u64 {
        self.global_record_counter
    }
}

/// Holds staged slices for the current container.
#[derive(Debug, Default)]
pub struct SliceStager {
    staged: Vec<StagedSlice>,
}

impl SliceStager {
    /// Creates an empty stager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a staged slice.
    ///
    /// # Errors
    ///
    /// * [`CramError::State`] when the context is `Uninitialized`.
    /// * [`CramError::Structural`] when staging would mix multi-reference and
    ///   single-reference slices in one container; a multi-reference slice
    ///   must be a container's only slice.
    pub fn stage(
        &mut self,
        reference_context: ReferenceContext,
        records: Vec<CramRecord>,
        global_record_counter: u64,
    ) -> Result<()> {
        if reference_context == ReferenceContext::Uninitialized {
            return Err(CramError::state("cannot stage a slice with an uninitialized context"));
        }
        if !self.staged.is_empty()
            && (reference_context.is_multiple_reference()
                || self.staged[0].reference_context().is_multiple_reference())
        {
            return Err(CramError::structural(
                "a multi-reference slice cannot share a container with other slices",
            ));
        }

        self.staged.push(StagedSlice { reference_context, records, global_record_counter });
        Ok(())
    }

    /// Number of staged slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// True when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// The staged slices, in staging order.
    #[must_use]
    pub fn staged(&self) -> &[StagedSlice] {
        &self.staged
    }

    /// A flat view of every staged record, preserving per-slice order and
    /// concatenation order.
    ///
    /// The compression-header builder must be shown this view: it has to see
    /// every record that will live in the container.
    pub fn all_records(&self) -> impl Iterator<Item = &CramRecord> {
        self.staged.iter().flat_map(|entry| entry.records.iter())
    }

    /// Takes the staged slices, leaving the stager empty.
    #[must_use]
    pub fn take_staged(&mut self) -> Vec<StagedSlice> {
        std::mem::take(&mut self.staged)
    }
}
