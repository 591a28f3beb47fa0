//! Reference sequence access for the slice writer.
//!
//! The writer only needs two things from a reference provider: the bases of a
//! given sequence while records are converted, and an MD5 of the bases backing
//! the current slice at seal time. Fetches are synchronous; a provider may
//! block on I/O but must not yield control internally.

use crate::errors::{CramError, Result};
use crate::record::NO_REFERENCE_INDEX;
use md5::{Digest, Md5};

/// A provider of reference sequence bases, keyed by reference index.
pub trait ReferenceSource {
    /// Returns the bases of the given reference sequence, or `None` when the
    /// provider has no sequence at that index.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching the sequence fails.
    fn bases(&mut self, reference_index: i32) -> Result<Option<&[u8]>>;
}

/// A [`ReferenceSource`] over sequences held in memory. Primarily for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceSource {
    sequences: Vec<Vec<u8>>,
}

impl InMemoryReferenceSource {
    /// Creates a source over the given sequences, indexed by position.
    #[must_use]
    pub fn new(sequences: Vec<Vec<u8>>) -> Self {
        Self { sequences }
    }
}

impl ReferenceSource for InMemoryReferenceSource {
    fn bases(&mut self, reference_index: i32) -> Result<Option<&[u8]>> {
        if reference_index < 0 {
            return Ok(None);
        }
        Ok(self.sequences.get(reference_index as usize).map(Vec::as_slice))
    }
}

/// Tracks the reference sequence the writer is currently working against.
///
/// The region is advanced as records are converted and snapshotted (as an
/// MD5 of the current bases) into each single-reference slice at seal time.
#[derive(Debug)]
pub struct ReferenceRegion<S> {
    source: S,
    current_index: i32,
}

impl<S: ReferenceSource> ReferenceRegion<S> {
    /// Creates a region with no current reference.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source, current_index: NO_REFERENCE_INDEX }
    }

    /// The index of the current reference (`-1` when none).
    #[must_use]
    pub fn current_index(&self) -> i32 {
        self.current_index
    }

    /// Moves the region to `reference_index`. A negative index clears it.
    ///
    /// # Errors
    ///
    /// Returns a structural error when the provider has no sequence at a
    /// non-negative index, or passes through a provider failure.
    pub fn set_current(&mut self, reference_index: i32) -> Result<()> {
        if reference_index >= 0 && self.source.bases(reference_index)?.is_none() {
            return Err(CramError::structural(format!(
                "reference sequence {reference_index} not available from the reference source"
            )));
        }
        self.current_index = if reference_index < 0 { NO_REFERENCE_INDEX } else { reference_index };
        Ok(())
    }

    /// The bases of the current reference (empty when none is set).
    ///
    /// # Errors
    ///
    /// Passes through a provider failure.
    pub fn current_bases(&mut self) -> Result<&[u8]> {
        if self.current_index < 0 {
            return Ok(&[]);
        }
        Ok(self.source.bases(self.current_index)?.unwrap_or(&[]))
    }

    /// MD5 of the current reference bases.
    ///
    /// # Errors
    ///
    /// Passes through a provider failure.
    pub fn current_md5(&mut self) -> Result<[u8; 16]> {
        let bases = self.current_bases()?;
        Ok(Md5::digest(bases).into())
    }
}
