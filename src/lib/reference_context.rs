//! Reference context for slices and index entries.
//!
//! A slice's records either all align to one reference sequence, span several
//! references (possibly including unmapped reads), or are all unmapped and
//! unplaced. The context is a small closed sum over those cases plus an
//! `Uninitialized` state used by the partitioner before any record has been
//! admitted.
//!
//! On the wire the context is a single ITF8 integer: the reference sequence id
//! for single-reference slices, `-2` for multi-reference slices, and `-1` for
//! unmapped-unplaced slices. `Uninitialized` shares the `-1` pattern
//! internally but is never serialized.

use crate::errors::{CramError, Result};
use std::fmt;

/// Serialized id for a multi-reference slice.
pub const MULTIPLE_REFERENCE_ID: i32 = -2;

/// Serialized id for an unmapped-unplaced slice.
pub const UNMAPPED_UNPLACED_ID: i32 = -1;

/// The reference context of a slice, container, or index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceContext {
    /// All records align to the single reference sequence with this id (>= 0).
    SingleReference(i32),
    /// Records span more than one reference sequence, possibly including
    /// unmapped reads.
    MultipleReference,
    /// Unmapped, unplaced records only.
    UnmappedUnplaced,
    /// No records have been admitted yet. Never serialized.
    Uninitialized,
}

impl ReferenceContext {
    /// Builds a context from a serialized id: `-2` multi-reference, `-1`
    /// unmapped-unplaced, non-negative single-reference.
    ///
    /// # Errors
    ///
    /// Returns a structural error for ids below `-2`.
    pub fn from_serializable_id(id: i32) -> Result<Self> {
        match id {
            MULTIPLE_REFERENCE_ID => Ok(ReferenceContext::MultipleReference),
            UNMAPPED_UNPLACED_ID => Ok(ReferenceContext::UnmappedUnplaced),
            id if id >= 0 => Ok(ReferenceContext::SingleReference(id)),
            id => Err(CramError::structural(format!("invalid reference context id: {id}"))),
        }
    }

    /// The id written to the wire for this context.
    ///
    /// `Uninitialized` maps to the unmapped sentinel; callers must not
    /// serialize an uninitialized context.
    #[must_use]
    pub fn serializable_id(&self) -> i32 {
        match self {
            ReferenceContext::SingleReference(id) => *id,
            ReferenceContext::MultipleReference => MULTIPLE_REFERENCE_ID,
            ReferenceContext::UnmappedUnplaced | ReferenceContext::Uninitialized => {
                UNMAPPED_UNPLACED_ID
            }
        }
    }

    /// The reference sequence id, if this is a single-reference context.
    #[must_use]
    pub fn reference_sequence_id(&self) -> Option<i32> {
        match self {
            ReferenceContext::SingleReference(id) => Some(*id),
            _ => None,
        }
    }

    /// True for a single-reference context.
    #[must_use]
    pub fn is_single_reference(&self) -> bool {
        matches!(self, ReferenceContext::SingleReference(_))
    }

    /// True for the multi-reference context.
    #[must_use]
    pub fn is_multiple_reference(&self) -> bool {
        matches!(self, ReferenceContext::MultipleReference)
    }

    /// True for the unmapped-unplaced context.
    #[must_use]
    pub fn is_unmapped_unplaced(&self) -> bool {
        matches!(self, ReferenceContext::UnmappedUnplaced)
    }
}

impl fmt::Display for ReferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceContext::SingleReference(id) => write!(f, "SingleReference({id})"),
            ReferenceContext::MultipleReference => write!(f, "MultipleReference"),
            ReferenceContext::UnmappedUnplaced => write!(f, "UnmappedUnplaced"),
            ReferenceContext::Uninitialized => write!(f, "Uninitialized"),
        }
    }
}
