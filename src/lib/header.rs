//! SAM header lookups used by the slicing pipeline.
//!
//! The read-group table is built once from the file header and read-only
//! thereafter; sort order is consulted once when the writer is constructed.

use ahash::AHashMap;
use bstr::BString;
use noodles::sam::Header;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::header::record::value::map::header::tag as header_tag;

/// Read group id returned for records with no (or an unknown) `RG` tag.
pub const NO_READ_GROUP_ID: i32 = -1;

/// Maps read-group names to their ordinal position in the header.
#[derive(Debug, Clone, Default)]
pub struct ReadGroupIndex {
    ids: AHashMap<BString, i32>,
}

impl ReadGroupIndex {
    /// Builds the table from the `@RG` lines of a header, in header order.
    #[must_use]
    pub fn from_header(header: &Header) -> Self {
        let mut ids = AHashMap::with_capacity(header.read_groups().len());
        for (ordinal, (id, _)) in header.read_groups().iter().enumerate() {
            ids.insert(BString::from(id.as_slice()), ordinal as i32);
        }
        Self { ids }
    }

    /// Number of read groups in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the header declared no read groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolves a record's `RG` tag to its header ordinal.
    ///
    /// Returns [`NO_READ_GROUP_ID`] when the record has no `RG` tag or names a
    /// read group the header does not declare (the latter is logged).
    #[must_use]
    pub fn resolve(&self, record: &RecordBuf) -> i32 {
        match record.data().get(&Tag::READ_GROUP) {
            Some(Value::String(name)) => match self.ids.get(name) {
                Some(id) => *id,
                None => {
                    log::warn!("record names unknown read group {name:?}");
                    NO_READ_GROUP_ID
                }
            },
            _ => NO_READ_GROUP_ID,
        }
    }
}

/// True when the header's `@HD SO` field declares coordinate sort order.
#[must_use]
pub fn is_coordinate_sorted(header: &Header) -> bool {
    header
        .header()
        .and_then(|hd| hd.other_fields().get(&header_tag::SORT_ORDER))
        .is_some_and(|so| so.as_slice() == b"coordinate")
}
