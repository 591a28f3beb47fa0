//! Utilities for generating test alignment records programmatically.

use bstr::BString;
use noodles::core::Position;
use noodles::sam::Header;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map;
use noodles::sam::header::record::value::map::header::tag as header_tag;

/// Default read length used by the generators.
pub const DEFAULT_READ_LENGTH: usize = 50;

/// Builds a SAM header declaring coordinate sort order.
pub fn coordinate_header() -> Header {
    header_with_sort_order("coordinate")
}

/// Builds a SAM header declaring queryname sort order.
pub fn queryname_header() -> Header {
    header_with_sort_order("queryname")
}

fn header_with_sort_order(sort_order: &str) -> Header {
    Header::builder()
        .set_header(
            Map::<map::Header>::builder()
                .insert(header_tag::SORT_ORDER, BString::from(sort_order))
                .build()
                .expect("valid header"),
        )
        .build()
}

/// Builder for a single test record.
#[derive(Debug)]
pub struct RecordSpec {
    name: String,
    reference_id: Option<usize>,
    start: Option<usize>,
    flags: Flags,
    mate_reference_id: Option<usize>,
    mate_start: Option<usize>,
    read_length: Option<usize>,
}

impl RecordSpec {
    /// Starts a record with the given name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reference_id: None,
            start: None,
            flags: Flags::empty(),
            mate_reference_id: None,
            mate_start: None,
            read_length: None,
        }
    }

    /// Maps the record at `reference_id`:`start`.
    #[must_use]
    pub fn mapped(mut self, reference_id: usize, start: usize) -> Self {
        self.reference_id = Some(reference_id);
        self.start = Some(start);
        self
    }

    /// Marks the record unmapped and unplaced.
    #[must_use]
    pub fn unmapped(mut self) -> Self {
        self.flags |= Flags::UNMAPPED;
        self.reference_id = None;
        self.start = None;
        self
    }

    /// Marks the record paired, declaring its mate's position.
    #[must_use]
    pub fn paired_with_mate(mut self, mate_reference_id: usize, mate_start: usize) -> Self {
        self.flags |= Flags::SEGMENTED;
        self.mate_reference_id = Some(mate_reference_id);
        self.mate_start = Some(mate_start);
        self
    }

    /// Adds extra flags (supplementary, secondary, strand bits, ...).
    #[must_use]
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags |= flags;
        self
    }

    /// Overrides the read length.
    #[must_use]
    pub fn read_length(mut self, read_length: usize) -> Self {
        self.read_length = Some(read_length);
        self
    }

    /// Builds the record.
    #[must_use]
    pub fn build(self) -> RecordBuf {
        let mut record = RecordBuf::default();
        *record.name_mut() = Some(BString::from(self.name));
        *record.flags_mut() = self.flags;
        if let Some(reference_id) = self.reference_id {
            *record.reference_sequence_id_mut() = Some(reference_id);
        }
        if let Some(start) = self.start {
            *record.alignment_start_mut() = Some(Position::try_from(start).unwrap());
        }
        if let Some(mate_reference_id) = self.mate_reference_id {
            *record.mate_reference_sequence_id_mut() = Some(mate_reference_id);
        }
        if let Some(mate_start) = self.mate_start {
            *record.mate_alignment_start_mut() = Some(Position::try_from(mate_start).unwrap());
        }
        let read_length = self.read_length.unwrap_or(DEFAULT_READ_LENGTH);
        *record.sequence_mut() = vec![b'A'; read_length].into();
        record
    }
}

/// Generates `count` mapped records on one reference, spaced 10 bases apart.
pub fn mapped_run(prefix: &str, reference_id: usize, start: usize, count: usize) -> Vec<RecordBuf> {
    (0..count)
        .map(|i| {
            RecordSpec::named(&format!("{prefix}{i}"))
                .mapped(reference_id, start + i * 10)
                .build()
        })
        .collect()
}

/// Generates `count` unmapped, unplaced records.
pub fn unmapped_run(prefix: &str, count: usize) -> Vec<RecordBuf> {
    (0..count).map(|i| RecordSpec::named(&format!("{prefix}{i}")).unmapped().build()).collect()
}
