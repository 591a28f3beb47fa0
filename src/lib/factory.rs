//! Slice factory: the write-side pipeline façade.
//!
//! The factory owns the stateful pieces of the slicing pipeline: the
//! partitioning policy, the staging area, the reference region, the
//! read-group table (built once from the file header, read-only thereafter),
//! and the global record counter. The container-level writer drives it:
//! ask [`SliceFactory::should_emit_slice`] per record, stage accumulated
//! runs with [`SliceFactory::create_new_slice_entry`], and seal the container
//! with [`SliceFactory::seal_container`] once a flush is directed.
//!
//! A factory instance is owned by one caller; abandoning it discards any
//! staged but unsealed slices.

use crate::compression_header::CompressionHeader;
use crate::encoding_strategy::EncodingStrategy;
use crate::header::{self, ReadGroupIndex};
use crate::mate::resolve_mates_for_slice;
use crate::partitioner::{SliceAssignment, SlicePartitioner};
use crate::progress::ProgressTracker;
use crate::record::CramRecord;
use crate::reference::{ReferenceRegion, ReferenceSource};
use crate::reference_context::ReferenceContext;
use crate::slice::Slice;
use crate::stager::SliceStager;
use anyhow::{Context, Result};
use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;
use std::sync::Arc;

/// Builds staged slices from aligned records and seals them into containers.
pub struct SliceFactory<S> {
    encoding_strategy: EncodingStrategy,
    partitioner: SlicePartitioner,
    stager: SliceStager,
    reference_region: ReferenceRegion<S>,
    read_groups: ReadGroupIndex,
    coordinate_sorted: bool,
    global_record_counter: u64,
    progress: ProgressTracker,
}

impl<S: ReferenceSource> SliceFactory<S> {
    /// Creates a factory for one write stream.
    ///
    /// The sort order and read groups are taken from `file_header`;
    /// `global_record_counter` seeds the counter threaded through staged
    /// slices.
    #[must_use]
    pub fn new(
        encoding_strategy: EncodingStrategy,
        reference_source: S,
        file_header: &Header,
        global_record_counter: u64,
    ) -> Self {
        let coordinate_sorted = header::is_coordinate_sorted(file_header);
        let partitioner = SlicePartitioner::new(&encoding_strategy, coordinate_sorted);
        Self {
            encoding_strategy,
            partitioner,
            stager: SliceStager::new(),
            reference_region: ReferenceRegion::new(reference_source),
            read_groups: ReadGroupIndex::from_header(file_header),
            coordinate_sorted,
            global_record_counter,
            progress: ProgressTracker::new("Converted records"),
        }
    }

    /// The encoding strategy in effect.
    #[must_use]
    pub fn encoding_strategy(&self) -> &EncodingStrategy {
        &self.encoding_strategy
    }

    /// True when the input header declared coordinate sort order.
    #[must_use]
    pub fn coordinate_sorted(&self) -> bool {
        self.coordinate_sorted
    }

    /// The global record counter after all staged records.
    #[must_use]
    pub fn global_record_counter(&self) -> u64 {
        self.global_record_counter
    }

    /// Number of slices staged for the current container.
    #[must_use]
    pub fn number_of_slice_entries(&self) -> usize {
        self.stager.len()
    }

    /// A flat view of every staged record, for the compression-header
    /// builder (which must see all records that will live in the container).
    pub fn all_records(&self) -> impl Iterator<Item = &CramRecord> {
        self.stager.all_records()
    }

    /// Decides whether accumulated records should be flushed before the next
    /// record is admitted. See [`SlicePartitioner::should_emit_slice`].
    ///
    /// # Errors
    ///
    /// As [`SlicePartitioner::should_emit_slice`].
    pub fn should_emit_slice(
        &self,
        current: ReferenceContext,
        next_reference_index: i32,
        record_count: usize,
    ) -> crate::errors::Result<SliceAssignment> {
        self.partitioner.should_emit_slice(
            current,
            next_reference_index,
            record_count,
            self.stager.len(),
        )
    }

    /// Converts an accumulated run of records, resolves mates within it, and
    /// stages it as a slice for the current container.
    ///
    /// # Errors
    ///
    /// Returns an error when record conversion fails, the reference region
    /// cannot be advanced, or staging would violate container homogeneity.
    pub fn create_new_slice_entry(
        &mut self,
        reference_context: ReferenceContext,
        records: &[RecordBuf],
    ) -> Result<()> {
        let mut slice_records = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            // keep the reference region tracking the records being converted
            if let Some(id) = record.reference_sequence_id() {
                self.reference_region
                    .set_current(id as i32)
                    .context("advancing reference region during record conversion")?;
            }
            slice_records.push(
                CramRecord::from_alignment(record, index, &self.read_groups)
                    .context("converting record for slice staging")?,
            );
        }

        resolve_mates_for_slice(&mut slice_records, self.coordinate_sorted);
        self.progress.add(slice_records.len() as u64);

        self.stager
            .stage(reference_context, slice_records, self.global_record_counter)
            .context("staging slice for current container")?;
        self.global_record_counter += records.len() as u64;
        Ok(())
    }

    /// Seals the current container: builds a real slice from each staged
    /// entry, binds the compression header, snapshots the reference MD5 for
    /// single-reference slices, assigns landmark indices, and clears the
    /// stager.
    ///
    /// # Errors
    ///
    /// Returns an error when a reference snapshot fails or slice
    /// construction rejects a staged entry.
    pub fn seal_container(
        &mut self,
        compression_header: Arc<CompressionHeader>,
        container_start_byte_offset: i64,
    ) -> Result<Vec<Slice>> {
        let staged = self.stager.take_staged();
        let mut slices = Vec::with_capacity(staged.len());

        for (landmark_index, entry) in staged.iter().enumerate() {
            let reference_md5 = match entry.reference_context() {
                ReferenceContext::SingleReference(id) => {
                    self.reference_region
                        .set_current(id)
                        .context("positioning reference region for slice MD5")?;
                    Some(
                        self.reference_region
                            .current_md5()
                            .context("computing slice reference MD5")?,
                    )
                }
                _ => None,
            };

            let mut slice = Slice::from_staged_records(
                entry.reference_context(),
                entry.records(),
                entry.global_record_counter(),
                Arc::clone(&compression_header),
                container_start_byte_offset,
                reference_md5,
            )
            .context("sealing staged slice")?;
            slice.set_container_position(0, landmark_index as i32);
            slices.push(slice);
        }

        log::debug!(
            "sealed container at offset {container_start_byte_offset} with {} slice(s)",
            slices.len()
        );
        Ok(slices)
    }
}
