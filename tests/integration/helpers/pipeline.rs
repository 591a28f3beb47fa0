//! A minimal container-writer loop for driving the slice factory in tests.
//!
//! The production container writer lives outside this library; tests drive
//! the factory the same way it does: ask the partitioner before each record,
//! stage the accumulated run when a flush is directed, and seal the container
//! once enough slices are staged.

use anyhow::Result;
use fgcram_lib::compression_header::CompressionHeader;
use fgcram_lib::encoding_strategy::EncodingStrategy;
use fgcram_lib::factory::SliceFactory;
use fgcram_lib::partitioner::SliceAssignment;
use fgcram_lib::reference::InMemoryReferenceSource;
use fgcram_lib::reference_context::ReferenceContext;
use fgcram_lib::slice::Slice;
use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;
use std::sync::Arc;

/// Sixteen-base dummy references, enough for any test coordinate.
pub fn test_reference_source(count: usize) -> InMemoryReferenceSource {
    InMemoryReferenceSource::new(vec![b"ACGTACGTACGTACGT".to_vec(); count])
}

/// Creates a factory over `count` in-memory references.
pub fn test_factory(
    strategy: EncodingStrategy,
    file_header: &Header,
    reference_count: usize,
) -> SliceFactory<InMemoryReferenceSource> {
    SliceFactory::new(strategy, test_reference_source(reference_count), file_header, 0)
}

/// Feeds `records` through the factory, sealing containers as the
/// partitioner directs. Returns the sealed containers in order; a trailing
/// partial container is sealed at end of input.
pub fn write_all_records(
    factory: &mut SliceFactory<InMemoryReferenceSource>,
    records: &[RecordBuf],
) -> Result<Vec<Vec<Slice>>> {
    let mut containers = Vec::new();
    let mut pending: Vec<RecordBuf> = Vec::new();
    let mut current = ReferenceContext::Uninitialized;
    let mut container_offset = 0;

    for record in records {
        let next_reference_index = record.reference_sequence_id().map_or(-1, |id| id as i32);

        match factory.should_emit_slice(current, next_reference_index, pending.len())? {
            SliceAssignment::Accumulate(context) => current = context,
            SliceAssignment::FlushContainer => {
                factory.create_new_slice_entry(current, &pending)?;
                pending.clear();

                if factory.number_of_slice_entries()
                    >= factory.encoding_strategy().slices_per_container
                {
                    containers.push(seal(factory, &mut container_offset)?);
                }

                // adopt the next record's context in the fresh accumulation
                current = match factory.should_emit_slice(
                    ReferenceContext::Uninitialized,
                    next_reference_index,
                    0,
                )? {
                    SliceAssignment::Accumulate(context) => context,
                    SliceAssignment::FlushContainer => unreachable!(
                        "an uninitialized context with no records never directs a flush"
                    ),
                };
            }
        }

        pending.push(record.clone());
    }

    if !pending.is_empty() {
        factory.create_new_slice_entry(current, &pending)?;
    }
    if factory.number_of_slice_entries() > 0 {
        containers.push(seal(factory, &mut container_offset)?);
    }

    Ok(containers)
}

fn seal(
    factory: &mut SliceFactory<InMemoryReferenceSource>,
    container_offset: &mut i64,
) -> Result<Vec<Slice>> {
    let mut slices =
        factory.seal_container(Arc::new(CompressionHeader::default()), *container_offset)?;
    // Stand-in byte layout: slices placed 512 bytes apart, containers 4K apart
    for (i, slice) in slices.iter_mut().enumerate() {
        slice.set_container_position(i as i64 * 512, i as i32);
    }
    *container_offset += 4_096;
    Ok(slices)
}
