//! End-to-end partitioning and mate-resolution scenarios.

use crate::helpers::{
    coordinate_header, mapped_run, queryname_header, test_factory, unmapped_run,
    write_all_records, RecordSpec,
};
use fgcram_lib::encoding_strategy::EncodingStrategy;
use fgcram_lib::errors::CramError;
use fgcram_lib::partitioner::SliceAssignment;
use fgcram_lib::reference_context::ReferenceContext;
use noodles::sam::alignment::record::Flags;

fn small_strategy() -> EncodingStrategy {
    EncodingStrategy::default()
        .with_records_per_slice(3)
        .with_min_single_reference_slice_size(2)
}

#[test]
fn test_single_reference_fill() {
    // Four records on one reference with a three-record slice limit: one full
    // slice is emitted, the trailing record lands in a second container.
    let mut factory = test_factory(small_strategy(), &coordinate_header(), 2);
    let records = mapped_run("q", 0, 100, 4);

    let containers = write_all_records(&mut factory, &records).unwrap();

    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].len(), 1);
    assert_eq!(containers[0][0].nof_records(), 3);
    assert_eq!(
        containers[0][0].reference_context(),
        ReferenceContext::SingleReference(0)
    );
    assert_eq!(containers[1].len(), 1);
    assert_eq!(containers[1][0].nof_records(), 1);
}

#[test]
fn test_reference_transition_above_threshold() {
    // Three records at reference 0 then one at reference 1: flush after the
    // run, the new container begins at reference 1.
    let mut factory = test_factory(small_strategy(), &coordinate_header(), 2);
    let mut records = mapped_run("a", 0, 100, 3);
    records.extend(mapped_run("b", 1, 100, 1));

    let containers = write_all_records(&mut factory, &records).unwrap();

    assert_eq!(containers.len(), 2);
    assert_eq!(
        containers[0][0].reference_context(),
        ReferenceContext::SingleReference(0)
    );
    assert_eq!(containers[0][0].nof_records(), 3);
    assert_eq!(
        containers[1][0].reference_context(),
        ReferenceContext::SingleReference(1)
    );
}

#[test]
fn test_reference_transition_below_threshold_promotes() {
    // One record at each of two references, below the threshold with no
    // staged sibling: the slice is promoted to multi-reference and keeps
    // accumulating.
    let mut factory = test_factory(small_strategy(), &coordinate_header(), 2);
    let mut records = mapped_run("a", 0, 100, 1);
    records.extend(mapped_run("b", 1, 100, 1));

    let containers = write_all_records(&mut factory, &records).unwrap();

    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].len(), 1);
    assert_eq!(
        containers[0][0].reference_context(),
        ReferenceContext::MultipleReference
    );
    assert_eq!(containers[0][0].nof_records(), 2);
}

#[test]
fn test_reference_transition_with_staged_sibling_flushes() {
    // With a slice already staged in the open container, the same
    // below-threshold transition flushes instead of promoting, so
    // single-reference and multi-reference slices never share a container.
    let strategy = small_strategy().with_slices_per_container(2);
    let mut factory = test_factory(strategy, &coordinate_header(), 2);

    let mut records = mapped_run("a", 0, 100, 3); // fills one slice
    records.extend(mapped_run("b", 0, 200, 1)); // second slice, below threshold
    records.extend(mapped_run("c", 1, 100, 1)); // transition

    let containers = write_all_records(&mut factory, &records).unwrap();

    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].len(), 2);
    for slice in &containers[0] {
        assert_eq!(slice.reference_context(), ReferenceContext::SingleReference(0));
    }
    assert_eq!(containers[0][1].nof_records(), 1);
    assert_eq!(
        containers[1][0].reference_context(),
        ReferenceContext::SingleReference(1)
    );
}

#[test]
fn test_coordinate_sorted_mapped_after_unmapped_fails() {
    let mut factory = test_factory(small_strategy(), &coordinate_header(), 2);
    let mut records = unmapped_run("u", 1);
    records.extend(mapped_run("m", 0, 100, 1));

    let err = write_all_records(&mut factory, &records).unwrap_err();
    let cram_err = err.downcast_ref::<CramError>().expect("typed CRAM error");
    assert!(matches!(cram_err, CramError::Policy { .. }));
}

#[test]
fn test_unsorted_mapped_after_unmapped_promotes() {
    // The same transition on unsorted input folds the mapped record into a
    // multi-reference slice instead of failing.
    let mut factory = test_factory(small_strategy(), &queryname_header(), 2);
    let mut records = unmapped_run("u", 1);
    records.extend(mapped_run("m", 0, 100, 1));

    let containers = write_all_records(&mut factory, &records).unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(
        containers[0][0].reference_context(),
        ReferenceContext::MultipleReference
    );
}

#[test]
fn test_mate_resolution_with_supplementary() {
    // Three coordinate-sorted records sharing a read name: a primary at 7000
    // declaring its mate at 7173, a supplementary at 7172, and the true mate
    // at 7173. The supplementary must be rejected on alignment start and the
    // primaries linked.
    let mut factory = test_factory(small_strategy(), &coordinate_header(), 1);
    let records = vec![
        RecordSpec::named("q").mapped(0, 7_000).paired_with_mate(0, 7_173).build(),
        RecordSpec::named("q")
            .mapped(0, 7_172)
            .paired_with_mate(0, 7_000)
            .with_flags(Flags::SUPPLEMENTARY)
            .build(),
        RecordSpec::named("q").mapped(0, 7_173).paired_with_mate(0, 7_000).build(),
    ];

    factory
        .create_new_slice_entry(ReferenceContext::SingleReference(0), &records)
        .unwrap();

    let staged: Vec<_> = factory.all_records().collect();
    assert_eq!(staged[0].next_mate_index(), Some(2));
    assert!(!staged[0].is_detached());
    assert!(staged[1].is_detached());
    assert_eq!(staged[2].previous_mate_index(), Some(0));
    assert!(!staged[2].is_detached());

    // the linked mate's start matches the upstream record's declaration
    assert_eq!(staged[2].alignment_start(), staged[0].mate_alignment_start());
}

#[test]
fn test_unsorted_input_detaches_every_record() {
    let mut factory = test_factory(small_strategy(), &queryname_header(), 1);
    let records = vec![
        RecordSpec::named("q").mapped(0, 100).paired_with_mate(0, 150).build(),
        RecordSpec::named("q").mapped(0, 150).paired_with_mate(0, 100).build(),
    ];

    factory
        .create_new_slice_entry(ReferenceContext::SingleReference(0), &records)
        .unwrap();

    assert!(factory.all_records().all(|r| r.is_detached()));
}

#[test]
fn test_flush_is_never_directed_twice_without_records() {
    // Immediately after a flush the context is uninitialized with zero
    // accumulated records; the partitioner must adopt, never flush again.
    let factory = test_factory(small_strategy(), &coordinate_header(), 2);
    for next_reference_index in [-1, 0, 7] {
        let assignment = factory
            .should_emit_slice(ReferenceContext::Uninitialized, next_reference_index, 0)
            .unwrap();
        assert!(matches!(assignment, SliceAssignment::Accumulate(_)));
    }
}
