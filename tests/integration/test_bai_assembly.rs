//! Index-entry assembly across sealed containers.

use crate::helpers::{
    coordinate_header, mapped_run, queryname_header, test_factory, unmapped_run, write_all_records,
};
use fgcram_lib::bai_entry::BaiEntry;
use fgcram_lib::encoding_strategy::EncodingStrategy;
use fgcram_lib::reference_context::ReferenceContext;

fn collect_entries(containers: &[Vec<fgcram_lib::slice::Slice>]) -> Vec<BaiEntry> {
    containers
        .iter()
        .flat_map(|slices| slices.iter())
        .flat_map(|slice| slice.bai_entries().unwrap())
        .collect()
}

#[test]
fn test_no_entry_carries_multi_reference_context() {
    let strategy = EncodingStrategy::default()
        .with_records_per_slice(8)
        .with_min_single_reference_slice_size(4);
    let mut factory = test_factory(strategy, &coordinate_header(), 3);

    // a short run per reference forces multi-reference promotion
    let mut records = mapped_run("a", 0, 100, 2);
    records.extend(mapped_run("b", 1, 100, 2));
    records.extend(mapped_run("c", 2, 100, 2));

    let containers = write_all_records(&mut factory, &records).unwrap();
    assert!(
        containers
            .iter()
            .flatten()
            .any(|s| s.reference_context() == ReferenceContext::MultipleReference)
    );

    let entries = collect_entries(&containers);
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| !e.reference_context().is_multiple_reference()));
}

#[test]
fn test_multi_reference_decomposition_counts() {
    let strategy = EncodingStrategy::default()
        .with_records_per_slice(16)
        .with_min_single_reference_slice_size(8);
    let mut factory = test_factory(strategy, &queryname_header(), 2);

    // unsorted input lets unmapped and mapped share a multi-reference slice
    let mut records = unmapped_run("u", 3);
    records.extend(mapped_run("a", 0, 100, 2));
    records.extend(mapped_run("b", 1, 500, 1));

    let containers = write_all_records(&mut factory, &records).unwrap();
    assert_eq!(containers.len(), 1);
    let slice = &containers[0][0];
    assert_eq!(slice.reference_context(), ReferenceContext::MultipleReference);

    let entries = slice.bai_entries().unwrap();
    assert_eq!(entries.len(), 3);

    // ascending reference id first, unmapped-unplaced last
    assert_eq!(entries[0].reference_context(), ReferenceContext::SingleReference(0));
    assert_eq!(entries[0].alignment_span().mapped_count(), 2);
    assert_eq!(entries[1].reference_context(), ReferenceContext::SingleReference(1));
    assert_eq!(entries[1].alignment_span().mapped_count(), 1);
    assert!(entries[2].reference_context().is_unmapped_unplaced());
    assert_eq!(entries[2].alignment_span().unmapped_unplaced_count(), 3);

    let total: u64 = entries.iter().map(|e| e.alignment_span().total_count()).sum();
    assert_eq!(total, 6);
}

#[test]
fn test_entries_sort_with_unmapped_last() {
    let strategy = EncodingStrategy::default()
        .with_records_per_slice(4)
        .with_min_single_reference_slice_size(4);
    let mut factory = test_factory(strategy, &coordinate_header(), 2);

    let mut records = mapped_run("a", 0, 100, 4);
    records.extend(mapped_run("b", 1, 100, 4));
    records.extend(unmapped_run("u", 4));

    let containers = write_all_records(&mut factory, &records).unwrap();
    let mut entries = collect_entries(&containers);
    entries.reverse();
    entries.sort();

    let contexts: Vec<_> = entries.iter().map(BaiEntry::reference_context).collect();
    assert_eq!(
        contexts,
        [
            ReferenceContext::SingleReference(0),
            ReferenceContext::SingleReference(1),
            ReferenceContext::UnmappedUnplaced,
        ]
    );

    // total order: reflexive on equal keys
    for entry in &entries {
        assert_eq!(entry.cmp(entry), std::cmp::Ordering::Equal);
    }
}

#[test]
fn test_crai_entries_follow_decomposition() {
    let strategy = EncodingStrategy::default()
        .with_records_per_slice(8)
        .with_min_single_reference_slice_size(4);
    let mut factory = test_factory(strategy, &coordinate_header(), 2);

    let mut records = mapped_run("a", 0, 100, 2);
    records.extend(mapped_run("b", 1, 100, 2));

    let containers = write_all_records(&mut factory, &records).unwrap();
    let slice = &containers[0][0];
    let crai = slice.crai_entries(2_048).unwrap();

    assert_eq!(crai.len(), 2);
    assert_eq!(crai[0].sequence_id(), 0);
    assert_eq!(crai[1].sequence_id(), 1);
    assert!(crai.iter().all(|entry| entry.slice_byte_size() == 2_048));
    assert!(crai.iter().all(|entry| entry.to_string().split('\t').count() == 6));
}
