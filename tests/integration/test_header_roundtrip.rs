//! Slice header serialization round trips, including on-disk round trips.

use crate::helpers::{coordinate_header, mapped_run, test_factory, unmapped_run, write_all_records};
use bstr::BString;
use fgcram_lib::encoding_strategy::EncodingStrategy;
use fgcram_lib::slice_io;
use fgcram_lib::slice_tags::{SliceTag, SliceTags, TagArray, TagValue, ValidationStringency};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::Arc;

fn strategy() -> EncodingStrategy {
    EncodingStrategy::default()
        .with_records_per_slice(10)
        .with_min_single_reference_slice_size(2)
}

fn chained_tags() -> SliceTags {
    let mut tags = SliceTags::new();
    tags.push(SliceTag::new(*b"BD", TagValue::String(BString::from("base-digest"))));
    tags.push(SliceTag::new(*b"SD", TagValue::String(BString::from("score-digest"))));
    tags.push(SliceTag::new(*b"xs", TagValue::Array(TagArray::Int32(vec![-1, 0, 1]))));
    tags
}

#[test]
fn test_sealed_slice_survives_file_round_trip() {
    let mut factory = test_factory(strategy(), &coordinate_header(), 1);
    let major = factory.encoding_strategy().major_version;
    let containers =
        write_all_records(&mut factory, &mapped_run("q", 0, 1_000, 5)).unwrap();
    let mut slice = containers[0][0].clone();
    slice.set_tags(chained_tags());

    // factory-sealed single-reference slices carry a reference MD5 snapshot
    assert!(slice.reference_md5().is_some());

    let mut file = tempfile::tempfile().unwrap();
    slice_io::write(major, &slice, &mut file).unwrap();
    file.flush().unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let decoded = slice_io::read(
        major,
        Arc::clone(slice.compression_header()),
        ValidationStringency::Strict,
        &mut file,
    )
    .unwrap();

    assert_eq!(decoded, slice);
    assert_eq!(decoded.tags().tags(), slice.tags().tags());
    assert_eq!(decoded.global_record_counter(), slice.global_record_counter());
}

#[test]
fn test_unmapped_slice_round_trip() {
    let mut factory = test_factory(strategy(), &coordinate_header(), 1);
    let containers = write_all_records(&mut factory, &unmapped_run("u", 4)).unwrap();
    let slice = &containers[0][0];

    let mut buf = Vec::new();
    slice_io::write(3, slice, &mut buf).unwrap();
    let decoded = slice_io::read(
        3,
        Arc::clone(slice.compression_header()),
        ValidationStringency::Strict,
        &mut buf.as_slice(),
    )
    .unwrap();

    assert_eq!(&decoded, slice);
    assert_eq!(decoded.reference_context().serializable_id(), -1);
    assert_eq!(decoded.alignment_start(), 0);
    assert_eq!(decoded.reference_md5(), None);
    assert_eq!(decoded.embedded_reference_content_id(), -1);
}

#[test]
fn test_consecutive_slices_in_one_stream() {
    let mut factory = test_factory(
        strategy().with_records_per_slice(2).with_slices_per_container(2),
        &coordinate_header(),
        1,
    );
    let containers = write_all_records(&mut factory, &mapped_run("q", 0, 50, 4)).unwrap();
    assert_eq!(containers[0].len(), 2);

    let mut stream = Vec::new();
    for slice in &containers[0] {
        slice_io::write(3, slice, &mut stream).unwrap();
    }

    let mut reader = stream.as_slice();
    for expected in &containers[0] {
        let decoded = slice_io::read(
            3,
            Arc::clone(expected.compression_header()),
            ValidationStringency::Strict,
            &mut reader,
        )
        .unwrap();
        assert_eq!(&decoded, expected);
    }
    assert!(reader.is_empty());
}

#[test]
fn test_write_to_named_path() {
    let mut factory = test_factory(strategy(), &coordinate_header(), 1);
    let containers = write_all_records(&mut factory, &mapped_run("q", 0, 10, 3)).unwrap();
    let slice = &containers[0][0];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slice_header.bin");
    {
        let mut out = File::create(&path).unwrap();
        slice_io::write(3, slice, &mut out).unwrap();
    }

    let mut bytes = Vec::new();
    File::open(&path).unwrap().read_to_end(&mut bytes).unwrap();
    let decoded = slice_io::read(
        3,
        Arc::clone(slice.compression_header()),
        ValidationStringency::Strict,
        &mut bytes.as_slice(),
    )
    .unwrap();
    assert_eq!(&decoded, slice);
}
