//! Integration tests for the fgcram library.
//!
//! These tests validate end-to-end workflows that span multiple modules:
//! partitioning, mate resolution, slice sealing, header serialization, and
//! index-entry assembly.

mod helpers;
mod test_bai_assembly;
mod test_header_roundtrip;
mod test_slice_pipeline;
