//! Within-slice mate resolution.
//!
//! Paired records whose mates land in the same slice can be encoded as
//! compact intra-slice references; everything else is marked detached and
//! stores its mate info verbatim. Resolution keys on read name with two
//! lookup tables: one for primary candidates and one for secondary-alignment
//! candidates. A secondary record searches the primary table and a primary
//! record searches the secondary table, accommodating supplementary and
//! secondary pairing.
//!
//! First-hit name matching can mispair when several alignments share a read
//! name, so each candidate is validated against the searching record's own
//! declaration of its mate's properties before a link is made.
//!
//! TODO: the two-table scheme holds at most one primary and one non-primary
//! candidate per name in flight; coordinate-sorted input does not guarantee
//! secondaries arrive in order, so a name with several interleaved
//! secondaries can still force later records to detached.

use crate::record::CramRecord;
use ahash::AHashMap;
use bstr::BString;

/// Links each paired record to its in-slice mate where possible, and marks
/// the rest detached.
///
/// Non-coordinate-sorted input skips resolution entirely: every record is
/// detached, since nothing about record order can be relied on.
pub fn resolve_mates_for_slice(records: &mut [CramRecord], coordinate_sorted: bool) {
    if !coordinate_sorted {
        for record in records.iter_mut() {
            record.set_detached(true);
        }
        return;
    }

    let mut primary_candidates: AHashMap<BString, usize> = AHashMap::new();
    let mut secondary_candidates: AHashMap<BString, usize> = AHashMap::new();

    for i in 0..records.len() {
        if !records[i].is_paired() {
            continue;
        }

        let non_primary = records[i].is_secondary() || records[i].is_supplementary();
        let (opposite_table, own_table) = if non_primary {
            (&primary_candidates, &secondary_candidates)
        } else {
            (&secondary_candidates, &primary_candidates)
        };

        // A non-primary record pairs against the primary candidates and vice
        // versa; when the crossed table yields nothing acceptable, fall back
        // to the record's own class.
        let name = records[i].read_name();
        let mate = [opposite_table, own_table].into_iter().find_map(|table| {
            table
                .get(name)
                .copied()
                .filter(|&first| records[first].next_mate_index().is_none())
                .filter(|&first| accept_mate(&records[first], &records[i]))
        });

        match mate {
            Some(first) => {
                records[first].attach_to_mate(i);
                records[i].set_previous_mate(first);
            }
            None => {
                let own_table = if non_primary {
                    &mut secondary_candidates
                } else {
                    &mut primary_candidates
                };
                own_table.insert(records[i].read_name().clone(), i);
            }
        }
    }

    update_detached_state(records);
}

/// Validates `candidate` against `first`'s declaration of its mate.
///
/// Choosing the first record that matches by name might not pick the right
/// fragment; the searching record's own mate hints are the tie-breaker.
fn accept_mate(first: &CramRecord, candidate: &CramRecord) -> bool {
    // first declares its mate on the reverse strand, but candidate is not
    if first.is_mate_reverse() && !candidate.is_reverse() {
        return false;
    }

    // first declares its mate unmapped, but candidate is mapped
    if first.is_mate_unmapped() && !candidate.is_unmapped() {
        return false;
    }

    candidate.alignment_start() == first.mate_alignment_start()
}

/// Marks unpredictable records as detached.
///
/// A paired record with no link in either direction is detached outright. A
/// linked pair whose upstream record's mate hints (strand, mapping, position,
/// reference) disagree with the downstream record's actual state is severed
/// and both halves detached.
fn update_detached_state(records: &mut [CramRecord]) {
    for i in 0..records.len() {
        if !records[i].is_paired() {
            continue;
        }

        match records[i].next_mate_index() {
            None => {
                if records[i].previous_mate_index().is_none() {
                    records[i].set_detached(true);
                }
            }
            Some(next) => {
                let consistent = records[i].is_mate_unmapped() == records[next].is_unmapped()
                    && records[i].is_mate_reverse() == records[next].is_reverse()
                    && records[i].mate_alignment_start() == records[next].alignment_start()
                    && records[i].mate_reference_index() == records[next].reference_index();

                if !consistent {
                    records[i].clear_mate_links();
                    records[i].set_detached(true);
                    records[next].clear_mate_links();
                    records[next].set_detached(true);
                }
            }
        }
    }
}
