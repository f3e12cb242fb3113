//! Input normalisation and run-length extraction.
//!
//! Raw text is folded into outcomes, ties are filtered out for side
//! comparison, and the remaining sides are compressed into runs.

use crate::types::{Outcome, Run, Side};

/// Keep only characters that map to an outcome, in their original order.
///
/// Never fails: anything unrecognised is dropped.
pub fn normalize(raw: &str) -> Vec<Outcome> {
    raw.chars().filter_map(Outcome::from_char).collect()
}

/// Whether the last recorded outcome is a tie.
pub fn ends_in_tie(seq: &[Outcome]) -> bool {
    matches!(seq.last(), Some(Outcome::Tie))
}

/// The sequence with every tie removed.
pub fn strip_ties(seq: &[Outcome]) -> Vec<Side> {
    seq.iter().filter_map(Outcome::side).collect()
}

/// Compress a side sequence into maximal runs.
pub fn extract_runs(sides: &[Side]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for &side in sides {
        match runs.last_mut() {
            Some(run) if run.side == side => run.len += 1,
            _ => runs.push(Run { side, len: 1 }),
        }
    }
    runs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
