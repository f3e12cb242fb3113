//! Feature scorers.
//!
//! Each scorer is an independent pass over the tie-free side sequence or
//! its run list. Regularity rules each produce a partial [`VoteTally`];
//! the tallies are summed before the combiner sees them.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

use crate::types::{Advantage, Run, Side, VoteTally};

/// Margin at which the imbalance is considered too extreme to act on.
pub const EXTREME_MARGIN: usize = 20;
/// Trailing window inspected by the alternation detector.
pub const TELECO_WINDOW: usize = 4;
/// Run length treated as a long streak.
pub const LONG_STREAK: usize = 7;
/// Votes awarded by each regularity rule that fires.
pub const PATTERN_VOTES: u32 = 2;
/// Votes awarded to the breaking side when strict alternation is seen.
pub const TELECO_BONUS: u32 = 2;

// ---------------------------------------------------------------------------
// Advantage
// ---------------------------------------------------------------------------

/// Count imbalance between Player and Banker.
pub fn advantage(sides: &[Side]) -> Advantage {
    let player = sides.iter().filter(|s| **s == Side::Player).count();
    let banker = sides.len() - player;

    if player > banker {
        Advantage { leader: Some(Side::Player), margin: player - banker }
    } else if banker > player {
        Advantage { leader: Some(Side::Banker), margin: banker - player }
    } else {
        Advantage::LEVEL
    }
}

// ---------------------------------------------------------------------------
// Teleco
// ---------------------------------------------------------------------------

/// True when the last `min_len` sides alternate with no repeats.
pub fn is_teleco(sides: &[Side], min_len: usize) -> bool {
    if sides.len() < min_len {
        return false;
    }
    sides[sides.len() - min_len..]
        .windows(2)
        .all(|pair| pair[0] != pair[1])
}

/// Bonus tally for strict alternation: favours the side opposite the
/// current run.
pub fn teleco_votes(sides: &[Side], runs: &[Run]) -> VoteTally {
    let mut votes = VoteTally::default();
    if let Some(current) = runs.last() {
        if is_teleco(sides, TELECO_WINDOW) {
            votes.add(current.side.opposite(), TELECO_BONUS);
        }
    }
    votes
}

// ---------------------------------------------------------------------------
// Regularity
// ---------------------------------------------------------------------------

/// A single pattern rule over the run list.
pub type RegularityRule = fn(&[Run]) -> VoteTally;

/// Every regularity rule, applied in order and summed.
pub const REGULARITY_RULES: &[(&str, RegularityRule)] = &[
    ("two_two", two_two_rule),
    ("short_mirror", short_mirror_rule),
    ("long_mirror", long_mirror_rule),
];

/// Two runs of two, then: a single continues, a second pair breaks.
fn two_two_rule(runs: &[Run]) -> VoteTally {
    let mut votes = VoteTally::default();
    if let [.., third, second, current] = runs {
        if second.len == 2 && third.len == 2 {
            match current.len {
                1 => votes.add(current.side, PATTERN_VOTES),
                2 => votes.add(current.side.opposite(), PATTERN_VOTES),
                _ => {}
            }
        }
    }
    votes
}

/// Lengths `[2,1,2]` or `[1,2,1]` before a fresh single.
fn short_mirror_rule(runs: &[Run]) -> VoteTally {
    mirror_rule(runs, [[2, 1, 2], [1, 2, 1]])
}

/// Lengths `[3,1,3]` or `[1,3,1]` before a fresh single.
fn long_mirror_rule(runs: &[Run]) -> VoteTally {
    mirror_rule(runs, [[3, 1, 3], [1, 3, 1]])
}

fn mirror_rule(runs: &[Run], shapes: [[usize; 3]; 2]) -> VoteTally {
    let mut votes = VoteTally::default();
    if let [.., a, b, c, current] = runs {
        if current.len == 1 && shapes.contains(&[a.len, b.len, c.len]) {
            votes.add(current.side.opposite(), PATTERN_VOTES);
        }
    }
    votes
}

/// Sum of every regularity rule's votes.
pub fn regularity_votes(runs: &[Run]) -> VoteTally {
    REGULARITY_RULES
        .iter()
        .fold(VoteTally::default(), |acc, (name, rule)| {
            let votes = rule(runs);
            if !votes.is_empty() {
                trace!(rule = *name, %votes, "Regularity rule fired");
            }
            acc.merge(votes)
        })
}

// ---------------------------------------------------------------------------
// Continuity
// ---------------------------------------------------------------------------

/// Sides favoured by long-streak momentum.
pub fn continuity_picks(runs: &[Run]) -> BTreeSet<Side> {
    let mut picks = BTreeSet::new();
    if let Some(current) = runs.last() {
        if current.len >= LONG_STREAK {
            picks.insert(current.side);
        }
    }
    // A single break right after a long streak is read as noise.
    if let [.., previous, current] = runs {
        if previous.len >= LONG_STREAK && current.len == 1 {
            picks.insert(previous.side);
        }
    }
    picks
}

// ---------------------------------------------------------------------------
// Feature set
// ---------------------------------------------------------------------------

/// Everything the combiner needs, derived from one tie-free sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    pub advantage: Advantage,
    pub current_run: Run,
    pub run_count: usize,
    pub continuity: BTreeSet<Side>,
    /// Regularity votes with the teleco bonus already merged in.
    pub regularity: VoteTally,
    pub teleco: bool,
}

impl Features {
    /// Run every scorer over `sides` and its run list.
    pub fn collect(sides: &[Side], runs: &[Run], current_run: Run, advantage: Advantage) -> Self {
        let teleco = teleco_votes(sides, runs);
        Self {
            advantage,
            current_run,
            run_count: runs.len(),
            continuity: continuity_picks(runs),
            regularity: regularity_votes(runs).merge(teleco),
            teleco: !teleco.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
