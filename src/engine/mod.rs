//! Recommendation engine: normalise, guard, score, combine.
//!
//! Every call re-derives everything from the full sequence it is handed.
//! Nothing is cached between calls, so the functions here are safe to use
//! from any number of callers at once.

pub mod combiner;
pub mod normalize;
pub mod scorers;

use serde::Serialize;
use tracing::debug;

use crate::types::{Outcome, Recommendation};
use combiner::{combine, DecisionReason};
use normalize::{ends_in_tie, extract_runs, normalize, strip_ties};
use scorers::{advantage, Features, EXTREME_MARGIN};

/// A recommendation together with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub recommendation: Recommendation,
    pub reason: DecisionReason,
    /// Absent when a guard fired before scoring.
    pub features: Option<Features>,
}

impl Decision {
    fn guarded(reason: DecisionReason) -> Self {
        Self {
            recommendation: Recommendation::Look,
            reason,
            features: None,
        }
    }
}

/// Recommend the next bet for a raw shoe record such as `"PPBBPBTBB"`.
///
/// Unrecognised characters are ignored.
pub fn recommend(raw: &str) -> Recommendation {
    analyze(&normalize(raw)).recommendation
}

/// Recommend the next bet for an already-parsed outcome sequence.
pub fn recommend_outcomes(seq: &[Outcome]) -> Recommendation {
    analyze(seq).recommendation
}

/// Run the full pipeline and keep the reasoning.
///
/// The guards short-circuit in a fixed order: empty sequence, trailing tie,
/// no side outcomes, extreme imbalance. Only then are the scorers run.
pub fn analyze(seq: &[Outcome]) -> Decision {
    if seq.is_empty() {
        return Decision::guarded(DecisionReason::EmptySequence);
    }
    if ends_in_tie(seq) {
        return Decision::guarded(DecisionReason::TrailingTie);
    }

    let sides = strip_ties(seq);
    let runs = extract_runs(&sides);
    let Some(&current_run) = runs.last() else {
        return Decision::guarded(DecisionReason::NoSideOutcomes);
    };

    let advantage = advantage(&sides);
    if advantage.margin >= EXTREME_MARGIN {
        debug!(margin = advantage.margin, "Imbalance too extreme to trust");
        return Decision::guarded(DecisionReason::ExtremeImbalance {
            margin: advantage.margin,
        });
    }

    let features = Features::collect(&sides, &runs, current_run, advantage);
    let (recommendation, reason) = combine(&features);

    debug!(
        rounds = seq.len(),
        current_run = %features.current_run,
        margin = features.advantage.margin,
        leader = ?features.advantage.leader,
        regularity = %features.regularity,
        continuity = ?features.continuity,
        teleco = features.teleco,
        reason = ?reason,
        %recommendation,
        "Recommendation computed"
    );

    Decision {
        recommendation,
        reason,
        features: Some(features),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
