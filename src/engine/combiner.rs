//! Decision combiner.
//!
//! Two branches over the collected [`Features`]: a strong count advantage
//! must be corroborated by a structural signal, otherwise both sides are
//! scored and the higher score wins.

use serde::Serialize;

use super::scorers::Features;
use crate::types::{Recommendation, Side};

/// Margin from which the leading side is evaluated on its own.
pub const STRONG_MARGIN: usize = 5;
/// Current-run length that counts as momentum.
pub const MOMENTUM_RUN: usize = 3;

/// Support for the leader when it is a continuity pick (strong branch).
const CONTINUITY_SUPPORT: u32 = 2;
/// Score for a continuity pick (weighted branch).
const CONTINUITY_SCORE: u32 = 3;
const MOMENTUM_BONUS: u32 = 1;
const LEAD_BONUS: u32 = 1;

/// Which guard or branch produced a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionReason {
    /// Nothing valid was recorded.
    EmptySequence,
    /// The most recent round was a tie.
    TrailingTie,
    /// Only ties were recorded.
    NoSideOutcomes,
    /// Imbalance at or above the hard ceiling.
    ExtremeImbalance { margin: usize },
    /// Strong advantage backed by structure.
    Corroborated { side: Side, support: u32 },
    /// Strong advantage with no structural backing.
    Uncorroborated { side: Side, margin: usize },
    /// Weighted branch, one side scored higher.
    Outscored { player: u32, banker: u32 },
    /// Weighted branch, both sides scored zero.
    NoSignal,
    /// Weighted branch, equal non-zero scores resolved to the current run.
    MomentumTieBreak { score: u32 },
}

fn has_momentum(features: &Features, side: Side) -> bool {
    features.current_run.side == side && features.current_run.len >= MOMENTUM_RUN
}

/// Support score for the leading side in the strong-advantage branch.
pub fn leader_support(features: &Features, leader: Side) -> u32 {
    let mut support = 0;
    if features.continuity.contains(&leader) {
        support += CONTINUITY_SUPPORT;
    }
    support += features.regularity.get(leader);
    if has_momentum(features, leader) {
        support += MOMENTUM_BONUS;
    }
    support
}

/// Score for one side in the weighted branch.
pub fn side_score(features: &Features, side: Side) -> u32 {
    let mut score = 0;
    if features.continuity.contains(&side) {
        score += CONTINUITY_SCORE;
    }
    score += features.regularity.get(side);
    if features.advantage.leader == Some(side) && features.advantage.margin >= 1 {
        score += LEAD_BONUS;
    }
    if has_momentum(features, side) {
        score += MOMENTUM_BONUS;
    }
    score
}

/// Reduce the features to a recommendation.
///
/// Callers must have applied the tie and extreme-margin guards already.
pub fn combine(features: &Features) -> (Recommendation, DecisionReason) {
    let advantage = features.advantage;

    if let Some(leader) = advantage.leader.filter(|_| advantage.margin >= STRONG_MARGIN) {
        let support = leader_support(features, leader);
        return if support > 0 {
            (leader.into(), DecisionReason::Corroborated { side: leader, support })
        } else {
            (
                Recommendation::Look,
                DecisionReason::Uncorroborated { side: leader, margin: advantage.margin },
            )
        };
    }

    let player = side_score(features, Side::Player);
    let banker = side_score(features, Side::Banker);

    if player > banker {
        (Recommendation::Player, DecisionReason::Outscored { player, banker })
    } else if banker > player {
        (Recommendation::Banker, DecisionReason::Outscored { player, banker })
    } else if player == 0 {
        (Recommendation::Look, DecisionReason::NoSignal)
    } else {
        (
            features.current_run.side.into(),
            DecisionReason::MomentumTieBreak { score: player },
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
