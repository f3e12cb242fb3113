//! Shared types for the SHOE ORACLE engine.
//!
//! Outcomes, sides, runs and the recommendation form the data model used
//! by the engine, the live session and the backtester. Everything here is
//! a plain value: constructed and discarded within a single call.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// A single resolved round as written in a shoe record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Player,
    Banker,
    Tie,
}

impl Outcome {
    /// Map an input character (case-insensitive) to an outcome.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(Outcome::Player),
            'B' => Some(Outcome::Banker),
            'T' => Some(Outcome::Tie),
            _ => None,
        }
    }

    /// The side this outcome pays, if any. Ties pay neither side.
    pub fn side(&self) -> Option<Side> {
        match self {
            Outcome::Player => Some(Side::Player),
            Outcome::Banker => Some(Side::Banker),
            Outcome::Tie => None,
        }
    }

    pub fn token(&self) -> char {
        match self {
            Outcome::Player => 'P',
            Outcome::Banker => 'B',
            Outcome::Tie => 'T',
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Parse a single-token line such as `"p"` or `" T "`.
impl std::str::FromStr for Outcome {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Outcome::from_char(c)
                .ok_or_else(|| OracleError::InvalidToken(s.to_string())),
            _ => Err(OracleError::InvalidToken(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

/// One of the two bettable sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Player,
    Banker,
}

impl Side {
    /// The opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Player => Side::Banker,
            Side::Banker => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "P"),
            Side::Banker => write!(f, "B"),
        }
    }
}

// ---------------------------------------------------------------------------
// Runs, advantage, tallies
// ---------------------------------------------------------------------------

/// A maximal block of consecutive identical sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub side: Side,
    pub len: usize,
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.side, self.len)
    }
}

/// Count imbalance between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advantage {
    /// `None` when the counts are level.
    pub leader: Option<Side>,
    pub margin: usize,
}

impl Advantage {
    pub const LEVEL: Advantage = Advantage { leader: None, margin: 0 };
}

/// Votes per side, accumulated fresh on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub player: u32,
    pub banker: u32,
}

impl VoteTally {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Banker => self.banker,
        }
    }

    pub fn add(&mut self, side: Side, votes: u32) {
        match side {
            Side::Player => self.player += votes,
            Side::Banker => self.banker += votes,
        }
    }

    /// Sum two partial tallies.
    pub fn merge(self, other: VoteTally) -> VoteTally {
        VoteTally {
            player: self.player + other.player,
            banker: self.banker + other.banker,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.player == 0 && self.banker == 0
    }
}

impl fmt::Display for VoteTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P:{} B:{}", self.player, self.banker)
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// The engine's single output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Player,
    Banker,
    /// Sit the next round out.
    Look,
}

impl Recommendation {
    /// The side to bet on, or `None` when looking.
    pub fn side(&self) -> Option<Side> {
        match self {
            Recommendation::Player => Some(Side::Player),
            Recommendation::Banker => Some(Side::Banker),
            Recommendation::Look => None,
        }
    }
}

impl From<Side> for Recommendation {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Recommendation::Player,
            Side::Banker => Recommendation::Banker,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Player => write!(f, "P"),
            Recommendation::Banker => write!(f, "B"),
            Recommendation::Look => write!(f, "LOOK"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the CLI shell around the engine.
///
/// The engine itself never fails; these cover configuration and input files.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Invalid outcome token: {0:?}")]
    InvalidToken(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backtest input contains no shoes: {0}")]
    EmptyBacktest(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_char_is_case_insensitive() {
        assert_eq!(Outcome::from_char('p'), Some(Outcome::Player));
        assert_eq!(Outcome::from_char('B'), Some(Outcome::Banker));
        assert_eq!(Outcome::from_char('t'), Some(Outcome::Tie));
        assert_eq!(Outcome::from_char('x'), None);
        assert_eq!(Outcome::from_char(' '), None);
    }

    #[test]
    fn test_outcome_from_str_single_token() {
        assert_eq!(" b ".parse::<Outcome>().unwrap(), Outcome::Banker);
        assert_eq!("T".parse::<Outcome>().unwrap(), Outcome::Tie);
        assert!("PB".parse::<Outcome>().is_err());
        assert!("".parse::<Outcome>().is_err());
        assert!("x".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_outcome_side() {
        assert_eq!(Outcome::Player.side(), Some(Side::Player));
        assert_eq!(Outcome::Banker.side(), Some(Side::Banker));
        assert_eq!(Outcome::Tie.side(), None);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Player.opposite(), Side::Banker);
        assert_eq!(Side::Banker.opposite(), Side::Player);
    }

    #[test]
    fn test_recommendation_display_tokens() {
        assert_eq!(Recommendation::Player.to_string(), "P");
        assert_eq!(Recommendation::Banker.to_string(), "B");
        assert_eq!(Recommendation::Look.to_string(), "LOOK");
    }

    #[test]
    fn test_recommendation_from_side() {
        assert_eq!(Recommendation::from(Side::Banker), Recommendation::Banker);
        assert_eq!(Recommendation::Look.side(), None);
        assert_eq!(Recommendation::Player.side(), Some(Side::Player));
    }

    #[test]
    fn test_vote_tally_add_and_merge() {
        let mut a = VoteTally::default();
        assert!(a.is_empty());
        a.add(Side::Player, 2);
        let mut b = VoteTally::default();
        b.add(Side::Player, 1);
        b.add(Side::Banker, 3);

        let merged = a.merge(b);
        assert_eq!(merged.get(Side::Player), 3);
        assert_eq!(merged.get(Side::Banker), 3);
        assert_eq!(merged.to_string(), "P:3 B:3");
    }

    #[test]
    fn test_recommendation_serialization_roundtrip() {
        let json = serde_json::to_string(&Recommendation::Look).unwrap();
        assert_eq!(json, "\"Look\"");
        let back: Recommendation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Recommendation::Look);
    }
}
