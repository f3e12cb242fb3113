//! Shoe backtesting engine.
//!
//! Replays recorded shoes hand by hand: every prefix is shown to the
//! engine, and its recommendation is settled against the outcome that
//! actually followed. Reports hit rate, flat-stake P&L and the longest
//! losing streak.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BacktestConfig;
use crate::engine::normalize::normalize;
use crate::engine::recommend_outcomes;
use crate::types::{OracleError, Outcome, Recommendation, Side};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Parse one shoe per line. Lines with no valid outcomes are skipped.
pub fn parse_shoes(contents: &str) -> Vec<Vec<Outcome>> {
    contents
        .lines()
        .map(normalize)
        .filter(|shoe| !shoe.is_empty())
        .collect()
}

/// Read shoes from a file, one per line.
pub fn load_shoes(path: &str) -> Result<Vec<Vec<Outcome>>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read backtest input: {path}"))?;
    let shoes = parse_shoes(&contents);
    if shoes.is_empty() {
        return Err(OracleError::EmptyBacktest(path.to_string()).into());
    }
    debug!(path, shoes = shoes.len(), "Backtest input loaded");
    Ok(shoes)
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// How a single recommendation settled against the next outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settlement {
    /// No bet was placed.
    Look,
    /// Bet won; net units gained.
    Win(f64),
    /// Bet lost the stake.
    Loss(f64),
    /// Tie on a side bet: stake returned.
    Push,
}

/// Per-shoe performance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShoeSummary {
    pub index: usize,
    pub rounds: usize,
    pub bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub net_units: f64,
}

/// Complete backtest performance report.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub generated_at: DateTime<Utc>,
    pub shoes: usize,
    /// Hands on which the engine was consulted.
    pub hands: usize,
    pub bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub looks: usize,
    /// Wins over decided bets (pushes excluded).
    pub hit_rate: f64,
    pub net_units: f64,
    /// Longest run of losses not interrupted by a win.
    pub longest_losing_streak: usize,
    pub per_shoe: Vec<ShoeSummary>,
}

// ---------------------------------------------------------------------------
// Backtester
// ---------------------------------------------------------------------------

pub struct Backtester {
    config: BacktestConfig,
}

impl Backtester {
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Settle a recommendation against the outcome that followed.
    pub fn settle(&self, recommendation: Recommendation, next: Outcome) -> Settlement {
        let Some(side) = recommendation.side() else {
            return Settlement::Look;
        };
        let stake = self.config.stake;
        match next.side() {
            None => Settlement::Push,
            Some(winner) if winner == side => match side {
                Side::Player => Settlement::Win(stake),
                Side::Banker => Settlement::Win(stake * (1.0 - self.config.banker_commission)),
            },
            Some(_) => Settlement::Loss(stake),
        }
    }

    /// Replay every shoe in order.
    pub fn run(&self, shoes: &[Vec<Outcome>]) -> BacktestReport {
        let mut per_shoe = Vec::with_capacity(shoes.len());
        let mut looks = 0usize;
        let mut streak = 0usize;
        let mut longest_streak = 0usize;

        for (index, shoe) in shoes.iter().enumerate() {
            let mut summary = ShoeSummary {
                index,
                rounds: shoe.len(),
                ..Default::default()
            };

            for i in 1..shoe.len() {
                let recommendation = recommend_outcomes(&shoe[..i]);
                match self.settle(recommendation, shoe[i]) {
                    Settlement::Look => looks += 1,
                    Settlement::Push => {
                        summary.bets += 1;
                        summary.pushes += 1;
                    }
                    Settlement::Win(units) => {
                        summary.bets += 1;
                        summary.wins += 1;
                        summary.net_units += units;
                        streak = 0;
                    }
                    Settlement::Loss(units) => {
                        summary.bets += 1;
                        summary.losses += 1;
                        summary.net_units -= units;
                        streak += 1;
                        longest_streak = longest_streak.max(streak);
                    }
                }
            }

            debug!(
                shoe = index,
                rounds = summary.rounds,
                bets = summary.bets,
                net = format!("{:+.2}", summary.net_units),
                "Shoe replayed"
            );
            per_shoe.push(summary);
        }

        let hands = per_shoe.iter().map(|s| s.rounds.saturating_sub(1)).sum();
        let bets = per_shoe.iter().map(|s| s.bets).sum();
        let wins: usize = per_shoe.iter().map(|s| s.wins).sum();
        let losses: usize = per_shoe.iter().map(|s| s.losses).sum();
        let pushes = per_shoe.iter().map(|s| s.pushes).sum();
        let net_units = per_shoe.iter().map(|s| s.net_units).sum();
        let decided = wins + losses;

        let report = BacktestReport {
            generated_at: Utc::now(),
            shoes: shoes.len(),
            hands,
            bets,
            wins,
            losses,
            pushes,
            looks,
            hit_rate: if decided > 0 { wins as f64 / decided as f64 } else { 0.0 },
            net_units,
            longest_losing_streak: longest_streak,
            per_shoe,
        };

        info!(
            shoes = report.shoes,
            hands = report.hands,
            bets = report.bets,
            hit_rate = format!("{:.1}%", report.hit_rate * 100.0),
            net = format!("{:+.2}", report.net_units),
            "Backtest complete"
        );

        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn default_backtester() -> Backtester {
        Backtester::new(BacktestConfig::default())
    }

    #[test]
    fn test_settle_player_win_pays_even() {
        let bt = default_backtester();
        assert_eq!(bt.settle(Recommendation::Player, Outcome::Player), Settlement::Win(1.0));
    }

    #[test]
    fn test_settle_banker_win_pays_commission() {
        let bt = default_backtester();
        match bt.settle(Recommendation::Banker, Outcome::Banker) {
            Settlement::Win(units) => assert!((units - 0.95).abs() < 1e-9),
            other => panic!("expected win, got {other:?}"),
        }
    }

    #[test]
    fn test_settle_tie_pushes_and_look_is_free() {
        let bt = default_backtester();
        assert_eq!(bt.settle(Recommendation::Banker, Outcome::Tie), Settlement::Push);
        assert_eq!(bt.settle(Recommendation::Look, Outcome::Player), Settlement::Look);
        assert_eq!(bt.settle(Recommendation::Player, Outcome::Banker), Settlement::Loss(1.0));
    }

    #[test]
    fn test_parse_shoes_skips_blank_lines() {
        let shoes = parse_shoes("PPB\n\n  -- 123 --\nbtp\n");
        assert_eq!(shoes.len(), 2);
        assert_eq!(shoes[1], vec![Outcome::Banker, Outcome::Tie, Outcome::Player]);
    }

    #[test]
    fn test_empty_run() {
        let report = default_backtester().run(&[]);
        assert_eq!(report.shoes, 0);
        assert_eq!(report.hands, 0);
        assert_eq!(report.hit_rate, 0.0);
        assert_eq!(report.net_units, 0.0);
    }

    #[test]
    fn test_replay_single_shoe() {
        // Prefixes and recommendations:
        //   P     -> P    vs P  win  (+1)
        //   PP    -> P    vs B  loss (-1)
        //   PPB   -> P    vs B  loss (-1)
        //   PPBB  -> LOOK (level, no structure)
        let shoe = normalize("PPBBP");
        let report = default_backtester().run(&[shoe]);

        assert_eq!(report.hands, 4);
        assert_eq!(report.wins, 1);
        assert_eq!(report.losses, 2);
        assert_eq!(report.looks, 1);
        assert_eq!(report.bets, 3);
        assert!((report.hit_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((report.net_units + 1.0).abs() < 1e-9);
        assert_eq!(report.longest_losing_streak, 2);
    }

    #[test]
    fn test_tie_after_bet_is_push() {
        // P -> P, settled against T.
        let report = default_backtester().run(&[normalize("PT")]);
        assert_eq!(report.pushes, 1);
        assert_eq!(report.bets, 1);
        assert_eq!(report.net_units, 0.0);
    }

    #[test]
    fn test_losing_streak_spans_shoes() {
        // "PB": P -> P, loses to B. Two such shoes back to back.
        let shoes = vec![normalize("PB"), normalize("PB")];
        let report = default_backtester().run(&shoes);
        assert_eq!(report.losses, 2);
        assert_eq!(report.longest_losing_streak, 2);
        assert_eq!(report.per_shoe.len(), 2);
        assert_eq!(report.per_shoe[1].index, 1);
    }

    #[test]
    fn test_report_serializes() {
        let report = default_backtester().run(&[normalize("PPBB")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hands"], 3);
        assert!(json["generated_at"].is_string());
        assert_eq!(json["per_shoe"][0]["rounds"], 4);
    }
}
