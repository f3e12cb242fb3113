//! SHOE ORACLE: pattern-reading recommendation engine for P/B/T shoes.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod engine;
pub mod live;
pub mod backtest;

pub use engine::{analyze, recommend, recommend_outcomes, Decision};
pub use types::{Outcome, Recommendation, Side};
