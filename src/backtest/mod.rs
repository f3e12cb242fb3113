//! Historical replay of recorded shoes through the engine.

pub mod runner;

pub use runner::{load_shoes, parse_shoes, BacktestReport, Backtester, Settlement, ShoeSummary};
