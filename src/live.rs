//! Live mode: one outcome per input line, one recommendation per outcome.
//!
//! The accumulated shoe lives in a [`Session`] owned by the caller; the
//! engine only ever sees the full history it is handed.

use anyhow::{Context, Result};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::engine::recommend_outcomes;
use crate::types::{Outcome, Recommendation};

/// The outcomes recorded so far in the current shoe.
#[derive(Debug, Default, Clone)]
pub struct Session {
    history: Vec<Outcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Outcome] {
        &self.history
    }

    /// Record one input line.
    ///
    /// Lines that are not exactly one outcome token are ignored and yield
    /// `None`; valid lines extend the history and yield a fresh
    /// recommendation over all of it.
    pub fn push_line(&mut self, line: &str) -> Option<Recommendation> {
        let outcome = match line.parse::<Outcome>() {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, "Skipping line");
                return None;
            }
        };
        self.history.push(outcome);
        Some(recommend_outcomes(&self.history))
    }
}

/// Summary of a finished live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSummary {
    pub lines_read: usize,
    pub recommendations: usize,
}

/// Resolve when `signal` fires.
///
/// If the listener could not be installed the returned future never
/// resolves, so the loop runs until end of input instead of stopping at once.
pub async fn until_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Failed to listen for Ctrl+C; running until end of input");
        std::future::pending::<()>().await;
    }
}

/// Drive a session from `reader` to `writer` until EOF or `shutdown`.
///
/// Each recommendation is written on its own line and flushed at once so
/// downstream pipes see it in real time.
pub async fn run_live<R, W, S>(reader: R, mut writer: W, shutdown: S) -> Result<LiveSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut session = Session::new();
    let mut lines = reader.lines();
    let mut summary = LiveSummary { lines_read: 0, recommendations: 0 };
    tokio::pin!(shutdown);

    info!("Live mode started. Enter P, B or T per line.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input line")? else {
                    info!(rounds = session.history().len(), "End of input");
                    break;
                };
                summary.lines_read += 1;

                if let Some(recommendation) = session.push_line(&line) {
                    writer
                        .write_all(format!("{recommendation}\n").as_bytes())
                        .await
                        .context("Failed to write recommendation")?;
                    writer.flush().await.context("Failed to flush output")?;
                    summary.recommendations += 1;
                }
            }
            _ = &mut shutdown => {
                info!(rounds = session.history().len(), "Shutdown signal received.");
                break;
            }
        }
    }

    Ok(summary)
}
