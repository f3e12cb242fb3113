//! SHOE ORACLE: command-line entry point.
//!
//! Single-shot recommendation, JSON explanation, shoe backtesting, or a
//! live loop reading one outcome per line from stdin. Logs go to stderr so
//! stdout carries nothing but results.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use shoe_oracle::backtest::{load_shoes, Backtester};
use shoe_oracle::config::AppConfig;
use shoe_oracle::engine::normalize::normalize;
use shoe_oracle::live::{run_live, until_signal};
use shoe_oracle::{analyze, recommend, Recommendation};

#[derive(Parser)]
#[command(name = "shoe-oracle")]
#[command(about = "Recommend P, B or LOOK from a shoe record", long_about = None)]
#[command(version)]
struct Cli {
    /// Recommend once for a sequence (e.g. PPBBPBTBB)
    #[arg(long, value_name = "SEQ")]
    recommend: Option<String>,

    /// Print the full decision for a sequence as JSON
    #[arg(long, value_name = "SEQ")]
    explain: Option<String>,

    /// Replay shoes from a file, one shoe per line
    #[arg(long, value_name = "FILE")]
    backtest: Option<String>,

    /// Read one outcome per line from stdin and recommend after each
    #[arg(long)]
    live: bool,

    /// Config file (defaults to shoe-oracle.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::load_or_default(cli.config.as_deref())?;

    init_logging(&cfg);

    // An empty sequence falls through to the remaining modes.
    if let Some(seq) = cli.recommend.as_deref().filter(|s| !s.is_empty()) {
        println!("{}", recommend(seq));
        return Ok(());
    }

    if let Some(seq) = cli.explain.as_deref() {
        let decision = analyze(&normalize(seq));
        let json = serde_json::to_string_pretty(&decision)
            .context("Failed to serialise decision")?;
        println!("{json}");
        return Ok(());
    }

    if let Some(path) = cli.backtest.as_deref() {
        let shoes = load_shoes(path)?;
        let report = Backtester::new(cfg.backtest.clone()).run(&shoes);
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialise backtest report")?;
        println!("{json}");
        return Ok(());
    }

    if cli.live {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let shutdown = until_signal(tokio::signal::ctrl_c());
        let summary = run_live(stdin, tokio::io::stdout(), shutdown).await?;
        info!(
            lines = summary.lines_read,
            recommendations = summary.recommendations,
            "Live mode finished"
        );
        // A pending stdin read holds a blocking-pool thread that runtime
        // shutdown would wait on, so leave without dropping the runtime.
        std::process::exit(0);
    }

    println!("{}", Recommendation::Look);
    Ok(())
}

/// Initialise the `tracing` subscriber on stderr.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter));

    let json_logging = cfg.logging.json || std::env::var("SHOE_ORACLE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
