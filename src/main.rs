use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use synara_analytics::analytics::AnalyticsEngine;
use synara_analytics::config::Config;
use synara_analytics::ledger::{self, FileLedgerSource, LedgerSource};

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // Parse CLI args: [ledger_path] [initial_balance]
    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = args.get(1) {
        cfg.ledger_path = path.clone();
    }
    let balance_arg: Option<f64> = args.get(2).and_then(|s| s.parse().ok());

    let mut source = FileLedgerSource::new(&cfg.ledger_path);
    let snapshot = source
        .load()
        .await
        .with_context(|| format!("loading ledger from {}", source.path()))?;

    // CLI arg beats the file, the file beats the environment.
    let initial_balance = balance_arg
        .or(snapshot.initial_balance)
        .unwrap_or(cfg.initial_balance);

    let entries = ledger::analyzable(snapshot.entries);
    info!(
        "Computing analytics for {} entries from ${:.2}",
        entries.len(),
        initial_balance
    );

    let engine = AnalyticsEngine::from_config(&cfg);
    let result = engine.compute_raw(&entries, initial_balance);

    if cfg.json_output() {
        let json = serde_json::to_string_pretty(&result.rounded())?;
        println!("{}", json);
    } else {
        result.print_summary();
        println!();
        println!("{}", result.analytics.assistant_context());
    }

    Ok(())
}
