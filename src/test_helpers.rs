use chrono::{DateTime, Duration, Utc};

use crate::analytics::AnalyticsEngine;
use crate::config::Config;
use crate::models::{CashflowEntry, Direction, LedgerEntry, TradeEntry};

pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Engine with a pinned clock so empty-ledger output is reproducible.
pub fn fixed_engine() -> AnalyticsEngine {
    AnalyticsEngine::new().with_clock(base_time())
}

/// A closed trade `minutes` after [`base_time`].
pub fn trade_at(
    minutes: i64,
    instrument: &str,
    direction: Direction,
    pnl: f64,
    pnl_percent: f64,
    risk_reward: f64,
) -> LedgerEntry {
    LedgerEntry::Trade(TradeEntry {
        id: format!("t{}", minutes),
        instrument: instrument.to_string(),
        direction,
        status: "closed".to_string(),
        open_timestamp: Some(base_time() + Duration::minutes(minutes - 30)),
        close_timestamp: base_time() + Duration::minutes(minutes),
        pnl_usd: pnl,
        pnl_percent,
        risk_reward,
    })
}

/// Sequential BTCUSDT longs, one minute apart, with rr 1.0 and 0% ROE.
pub fn trades_from_pnls(pnls: &[f64]) -> Vec<LedgerEntry> {
    pnls.iter()
        .enumerate()
        .map(|(i, &p)| trade_at(i as i64, "BTCUSDT", Direction::Long, p, 0.0, 1.0))
        .collect()
}

pub fn cashflow_at(minutes: i64, amount: f64) -> LedgerEntry {
    LedgerEntry::Cashflow(CashflowEntry {
        id: format!("c{}", minutes),
        close_timestamp: base_time() + Duration::minutes(minutes),
        amount,
    })
}

/// A Config for tests: no ledger file, UTC labels, quiet logs.
pub fn default_test_config() -> Config {
    Config {
        initial_balance: 1000.0,
        ledger_path: std::env::temp_dir()
            .join("synara_test_ledger.json")
            .to_string_lossy()
            .to_string(),
        display_tz: "UTC".to_string(),
        output_format: "text".to_string(),
        log_level: "ERROR".to_string(),
    }
}
