pub mod file;

pub use file::FileLedgerSource;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::models::RawLedgerEntry;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to read ledger {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse ledger JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unexpected ledger shape: {0}")]
    Shape(String),
}

/// What a source hands over: the raw entries and, when the source records
/// one, the account's starting balance.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub entries: Vec<RawLedgerEntry>,
    pub initial_balance: Option<f64>,
}

#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn load(&mut self) -> Result<LedgerSnapshot, LedgerError>;
}

/// Keep only what the analytics should see: closed trades with a PnL, and
/// cash flows.
pub fn analyzable(entries: Vec<RawLedgerEntry>) -> Vec<RawLedgerEntry> {
    let total = entries.len();
    let kept: Vec<RawLedgerEntry> = entries.into_iter().filter(|e| e.is_analyzable()).collect();
    if kept.len() < total {
        info!(
            "Skipping {} open or unsettled trades ({} of {} entries kept)",
            total - kept.len(),
            kept.len(),
            total
        );
    }
    kept
}
