use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::ledger::{LedgerError, LedgerSnapshot, LedgerSource};
use crate::models::{safe_number, RawLedgerEntry};

/// A LedgerSource backed by a JSON export on disk.
///
/// The document is either a bare array of entries or an object of the form
/// `{ "initialBalance": 1000, "entries": [...] }`.
pub struct FileLedgerSource {
    path: String,
}

impl FileLedgerSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parse(content: &str) -> Result<LedgerSnapshot, LedgerError> {
        let doc: Value = serde_json::from_str(content)?;

        let (items, initial_balance) = match doc {
            Value::Array(items) => (items, None),
            Value::Object(mut map) => {
                let balance = map.get("initialBalance").map(safe_number);
                match map.remove("entries") {
                    Some(Value::Array(items)) => (items, balance),
                    Some(_) => {
                        return Err(LedgerError::Shape(
                            "\"entries\" must be an array".to_string(),
                        ))
                    }
                    None => (Vec::new(), balance),
                }
            }
            _ => {
                return Err(LedgerError::Shape(
                    "expected an array of entries or an object with \"entries\"".to_string(),
                ))
            }
        };

        let mut entries = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                warn!("Ignoring ledger item {}: not an object", i);
                continue;
            }
            entries.push(serde_json::from_value::<RawLedgerEntry>(item)?);
        }

        Ok(LedgerSnapshot {
            entries,
            initial_balance,
        })
    }
}

#[async_trait]
impl LedgerSource for FileLedgerSource {
    async fn load(&mut self) -> Result<LedgerSnapshot, LedgerError> {
        info!("Loading ledger from {}", self.path);
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LedgerError::Io {
                path: self.path.clone(),
                source,
            })?;
        let snapshot = Self::parse(&content)?;
        info!("  Loaded {} ledger entries", snapshot.entries.len());
        Ok(snapshot)
    }
}
