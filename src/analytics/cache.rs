use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

use crate::analytics::engine::AnalyticsEngine;
use crate::analytics::types::AnalyticsResult;
use crate::models::LedgerEntry;

/// Keeps the last analytics snapshot and recomputes only when the ledger
/// content or the initial balance changes.
pub struct AnalyticsCache {
    engine: AnalyticsEngine,
    key: Option<u64>,
    value: Option<Arc<AnalyticsResult>>,
    hits: u64,
    misses: u64,
}

impl AnalyticsCache {
    pub fn new(engine: AnalyticsEngine) -> Self {
        Self {
            engine,
            key: None,
            value: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_compute(
        &mut self,
        entries: &[LedgerEntry],
        initial_balance: f64,
    ) -> Arc<AnalyticsResult> {
        let key = fingerprint(entries, initial_balance);

        if self.key == Some(key) {
            if let Some(cached) = &self.value {
                self.hits += 1;
                debug!("Analytics cache hit ({:016x})", key);
                return Arc::clone(cached);
            }
        }

        self.misses += 1;
        debug!(
            "Analytics cache miss ({:016x}), recomputing {} entries",
            key,
            entries.len()
        );
        let result = Arc::new(self.engine.compute(entries, initial_balance));
        self.key = Some(key);
        self.value = Some(Arc::clone(&result));
        result
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.value = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Content hash of a ledger; floats are hashed by bit pattern.
pub fn fingerprint(entries: &[LedgerEntry], initial_balance: f64) -> u64 {
    let mut h = DefaultHasher::new();
    initial_balance.to_bits().hash(&mut h);
    entries.len().hash(&mut h);

    for entry in entries {
        match entry {
            LedgerEntry::Trade(t) => {
                0u8.hash(&mut h);
                t.id.hash(&mut h);
                t.instrument.hash(&mut h);
                t.direction.hash(&mut h);
                t.status.hash(&mut h);
                t.open_timestamp.hash(&mut h);
                t.close_timestamp.hash(&mut h);
                t.pnl_usd.to_bits().hash(&mut h);
                t.pnl_percent.to_bits().hash(&mut h);
                t.risk_reward.to_bits().hash(&mut h);
            }
            LedgerEntry::Cashflow(c) => {
                1u8.hash(&mut h);
                c.id.hash(&mut h);
                c.close_timestamp.hash(&mut h);
                c.amount.to_bits().hash(&mut h);
            }
        }
    }

    h.finish()
}
