use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::coerce::{parse_timestamp, safe_number_opt};
use crate::models::direction::{Direction, EntryKind};

pub const UNKNOWN_INSTRUMENT: &str = "UNKNOWN";

/// A ledger entry as delivered by the host application.
///
/// Every field is kept as a loose JSON value so that a malformed record
/// still deserializes; coercion happens in [`LedgerEntry::normalize`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLedgerEntry {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub close_timestamp: Option<Value>,
    #[serde(default)]
    pub open_timestamp: Option<Value>,
    #[serde(default)]
    pub instrument: Option<Value>,
    #[serde(default)]
    pub direction: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub pnl_usd: Option<Value>,
    #[serde(default)]
    pub pnl_percent: Option<Value>,
    #[serde(default)]
    pub risk_reward: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

impl RawLedgerEntry {
    pub fn kind(&self) -> EntryKind {
        EntryKind::parse(&text(self.kind.as_ref()))
    }

    /// Closed trades with a recorded PnL, plus every cash flow.
    pub fn is_analyzable(&self) -> bool {
        match self.kind() {
            EntryKind::Cashflow => true,
            EntryKind::Trade => {
                text(self.status.as_ref()).eq_ignore_ascii_case("closed") && self.pnl_usd.is_some()
            }
        }
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEntry {
    pub id: String,
    pub instrument: String,
    pub direction: Direction,
    pub status: String,
    pub open_timestamp: Option<DateTime<Utc>>,
    pub close_timestamp: DateTime<Utc>,
    pub pnl_usd: f64,
    pub pnl_percent: f64,
    pub risk_reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowEntry {
    pub id: String,
    pub close_timestamp: DateTime<Utc>,
    /// Signed: deposits positive, withdrawals negative.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LedgerEntry {
    Trade(TradeEntry),
    Cashflow(CashflowEntry),
}

impl LedgerEntry {
    /// Coerce a raw record into a typed entry. Never fails: bad numbers read
    /// as 0 and a missing or unparseable close time reads as `fallback_now`.
    pub fn normalize(raw: &RawLedgerEntry, fallback_now: DateTime<Utc>) -> Self {
        let id = text(raw.id.as_ref());
        let close_timestamp = match raw.close_timestamp.as_ref().and_then(parse_timestamp) {
            Some(ts) => ts,
            None => {
                warn!(
                    "Ledger entry '{}' has no usable close timestamp, using {}",
                    id,
                    fallback_now.to_rfc3339()
                );
                fallback_now
            }
        };

        match raw.kind() {
            EntryKind::Trade => {
                let instrument = text(raw.instrument.as_ref());
                LedgerEntry::Trade(TradeEntry {
                    id,
                    instrument: if instrument.is_empty() {
                        UNKNOWN_INSTRUMENT.to_string()
                    } else {
                        instrument
                    },
                    direction: Direction::parse_loose(&text(raw.direction.as_ref())),
                    status: text(raw.status.as_ref()),
                    open_timestamp: raw.open_timestamp.as_ref().and_then(parse_timestamp),
                    close_timestamp,
                    pnl_usd: safe_number_opt(raw.pnl_usd.as_ref()),
                    pnl_percent: safe_number_opt(raw.pnl_percent.as_ref()),
                    risk_reward: safe_number_opt(raw.risk_reward.as_ref()),
                })
            }
            EntryKind::Cashflow => {
                let amount = raw.amount.as_ref().or(raw.pnl_usd.as_ref());
                LedgerEntry::Cashflow(CashflowEntry {
                    id,
                    close_timestamp,
                    amount: safe_number_opt(amount),
                })
            }
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            LedgerEntry::Trade(_) => EntryKind::Trade,
            LedgerEntry::Cashflow(_) => EntryKind::Cashflow,
        }
    }

    pub fn close_timestamp(&self) -> DateTime<Utc> {
        match self {
            LedgerEntry::Trade(t) => t.close_timestamp,
            LedgerEntry::Cashflow(c) => c.close_timestamp,
        }
    }

    /// How much this entry moves the account balance.
    pub fn balance_delta(&self) -> f64 {
        match self {
            LedgerEntry::Trade(t) => t.pnl_usd,
            LedgerEntry::Cashflow(c) => c.amount,
        }
    }

    pub fn as_trade(&self) -> Option<&TradeEntry> {
        match self {
            LedgerEntry::Trade(t) => Some(t),
            LedgerEntry::Cashflow(_) => None,
        }
    }
}
