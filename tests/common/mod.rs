use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// A host-shaped closed trade, `hours` after [`base_time`].
pub fn raw_trade(hours: i64, instrument: &str, direction: &str, pnl: f64, pct: f64, rr: f64) -> Value {
    json!({
        "id": format!("trade-{}", hours),
        "type": "trade",
        "status": "closed",
        "instrument": instrument,
        "direction": direction,
        "openTimestamp": (base_time() + Duration::hours(hours) - Duration::minutes(45)).to_rfc3339(),
        "closeTimestamp": (base_time() + Duration::hours(hours)).to_rfc3339(),
        "pnlUsd": pnl,
        "pnlPercent": pct,
        "riskReward": rr
    })
}

pub fn raw_cashflow(hours: i64, amount: f64) -> Value {
    json!({
        "id": format!("cash-{}", hours),
        "type": "cashflow",
        "closeTimestamp": (base_time() + Duration::hours(hours)).to_rfc3339(),
        "amount": amount
    })
}
