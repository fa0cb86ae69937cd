use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Direction, TradeEntry};

/// Stand-in for an unbounded ratio when there is nothing to divide by.
pub const PROFIT_FACTOR_CAP: f64 = 999.99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentStats {
    pub instrument: String,
    pub wins: usize,
    pub losses: usize,
    pub pnl: f64,
    pub count: usize,
    pub win_rate: f64,
}

impl InstrumentStats {
    pub fn new(instrument: &str) -> Self {
        Self {
            instrument: instrument.to_string(),
            wins: 0,
            losses: 0,
            pnl: 0.0,
            count: 0,
            win_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionBucket {
    pub wins: usize,
    pub losses: usize,
    pub pnl: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionStats {
    #[serde(rename = "L")]
    pub long: DirectionBucket,
    #[serde(rename = "S")]
    pub short: DirectionBucket,
}

impl DirectionStats {
    pub fn get(&self, direction: Direction) -> &DirectionBucket {
        match direction {
            Direction::Long => &self.long,
            Direction::Short => &self.short,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut DirectionBucket {
        match direction {
            Direction::Long => &mut self.long,
            Direction::Short => &mut self.short,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAnalytics {
    /// Percentage, 0-100.
    pub win_rate: f64,
    #[serde(rename = "averageRR")]
    pub average_rr: f64,
    pub profit_factor: f64,
    pub reward_to_risk_ratio: f64,
    pub total_trades: usize,
    pub avg_win: f64,
    /// Reported as a positive magnitude.
    pub avg_loss: f64,
    pub total_pnl: f64,
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
    pub best_trade: Option<TradeEntry>,
    pub worst_trade: Option<TradeEntry>,
    #[serde(rename = "bestROE")]
    pub best_roe: f64,
    /// Fraction of the running peak, 0-1.
    pub max_drawdown: f64,
    pub instrument_stats: Vec<InstrumentStats>,
    pub direction_stats: DirectionStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquityPointKind {
    Start,
    Trade,
    Cashflow,
}

impl fmt::Display for EquityPointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquityPointKind::Start => write!(f, "start"),
            EquityPointKind::Trade => write!(f, "trade"),
            EquityPointKind::Cashflow => write!(f, "cashflow"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub label: String,
    pub balance: f64,
    pub pnl: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EquityPointKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub analytics: PerformanceAnalytics,
    pub equity_curve: Vec<EquityPoint>,
}

impl AnalyticsResult {
    pub fn final_balance(&self) -> f64 {
        self.equity_curve.last().map(|p| p.balance).unwrap_or(0.0)
    }
}
