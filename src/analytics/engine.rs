use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use tracing::debug;

use crate::analytics::types::{
    AnalyticsResult, DirectionStats, EquityPoint, EquityPointKind, InstrumentStats,
    PerformanceAnalytics, PROFIT_FACTOR_CAP,
};
use crate::config::Config;
use crate::models::{LedgerEntry, RawLedgerEntry, TradeEntry};

const START_LABEL: &str = "Start";

/// Derives trading performance metrics and the equity curve from a ledger.
///
/// Pure: the only state is the optional pinned clock and the time zone used
/// for chart labels.
pub struct AnalyticsEngine {
    /// When set, used instead of Utc::now() (reproducible runs and tests)
    clock: Option<DateTime<Utc>>,
    display_tz: Tz,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self {
            clock: None,
            display_tz: chrono_tz::UTC,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new().with_display_tz(cfg.display_tz())
    }

    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn with_display_tz(mut self, tz: Tz) -> Self {
        self.display_tz = tz;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    /// Normalize host records, then [`compute`](Self::compute).
    pub fn compute_raw(&self, raw: &[RawLedgerEntry], initial_balance: f64) -> AnalyticsResult {
        let now = self.now();
        let entries: Vec<LedgerEntry> = raw
            .iter()
            .map(|r| LedgerEntry::normalize(r, now))
            .collect();
        self.compute(&entries, initial_balance)
    }

    pub fn compute(&self, entries: &[LedgerEntry], initial_balance: f64) -> AnalyticsResult {
        let initial_balance = finite(initial_balance);

        // Stable: same-instant entries stay in input order.
        let mut sorted: Vec<&LedgerEntry> = entries.iter().collect();
        sorted.sort_by_key(|e| e.close_timestamp());

        let start_ts = sorted
            .first()
            .map(|e| {
                let first = e.close_timestamp();
                // Near the bottom of the representable range there is no day before.
                first.checked_sub_signed(Duration::days(1)).unwrap_or(first)
            })
            .unwrap_or_else(|| self.now());

        let mut equity_curve = Vec::with_capacity(sorted.len() + 1);
        equity_curve.push(EquityPoint {
            label: START_LABEL.to_string(),
            balance: initial_balance,
            pnl: 0.0,
            timestamp: start_ts,
            kind: EquityPointKind::Start,
        });

        let mut acc = Accumulator::new(initial_balance);
        for entry in sorted.iter().copied() {
            let delta = finite(entry.balance_delta());
            acc.apply_balance(delta);

            let timestamp = entry.close_timestamp();
            let kind = match entry {
                LedgerEntry::Trade(_) => EquityPointKind::Trade,
                LedgerEntry::Cashflow(_) => EquityPointKind::Cashflow,
            };
            equity_curve.push(EquityPoint {
                label: self.label(timestamp),
                balance: acc.balance,
                pnl: delta,
                timestamp,
                kind,
            });

            // Cash flows move the balance only.
            if let LedgerEntry::Trade(trade) = entry {
                acc.record_trade(trade);
            }
        }

        let analytics = acc.finish();
        debug!(
            "Analytics over {} entries: {} decided trades, WR {:.1}%, PnL {:.2}, max DD {:.4}",
            entries.len(),
            analytics.total_trades,
            analytics.win_rate,
            analytics.total_pnl,
            analytics.max_drawdown
        );

        AnalyticsResult {
            analytics,
            equity_curve,
        }
    }

    fn label(&self, ts: DateTime<Utc>) -> String {
        ts.with_timezone(&self.display_tz).format("%b %d").to_string()
    }
}

/// [`AnalyticsEngine::compute`] with a default engine.
pub fn compute_analytics(entries: &[LedgerEntry], initial_balance: f64) -> AnalyticsResult {
    AnalyticsEngine::new().compute(entries, initial_balance)
}

fn finite(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

fn win_rate(wins: usize, losses: usize) -> f64 {
    let decided = wins + losses;
    if decided > 0 {
        wins as f64 / decided as f64 * 100.0
    } else {
        0.0
    }
}

/// Running state for the single chronological pass.
struct Accumulator<'a> {
    balance: f64,
    peak: f64,
    max_drawdown: f64,

    wins: usize,
    losses: usize,
    gross_win: f64,
    gross_loss: f64,
    total_pnl: f64,

    win_streak: usize,
    loss_streak: usize,
    max_win_streak: usize,
    max_loss_streak: usize,

    winner_rr_sum: f64,
    winner_rr_count: usize,

    best: Option<&'a TradeEntry>,
    worst: Option<&'a TradeEntry>,
    best_roe: f64,

    instruments: Vec<InstrumentStats>,
    instrument_index: HashMap<&'a str, usize>,
    directions: DirectionStats,
}

impl<'a> Accumulator<'a> {
    fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance,
            peak: initial_balance,
            max_drawdown: 0.0,
            wins: 0,
            losses: 0,
            gross_win: 0.0,
            gross_loss: 0.0,
            total_pnl: 0.0,
            win_streak: 0,
            loss_streak: 0,
            max_win_streak: 0,
            max_loss_streak: 0,
            winner_rr_sum: 0.0,
            winner_rr_count: 0,
            best: None,
            worst: None,
            best_roe: 0.0,
            instruments: Vec::new(),
            instrument_index: HashMap::new(),
            directions: DirectionStats::default(),
        }
    }

    fn apply_balance(&mut self, delta: f64) {
        self.balance += delta;
        self.peak = self.peak.max(self.balance);
        if self.peak > 0.0 {
            let drawdown = (self.peak - self.balance) / self.peak;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }
    }

    fn record_trade(&mut self, trade: &'a TradeEntry) {
        let pnl = finite(trade.pnl_usd);
        let rr = finite(trade.risk_reward);
        self.total_pnl += pnl;

        if pnl > 0.0 {
            self.wins += 1;
            self.gross_win += pnl;
            self.win_streak += 1;
            self.loss_streak = 0;
            if rr > 0.0 {
                self.winner_rr_sum += rr;
                self.winner_rr_count += 1;
            }
        } else if pnl < 0.0 {
            self.losses += 1;
            self.gross_loss += pnl.abs();
            self.loss_streak += 1;
            self.win_streak = 0;
        } else {
            self.win_streak = 0;
            self.loss_streak = 0;
        }
        self.max_win_streak = self.max_win_streak.max(self.win_streak);
        self.max_loss_streak = self.max_loss_streak.max(self.loss_streak);

        if rr != 0.0 {
            if self.best.map_or(true, |b| rr > finite(b.risk_reward)) {
                self.best = Some(trade);
            }
            if self.worst.map_or(true, |w| rr < finite(w.risk_reward)) {
                self.worst = Some(trade);
            }
        }

        self.best_roe = self.best_roe.max(finite(trade.pnl_percent));

        let idx = match self.instrument_index.get(trade.instrument.as_str()) {
            Some(&idx) => idx,
            None => {
                self.instruments.push(InstrumentStats::new(&trade.instrument));
                let idx = self.instruments.len() - 1;
                self.instrument_index.insert(trade.instrument.as_str(), idx);
                idx
            }
        };
        let inst = &mut self.instruments[idx];
        inst.count += 1;
        inst.pnl += pnl;

        let bucket = self.directions.get_mut(trade.direction);
        bucket.pnl += pnl;

        if pnl > 0.0 {
            inst.wins += 1;
            bucket.wins += 1;
        } else if pnl < 0.0 {
            inst.losses += 1;
            bucket.losses += 1;
        }
    }

    fn finish(self) -> PerformanceAnalytics {
        let avg_win = if self.wins > 0 {
            self.gross_win / self.wins as f64
        } else {
            0.0
        };
        let avg_loss = if self.losses > 0 {
            self.gross_loss / self.losses as f64
        } else {
            0.0
        };

        let profit_factor = if self.gross_loss > 0.0 {
            self.gross_win / self.gross_loss
        } else if self.wins > 0 {
            PROFIT_FACTOR_CAP
        } else {
            0.0
        };

        let reward_to_risk_ratio = if avg_loss > 0.0 {
            avg_win / avg_loss
        } else if avg_win > 0.0 {
            PROFIT_FACTOR_CAP
        } else {
            0.0
        };

        let average_rr = if self.winner_rr_count > 0 {
            self.winner_rr_sum / self.winner_rr_count as f64
        } else {
            0.0
        };

        let mut instrument_stats = self.instruments;
        for inst in instrument_stats.iter_mut() {
            inst.win_rate = win_rate(inst.wins, inst.losses);
        }
        instrument_stats.sort_by(|a, b| b.pnl.total_cmp(&a.pnl));

        let mut direction_stats = self.directions;
        for bucket in [&mut direction_stats.long, &mut direction_stats.short] {
            bucket.win_rate = win_rate(bucket.wins, bucket.losses);
        }

        PerformanceAnalytics {
            win_rate: win_rate(self.wins, self.losses),
            average_rr,
            profit_factor,
            reward_to_risk_ratio,
            total_trades: self.wins + self.losses,
            avg_win,
            avg_loss,
            total_pnl: self.total_pnl,
            max_win_streak: self.max_win_streak,
            max_loss_streak: self.max_loss_streak,
            best_trade: self.best.cloned(),
            worst_trade: self.worst.cloned(),
            best_roe: self.best_roe,
            max_drawdown: self.max_drawdown.min(1.0),
            instrument_stats,
            direction_stats,
        }
    }
}
