use std::fmt::Write;

use crate::analytics::types::{AnalyticsResult, PerformanceAnalytics};
use crate::models::TradeEntry;

pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10000.0).round() / 10000.0
}

fn rounded_trade(t: &TradeEntry) -> TradeEntry {
    TradeEntry {
        pnl_usd: round2(t.pnl_usd),
        pnl_percent: round1(t.pnl_percent),
        risk_reward: round2(t.risk_reward),
        ..t.clone()
    }
}

impl PerformanceAnalytics {
    /// Display copy: money and ratios to 2 places, percentages to 1.
    /// Drawdown stays a fraction, kept to 4 places.
    pub fn rounded(&self) -> Self {
        let mut r = self.clone();
        r.win_rate = round1(self.win_rate);
        r.average_rr = round2(self.average_rr);
        r.profit_factor = round2(self.profit_factor);
        r.reward_to_risk_ratio = round2(self.reward_to_risk_ratio);
        r.avg_win = round2(self.avg_win);
        r.avg_loss = round2(self.avg_loss);
        r.total_pnl = round2(self.total_pnl);
        r.best_roe = round1(self.best_roe);
        r.max_drawdown = round4(self.max_drawdown);
        r.best_trade = self.best_trade.as_ref().map(rounded_trade);
        r.worst_trade = self.worst_trade.as_ref().map(rounded_trade);

        for inst in r.instrument_stats.iter_mut() {
            inst.pnl = round2(inst.pnl);
            inst.win_rate = round1(inst.win_rate);
        }
        for bucket in [&mut r.direction_stats.long, &mut r.direction_stats.short] {
            bucket.pnl = round2(bucket.pnl);
            bucket.win_rate = round1(bucket.win_rate);
        }
        r
    }

    pub fn has_data(&self) -> bool {
        self.total_trades > 0
    }

    /// One-paragraph summary handed to the journal assistant as context.
    pub fn assistant_context(&self) -> String {
        if !self.has_data() {
            return "No closed trades yet; not enough data for a performance summary.".to_string();
        }

        let mut out = format!(
            "Trading performance: {} closed trades, win rate {:.1}%, total PnL ${:.2}, \
             profit factor {:.2}, average R:R {:.2}, reward/risk {:.2}, \
             avg win ${:.2}, avg loss ${:.2}, max drawdown {:.1}%, best ROE {:.1}%, \
             longest streaks {}W / {}L.",
            self.total_trades,
            self.win_rate,
            self.total_pnl,
            self.profit_factor,
            self.average_rr,
            self.reward_to_risk_ratio,
            self.avg_win,
            self.avg_loss,
            self.max_drawdown * 100.0,
            self.best_roe,
            self.max_win_streak,
            self.max_loss_streak,
        );

        if let Some(top) = self.instrument_stats.first() {
            let _ = write!(
                out,
                " Top instrument: {} (${:.2} over {} trades, {:.1}% WR).",
                top.instrument, top.pnl, top.count, top.win_rate
            );
        }
        if self.instrument_stats.len() > 1 {
            if let Some(bottom) = self.instrument_stats.last() {
                let _ = write!(
                    out,
                    " Weakest instrument: {} (${:.2}).",
                    bottom.instrument, bottom.pnl
                );
            }
        }

        let d = &self.direction_stats;
        let _ = write!(
            out,
            " Longs: {:.1}% WR, ${:.2}. Shorts: {:.1}% WR, ${:.2}.",
            d.long.win_rate, d.long.pnl, d.short.win_rate, d.short.pnl
        );
        out
    }
}

impl AnalyticsResult {
    pub fn rounded(&self) -> Self {
        let mut r = self.clone();
        r.analytics = self.analytics.rounded();
        for point in r.equity_curve.iter_mut() {
            point.balance = round2(point.balance);
            point.pnl = round2(point.pnl);
        }
        r
    }

    pub fn format_summary(&self) -> String {
        let a = &self.analytics;
        let mut s = String::new();
        let rule = "─".repeat(35);

        let _ = writeln!(s, "{}", "=".repeat(70));
        let _ = writeln!(s, "  PERFORMANCE ANALYTICS");
        let _ = writeln!(s, "{}", "=".repeat(70));

        if !a.has_data() {
            let _ = writeln!(s, "  Not enough data: no closed winning or losing trades.");
            let _ = writeln!(s, "  Balance:     ${:.2}", self.final_balance());
            let _ = writeln!(s, "{}", "=".repeat(70));
            return s;
        }

        if let (Some(first), Some(last)) = (self.equity_curve.first(), self.equity_curve.last()) {
            let _ = writeln!(
                s,
                "  Period:      {} to {} ({} ledger entries)",
                first.timestamp.format("%Y-%m-%d"),
                last.timestamp.format("%Y-%m-%d"),
                self.equity_curve.len() - 1
            );
            let _ = writeln!(s);
            let _ = writeln!(s, "  BALANCE");
            let _ = writeln!(s, "  {}", rule);
            let _ = writeln!(s, "  Initial:     ${:.2}", first.balance);
            let _ = writeln!(s, "  Final:       ${:.2}", last.balance);
            let _ = writeln!(s, "  Trade PnL:   ${:+.2}", a.total_pnl);
        }

        let _ = writeln!(s);
        let _ = writeln!(s, "  TRADES");
        let _ = writeln!(s, "  {}", rule);
        let _ = writeln!(s, "  Total:       {}", a.total_trades);
        let _ = writeln!(s, "  Win Rate:    {:.1}%", a.win_rate);
        let _ = writeln!(s, "  Avg Win:     ${:.2}", a.avg_win);
        let _ = writeln!(s, "  Avg Loss:    ${:.2}", a.avg_loss);
        let _ = writeln!(s, "  Profit Factor: {:.2}", a.profit_factor);
        let _ = writeln!(s, "  Reward/Risk: {:.2}", a.reward_to_risk_ratio);
        let _ = writeln!(s, "  Avg R:R:     {:.2}", a.average_rr);
        let _ = writeln!(s, "  Best ROE:    {:.1}%", a.best_roe);
        let _ = writeln!(
            s,
            "  Streaks:     {} wins / {} losses",
            a.max_win_streak, a.max_loss_streak
        );
        if let Some(best) = &a.best_trade {
            let _ = writeln!(
                s,
                "  Best:        {} {} R:R {:.2} (${:+.2})",
                best.instrument, best.direction, best.risk_reward, best.pnl_usd
            );
        }
        if let Some(worst) = &a.worst_trade {
            let _ = writeln!(
                s,
                "  Worst:       {} {} R:R {:.2} (${:+.2})",
                worst.instrument, worst.direction, worst.risk_reward, worst.pnl_usd
            );
        }

        let _ = writeln!(s);
        let _ = writeln!(s, "  RISK");
        let _ = writeln!(s, "  {}", rule);
        let _ = writeln!(s, "  Max DD:      {:.2}%", a.max_drawdown * 100.0);

        if !a.instrument_stats.is_empty() {
            let _ = writeln!(s);
            let _ = writeln!(s, "  BY INSTRUMENT");
            let _ = writeln!(s, "  {}", rule);
            for inst in &a.instrument_stats {
                let _ = writeln!(
                    s,
                    "  {:>12}: {} trades | WR {:.0}% | PnL ${:+.2}",
                    inst.instrument, inst.count, inst.win_rate, inst.pnl
                );
            }
        }

        let _ = writeln!(s);
        let _ = writeln!(s, "  BY DIRECTION");
        let _ = writeln!(s, "  {}", rule);
        for (name, bucket) in [("Long", &a.direction_stats.long), ("Short", &a.direction_stats.short)] {
            let _ = writeln!(
                s,
                "  {:>12}: {}W / {}L | WR {:.0}% | PnL ${:+.2}",
                name, bucket.wins, bucket.losses, bucket.win_rate, bucket.pnl
            );
        }

        let _ = writeln!(s, "{}", "=".repeat(70));
        s
    }

    pub fn print_summary(&self) {
        print!("\n{}", self.format_summary());
    }
}
