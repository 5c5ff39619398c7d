//! Statistics engine — pure functions that fold the ledger into summary metrics.
//!
//! Every metric is a pure function of the trade list plus the externally
//! supplied starting capital. Nothing here mutates the store; results are
//! recomputed from scratch on every call (ledgers are tens to low hundreds
//! of trades, so incremental update buys nothing).

use serde::{Deserialize, Serialize};

use crate::domain::{Outcome, TradeRecord};

/// Aggregate journal metrics for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalStats {
    /// All records regardless of state.
    pub total_trades: usize,
    /// Records with `openState = CLOSED`.
    pub closed_trades: usize,
    /// Closed records with a decided (WIN/LOSS) outcome.
    pub valid_trades: usize,
    pub win_count: usize,
    pub loss_count: usize,
    /// Σ returnAmount over valid trades.
    pub total_return: f64,
    /// winCount / validTrades, 0 when there are no valid trades.
    pub win_rate: f64,
    /// totalReturn / validTrades, 0 when there are no valid trades.
    pub avg_return: f64,
    /// Σ returnAmount where outcome = WIN (all positive).
    pub total_win_dollars: f64,
    /// Σ |returnAmount| where outcome = LOSS (magnitude).
    pub total_loss_dollars: f64,
    /// Average win / average loss; 0 when either side has no trades.
    pub r_multiple: f64,
    /// totalReturn / startingCapital * 100.
    pub return_percent: f64,
    pub starting_capital: f64,
    pub current_capital: f64,
}

impl JournalStats {
    /// Compute all metrics. Order of `trades` does not matter; every metric
    /// is a sum or count.
    pub fn compute(trades: &[TradeRecord], starting_capital: f64) -> Self {
        let total_trades = trades.len();
        let closed_trades = trades.iter().filter(|t| t.is_closed()).count();

        let valid: Vec<&TradeRecord> = trades.iter().filter(|t| t.counts_for_stats()).collect();
        let valid_trades = valid.len();

        let win_count = valid.iter().filter(|t| t.outcome == Outcome::Win).count();
        let loss_count = valid.iter().filter(|t| t.outcome == Outcome::Loss).count();

        let total_return: f64 = valid.iter().map(|t| t.return_amount).sum();
        let total_win_dollars: f64 = valid
            .iter()
            .filter(|t| t.outcome == Outcome::Win)
            .map(|t| t.return_amount)
            .sum();
        let total_loss_dollars: f64 = valid
            .iter()
            .filter(|t| t.outcome == Outcome::Loss)
            .map(|t| t.return_amount.abs())
            .sum();

        let win_rate = if valid_trades > 0 {
            win_count as f64 / valid_trades as f64
        } else {
            0.0
        };
        let avg_return = if valid_trades > 0 {
            total_return / valid_trades as f64
        } else {
            0.0
        };

        let r_multiple = r_multiple(total_win_dollars, win_count, total_loss_dollars, loss_count);

        let return_percent = if starting_capital != 0.0 {
            total_return / starting_capital * 100.0
        } else {
            0.0
        };

        Self {
            total_trades,
            closed_trades,
            valid_trades,
            win_count,
            loss_count,
            total_return,
            win_rate,
            avg_return,
            total_win_dollars,
            total_loss_dollars,
            r_multiple,
            return_percent,
            starting_capital,
            current_capital: starting_capital + total_return,
        }
    }
}

/// Average winning dollars over average losing dollars.
///
/// Defined as 0 (not an error) when either side has no trades: a journal
/// with only winners has no meaningful loss denominator.
pub fn r_multiple(
    total_win_dollars: f64,
    win_count: usize,
    total_loss_dollars: f64,
    loss_count: usize,
) -> f64 {
    if win_count == 0 || loss_count == 0 {
        return 0.0;
    }
    let avg_win = total_win_dollars / win_count as f64;
    let avg_loss = total_loss_dollars / loss_count as f64;
    if avg_loss < 1e-12 {
        return 0.0;
    }
    avg_win / avg_loss
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OpenState, Side};
    use chrono::NaiveDate;

    fn closed_trade(id: u64, return_amount: f64) -> TradeRecord {
        TradeRecord {
            id,
            open_state: OpenState::Closed,
            outcome: Outcome::from_return(return_amount),
            date_opened: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            date_closed: Some(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()),
            symbol: "SPY".into(),
            entry_price: 100.0,
            exit_price: 100.0 + return_amount / 10.0,
            size: 10,
            side: Side::Long,
            return_amount,
            principle_refs: Vec::new(),
            asset_refs: Vec::new(),
        }
    }

    fn open_trade(id: u64) -> TradeRecord {
        let mut trade = closed_trade(id, 0.0);
        trade.open_state = OpenState::Open;
        trade.date_closed = None;
        trade
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let stats = JournalStats::compute(&[], 100_000.0);
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.valid_trades, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.avg_return, 0.0);
        assert_eq!(stats.r_multiple, 0.0);
        assert_eq!(stats.current_capital, 100_000.0);
    }

    #[test]
    fn open_and_breakeven_excluded_from_valid() {
        let trades = vec![open_trade(1), closed_trade(2, 0.0), closed_trade(3, 50.0)];
        let stats = JournalStats::compute(&trades, 100_000.0);
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.closed_trades, 2);
        assert_eq!(stats.valid_trades, 1);
        assert_eq!(stats.win_count, 1);
        assert!((stats.total_return - 50.0).abs() < 1e-10);
    }

    #[test]
    fn single_winner_scenario() {
        // One closed winner at +100.
        let trades = vec![closed_trade(1, 100.0)];
        let stats = JournalStats::compute(&trades, 100_000.0);
        assert_eq!(stats.valid_trades, 1);
        assert_eq!(stats.win_count, 1);
        assert!((stats.win_rate - 1.0).abs() < 1e-10);
        assert!((stats.total_return - 100.0).abs() < 1e-10);
    }

    #[test]
    fn win_and_loss_scenario() {
        // One winner at +100 against one loser at -50.
        let trades = vec![closed_trade(1, 100.0), closed_trade(2, -50.0)];
        let stats = JournalStats::compute(&trades, 100_000.0);
        assert!((stats.win_rate - 0.5).abs() < 1e-10);
        assert!((stats.total_win_dollars - 100.0).abs() < 1e-10);
        assert!((stats.total_loss_dollars - 50.0).abs() < 1e-10);
        assert!((stats.r_multiple - 2.0).abs() < 1e-10);
        assert!((stats.avg_return - 25.0).abs() < 1e-10);
    }

    #[test]
    fn r_multiple_is_zero_without_both_sides() {
        let winners = vec![closed_trade(1, 100.0), closed_trade(2, 30.0)];
        assert_eq!(JournalStats::compute(&winners, 100_000.0).r_multiple, 0.0);

        let losers = vec![closed_trade(1, -100.0)];
        assert_eq!(JournalStats::compute(&losers, 100_000.0).r_multiple, 0.0);
    }

    #[test]
    fn capital_and_percent() {
        let trades = vec![closed_trade(1, 1_500.0), closed_trade(2, -500.0)];
        let stats = JournalStats::compute(&trades, 100_000.0);
        assert!((stats.current_capital - 101_000.0).abs() < 1e-10);
        assert!((stats.return_percent - 1.0).abs() < 1e-10);
    }

    #[test]
    fn recompute_is_deterministic() {
        let trades = vec![closed_trade(1, 100.0), closed_trade(2, -50.0), open_trade(3)];
        let a = JournalStats::compute(&trades, 100_000.0);
        let b = JournalStats::compute(&trades, 100_000.0);
        assert_eq!(a, b);
    }
}
