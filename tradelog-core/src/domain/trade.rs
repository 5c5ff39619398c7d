//! TradeRecord — one journaled position entry with a derived outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Whether a trade is still open or has been closed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenState {
    Open,
    Closed,
}

/// Direction of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Long,
    Short,
}

/// Derived classification of a trade's return sign.
///
/// Never independently authored: [`Outcome::from_return`] is the only way
/// a value is assigned, at editor commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Win,
    Loss,
    NotApplicable,
}

impl Outcome {
    /// Win iff the signed return is positive, Loss iff negative, otherwise
    /// NotApplicable (breakeven or still open).
    pub fn from_return(return_amount: f64) -> Self {
        if return_amount > 0.0 {
            Outcome::Win
        } else if return_amount < 0.0 {
            Outcome::Loss
        } else {
            Outcome::NotApplicable
        }
    }
}

/// One journal entry: entry/exit prices, size, side, and the signed return.
///
/// `return_amount` is author-entered, not derived from entry/exit/size/side.
/// The identity `return ≈ (exit - entry) * size * sign(side)` is deliberately
/// not enforced; see the commit path in `tradelog-journal`, which logs
/// divergence but never blocks on it.
///
/// Owned exclusively by the trade store. The row editor works on a copy and
/// replaces the store's entry only on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// Assigned at creation, never reused.
    pub id: EntityId,
    pub open_state: OpenState,
    pub outcome: Outcome,
    pub date_opened: NaiveDate,
    /// Absent while the trade is open (not hard-enforced).
    pub date_closed: Option<NaiveDate>,
    /// Non-empty, upper-cased at commit.
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: u32,
    pub side: Side,
    /// Signed dollar return, author-entered.
    pub return_amount: f64,
    /// Ordered set of principle ids, 0..=10. Weak references: a deleted
    /// principle leaves its id dangling here.
    pub principle_refs: Vec<EntityId>,
    /// Ordered set of uncorrelated-asset ids, 0..=20.
    pub asset_refs: Vec<EntityId>,
}

impl TradeRecord {
    pub fn is_closed(&self) -> bool {
        self.open_state == OpenState::Closed
    }

    /// Closed with a decided outcome — the subset the statistics engine and
    /// the equity curve fold over.
    pub fn counts_for_stats(&self) -> bool {
        self.is_closed() && matches!(self.outcome, Outcome::Win | Outcome::Loss)
    }

    /// The return implied by prices alone. Used only to log divergence from
    /// the authored `return_amount`; never substituted for it.
    pub fn price_implied_return(&self) -> f64 {
        let sign = match self.side {
            Side::Long => 1.0,
            Side::Short => -1.0,
        };
        (self.exit_price - self.entry_price) * self.size as f64 * sign
    }
}
