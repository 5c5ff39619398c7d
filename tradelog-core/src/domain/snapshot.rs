//! JournalSnapshot — the persisted unit, one per named journal.

use serde::{Deserialize, Serialize};

use super::TradeRecord;

/// Full trade ledger for one journal key (e.g. one fund).
///
/// `trades` is display order: reverse-chronological insertion, most recent
/// trade first. The statistics engine and the equity-curve renderer require
/// chronological order and must go through [`JournalSnapshot::chronological`]
/// (or reverse explicitly) before folding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalSnapshot {
    pub journal_key: String,
    pub trades: Vec<TradeRecord>,
}

impl JournalSnapshot {
    pub fn new(journal_key: impl Into<String>, trades: Vec<TradeRecord>) -> Self {
        Self {
            journal_key: journal_key.into(),
            trades,
        }
    }

    /// Oldest-first view of the ledger.
    pub fn chronological(&self) -> impl Iterator<Item = &TradeRecord> {
        self.trades.iter().rev()
    }
}
