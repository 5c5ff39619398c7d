//! TradeStore — ordered in-memory ledger, single source of truth.
//!
//! Display order: most recent trade first. New records are inserted at the
//! front; the chronological view for statistics and rendering is obtained by
//! reversing (see `JournalSnapshot::chronological`).

use tradelog_core::domain::{EntityId, TradeRecord};

#[derive(Debug, Default)]
pub struct TradeStore {
    trades: Vec<TradeRecord>,
    /// Monotonic watermark. Never decremented, so ids are never reused even
    /// after deletes or a bulk clear.
    next_id: EntityId,
}

impl TradeStore {
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            next_id: 1,
        }
    }

    /// Replace the ledger with loaded records and re-seed the id watermark
    /// past the highest existing id.
    pub fn hydrate(&mut self, trades: Vec<TradeRecord>) {
        let max_id = trades.iter().map(|t| t.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.trades = trades;
    }

    /// Allocate the next trade id. Burned ids (e.g. a cancelled create) are
    /// acceptable; uniqueness matters, density does not.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a newly created record at the front (display order).
    pub fn insert(&mut self, record: TradeRecord) {
        self.trades.insert(0, record);
    }

    /// Replace an existing record in place. Returns false if the id is gone
    /// (e.g. deleted while an edit session was open).
    pub fn replace(&mut self, record: TradeRecord) -> bool {
        match self.trades.iter_mut().find(|t| t.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<TradeRecord> {
        let index = self.trades.iter().position(|t| t.id == id)?;
        Some(self.trades.remove(index))
    }

    pub fn clear(&mut self) {
        self.trades.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&TradeRecord> {
        self.trades.iter().find(|t| t.id == id)
    }

    /// Display-order slice (newest first).
    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tradelog_core::domain::{OpenState, Outcome, Side};

    fn record(id: EntityId) -> TradeRecord {
        TradeRecord {
            id,
            open_state: OpenState::Open,
            outcome: Outcome::NotApplicable,
            date_opened: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            date_closed: None,
            symbol: "IWM".into(),
            entry_price: 200.0,
            exit_price: 201.0,
            size: 5,
            side: Side::Long,
            return_amount: 0.0,
            principle_refs: Vec::new(),
            asset_refs: Vec::new(),
        }
    }

    #[test]
    fn insert_puts_newest_first() {
        let mut store = TradeStore::new();
        store.insert(record(1));
        store.insert(record(2));
        let ids: Vec<_> = store.trades().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = TradeStore::new();
        let a = store.allocate_id();
        let b = store.allocate_id();
        assert_ne!(a, b);

        store.insert(record(a));
        store.insert(record(b));
        store.remove(b);
        store.clear();
        assert!(store.allocate_id() > b);
    }

    #[test]
    fn hydrate_seeds_watermark_past_loaded_ids() {
        let mut store = TradeStore::new();
        store.hydrate(vec![record(41), record(7)]);
        assert_eq!(store.allocate_id(), 42);
    }

    #[test]
    fn replace_missing_id_reports_false() {
        let mut store = TradeStore::new();
        store.insert(record(1));
        assert!(store.replace(record(1)));
        assert!(!store.replace(record(99)));
    }
}
