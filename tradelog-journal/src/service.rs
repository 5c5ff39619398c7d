//! Journal facade — wires store, editor, selectors, gateway, and config
//! into the commit path.
//!
//! Data flow per the system design: editor commit → validated record →
//! store → write-through save → statistics recompute. Statistics and the
//! equity curve are pure reads over current store state and can be called
//! any number of times with identical results.

use std::collections::HashSet;
use std::path::Path;

use chrono::Local;

use tradelog_core::config::JournalConfig;
use tradelog_core::curve::{self, EquityCurve};
use tradelog_core::domain::{default_catalog, EntityId, TradeRecord, UncorrelatedAsset};
use tradelog_core::stats::JournalStats;

use crate::editor::{EditorError, RowEditor, TradeDraft};
use crate::gateway::{FileGateway, PersistenceError};
use crate::selectors::TaxonomySelector;
use crate::store::TradeStore;

/// Result of a successful commit.
///
/// `persisted` distinguishes "saved" from "edited but not durably saved":
/// a persistence failure does not roll back the in-memory store (the user's
/// edit must not be lost), but the caller has to surface it.
#[derive(Debug)]
pub struct CommitOutcome {
    pub record: TradeRecord,
    pub created: bool,
    pub persisted: Result<(), PersistenceError>,
    pub stats: JournalStats,
}

pub struct Journal {
    key: String,
    config: JournalConfig,
    store: TradeStore,
    editor: RowEditor,
    principle_sel: TaxonomySelector,
    asset_sel: TaxonomySelector,
    gateway: FileGateway,
    catalog: Vec<UncorrelatedAsset>,
    /// Ids of principles known to exist, fed in by the caller after a
    /// backend refresh. `None` means no refresh has happened yet and every
    /// saved ref is kept; filtering only starts once a real set is supplied.
    known_principles: Option<HashSet<EntityId>>,
}

impl Journal {
    /// Open a journal: hydrate the store from the gateway (empty if the key
    /// has never been saved).
    pub fn open(
        key: impl Into<String>,
        data_dir: &Path,
        config: JournalConfig,
    ) -> Result<Self, PersistenceError> {
        let key = key.into();
        let gateway = FileGateway::new(data_dir);
        let mut store = TradeStore::new();
        store.hydrate(gateway.load_journal(&key)?);

        Ok(Self {
            key,
            config,
            store,
            editor: RowEditor::new(),
            principle_sel: TaxonomySelector::principles(),
            asset_sel: TaxonomySelector::assets(),
            gateway,
            catalog: default_catalog(),
            known_principles: None,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn trades(&self) -> &[TradeRecord] {
        self.store.trades()
    }

    pub fn catalog(&self) -> &[UncorrelatedAsset] {
        &self.catalog
    }

    pub fn set_known_principles(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.known_principles = Some(ids.into_iter().collect());
    }

    // ── Edit session ──

    pub fn begin_create(&mut self) -> Result<(), EditorError> {
        self.editor.begin_create(Local::now().date_naive())
    }

    /// Begin editing an existing trade and restore its saved taxonomy
    /// selections. Unknown refs (deleted principles) are skipped, not fatal.
    pub fn begin_edit(&mut self, id: EntityId) -> Result<(), EditorError> {
        let record = self
            .store
            .get(id)
            .ok_or(EditorError::UnknownTrade(id))?
            .clone();
        let refs = self.editor.begin_edit(&record)?;

        let known = &self.known_principles;
        self.principle_sel.restore(&refs.principle_refs, |id| {
            known.as_ref().map_or(true, |k| k.contains(&id))
        });
        let catalog = &self.catalog;
        self.asset_sel
            .restore(&refs.asset_refs, |id| catalog.iter().any(|a| a.id == id));
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Option<&mut TradeDraft> {
        self.editor.draft_mut()
    }

    pub fn toggle_principle(&mut self, id: EntityId) -> bool {
        self.principle_sel.toggle(id)
    }

    pub fn toggle_asset(&mut self, id: EntityId) -> bool {
        self.asset_sel.toggle(id)
    }

    pub fn principle_selection(&self) -> &[EntityId] {
        self.principle_sel.selected()
    }

    pub fn asset_selection(&self) -> &[EntityId] {
        self.asset_sel.selected()
    }

    /// Commit the open session: exactly one store mutation on success, zero
    /// on failure. Selector state is serialized onto the record and cleared.
    pub fn commit(&mut self) -> Result<CommitOutcome, EditorError> {
        let store = &mut self.store;
        let commit = self.editor.commit(|| store.allocate_id())?;

        let mut record = commit.record;
        record.principle_refs = self.principle_sel.selected().to_vec();
        record.asset_refs = self.asset_sel.selected().to_vec();
        self.principle_sel.clear();
        self.asset_sel.clear();

        if commit.created {
            self.store.insert(record.clone());
        } else if !self.store.replace(record.clone()) {
            // Record was deleted while the session was open; treat the
            // commit as a re-insert rather than dropping the user's work.
            self.store.insert(record.clone());
        }

        let persisted = self.gateway.save_journal(&self.key, self.store.trades());
        let stats = self.stats();

        Ok(CommitOutcome {
            record,
            created: commit.created,
            persisted,
            stats,
        })
    }

    /// Abort the open session: working copy discarded, selectors cleared,
    /// no store mutation. Safe to call with no session open (escape key).
    pub fn cancel(&mut self) {
        self.editor.cancel();
        self.principle_sel.clear();
        self.asset_sel.clear();
    }

    // ── Ledger maintenance ──

    pub fn remove(&mut self, id: EntityId) -> Option<Result<(), PersistenceError>> {
        self.store.remove(id)?;
        Some(self.gateway.save_journal(&self.key, self.store.trades()))
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.clear();
        self.gateway.save_journal(&self.key, self.store.trades())
    }

    // ── Pure reads ──

    pub fn stats(&self) -> JournalStats {
        JournalStats::compute(self.store.trades(), self.config.starting_capital)
    }

    pub fn curve(&self) -> EquityCurve {
        curve::render(
            self.store.trades(),
            self.config.starting_capital,
            &self.config.canvas,
        )
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }
}
