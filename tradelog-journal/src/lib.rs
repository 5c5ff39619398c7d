//! TradeLog Journal — the stateful layer of the trading journal.
//!
//! - Trade store: ordered in-memory ledger, single source of truth
//! - Row editor: one-session-at-a-time edit state machine
//! - Taxonomy selectors: bounded multi-select over principles and assets
//! - Persistence gateway: write/verify/retry-once JSON snapshots per journal
//! - Principle backend: remote CRUD behind a trait, with an optimistic local
//!   book that rolls back on failure
//! - Journal facade: wires the above into the commit path
//!
//! The store is mutated only through the editor commit path and explicit
//! remove/clear calls; statistics, curve rendering, and persistence are
//! read-only consumers.

pub mod editor;
pub mod export;
pub mod gateway;
pub mod principles;
pub mod selectors;
pub mod service;
pub mod store;

pub use editor::{EditorError, RowEditor, TradeDraft};
pub use gateway::{FileGateway, PersistenceError};
pub use principles::{HttpBackend, PrincipleBackend, PrincipleBook, RemoteError};
pub use selectors::TaxonomySelector;
pub use service::{CommitOutcome, Journal};
pub use store::TradeStore;
