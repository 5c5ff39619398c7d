//! Domain types for the trading journal.

pub mod asset;
pub mod principle;
pub mod snapshot;
pub mod trade;

pub use asset::{default_catalog, UncorrelatedAsset};
pub use principle::{PrincipleCategory, PrincipleEntry};
pub use snapshot::JournalSnapshot;
pub use trade::{OpenState, Outcome, Side, TradeRecord};

/// Stable identifier for trades, principles, and catalog assets.
pub type EntityId = u64;
