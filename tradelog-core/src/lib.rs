//! TradeLog Core — domain types and pure computation for the trading journal.
//!
//! This crate contains everything that can be computed without touching disk
//! or network:
//! - Domain types (trade records, principles, the uncorrelated-asset catalog,
//!   journal snapshots)
//! - The statistics engine (win rate, R-multiple, capital curve totals)
//! - The equity-curve layout algorithm (adaptive spacing + amplitude scaling)
//! - Journal configuration (starting capital, canvas dimensions)
//!
//! Stateful concerns (the trade store, row editor, persistence gateway) live
//! in `tradelog-journal`.

pub mod config;
pub mod curve;
pub mod domain;
pub mod stats;
