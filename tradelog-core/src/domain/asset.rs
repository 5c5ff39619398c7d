//! UncorrelatedAsset — the static hedge/diversification catalog.
//!
//! Read-only reference data: trades point into it by id, the user never
//! creates or edits entries.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncorrelatedAsset {
    pub id: EntityId,
    pub display_name: String,
    pub category: String,
}

/// The built-in catalog. Ids are stable across releases; new entries are
/// appended, existing ids never renumbered.
pub fn default_catalog() -> Vec<UncorrelatedAsset> {
    fn entry(id: EntityId, display_name: &str, category: &str) -> UncorrelatedAsset {
        UncorrelatedAsset {
            id,
            display_name: display_name.into(),
            category: category.into(),
        }
    }

    vec![
        entry(1, "Gold", "Precious Metals"),
        entry(2, "Silver", "Precious Metals"),
        entry(3, "Platinum", "Precious Metals"),
        entry(4, "US 10Y Treasury", "Sovereign Bonds"),
        entry(5, "US 30Y Treasury", "Sovereign Bonds"),
        entry(6, "German Bund", "Sovereign Bonds"),
        entry(7, "Japanese JGB", "Sovereign Bonds"),
        entry(8, "UK Gilt", "Sovereign Bonds"),
        entry(9, "TIPS", "Inflation-Linked"),
        entry(10, "Swiss Franc", "Currencies"),
        entry(11, "Japanese Yen", "Currencies"),
        entry(12, "US Dollar Index", "Currencies"),
        entry(13, "Crude Oil", "Commodities"),
        entry(14, "Natural Gas", "Commodities"),
        entry(15, "Copper", "Commodities"),
        entry(16, "Corn", "Agriculture"),
        entry(17, "Wheat", "Agriculture"),
        entry(18, "Soybeans", "Agriculture"),
        entry(19, "Coffee", "Agriculture"),
        entry(20, "Sugar", "Agriculture"),
        entry(21, "REIT Index", "Real Assets"),
        entry(22, "Farmland Index", "Real Assets"),
        entry(23, "Timberland Index", "Real Assets"),
        entry(24, "Infrastructure Index", "Real Assets"),
        entry(25, "VIX Futures", "Volatility"),
        entry(26, "Tail-Risk Hedge", "Volatility"),
        entry(27, "Managed Futures Index", "Alternatives"),
        entry(28, "Global Macro Index", "Alternatives"),
        entry(29, "Merger Arbitrage Index", "Alternatives"),
        entry(30, "Cat Bond Index", "Alternatives"),
    ]
}
