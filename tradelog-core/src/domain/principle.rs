//! PrincipleEntry — a user-authored investing or economic maxim.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EntityId;

/// The two authoring categories. Each numbers its entries independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipleCategory {
    Economic,
    Investing,
}

impl PrincipleCategory {
    /// Numbering prefix: Economic principles are "1.N", Investing are "2.N".
    pub fn sequence_prefix(self) -> u32 {
        match self {
            PrincipleCategory::Economic => 1,
            PrincipleCategory::Investing => 2,
        }
    }
}

impl fmt::Display for PrincipleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipleCategory::Economic => write!(f, "Economic"),
            PrincipleCategory::Investing => write!(f, "Investing"),
        }
    }
}

impl std::str::FromStr for PrincipleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Economic" | "economic" => Ok(PrincipleCategory::Economic),
            "Investing" | "investing" => Ok(PrincipleCategory::Investing),
            other => Err(format!("unknown principle category '{other}'")),
        }
    }
}

/// A persisted principle. Trades reference these by id only; deleting a
/// principle does not cascade to trade `principle_refs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipleEntry {
    pub id: EntityId,
    /// Display number like "1.3" (category prefix + 1-based position).
    pub sequence_number: String,
    pub category: PrincipleCategory,
    pub text: String,
}

impl PrincipleEntry {
    /// Build the sequence number for the Nth entry (1-based) in a category.
    pub fn sequence_number_for(category: PrincipleCategory, position: usize) -> String {
        format!("{}.{}", category.sequence_prefix(), position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_follow_category_prefix() {
        assert_eq!(
            PrincipleEntry::sequence_number_for(PrincipleCategory::Economic, 3),
            "1.3"
        );
        assert_eq!(
            PrincipleEntry::sequence_number_for(PrincipleCategory::Investing, 1),
            "2.1"
        );
    }

    #[test]
    fn category_parses_from_display() {
        let cat: PrincipleCategory = "Investing".parse().unwrap();
        assert_eq!(cat, PrincipleCategory::Investing);
        assert!("Speculative".parse::<PrincipleCategory>().is_err());
    }
}
