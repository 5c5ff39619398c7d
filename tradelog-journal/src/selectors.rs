//! TaxonomySelector — bounded multi-select over a reference list.
//!
//! Ephemeral UI state: serialized into the trade record only at commit time,
//! cleared on both commit and cancel. The cap is a hard ceiling, not a soft
//! warning; toggling at the cap is a no-op.

use tracing::warn;

use tradelog_core::domain::EntityId;

pub const MAX_PRINCIPLE_REFS: usize = 10;
pub const MAX_ASSET_REFS: usize = 20;

#[derive(Debug, Clone)]
pub struct TaxonomySelector {
    /// Selection order is preserved; it becomes the order of the refs on
    /// the committed record.
    selected: Vec<EntityId>,
    max: usize,
    /// For log context only.
    label: &'static str,
}

impl TaxonomySelector {
    pub fn principles() -> Self {
        Self {
            selected: Vec::new(),
            max: MAX_PRINCIPLE_REFS,
            label: "principles",
        }
    }

    pub fn assets() -> Self {
        Self {
            selected: Vec::new(),
            max: MAX_ASSET_REFS,
            label: "assets",
        }
    }

    /// Deselect if selected; select if under the cap; no-op at the cap.
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if let Some(index) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(index);
            return false;
        }
        if self.selected.len() >= self.max {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Re-apply a previously saved selection. Ids with no matching reference
    /// entry are skipped with a warning; the restore itself never fails.
    pub fn restore<F>(&mut self, ids: &[EntityId], known: F)
    where
        F: Fn(EntityId) -> bool,
    {
        self.selected.clear();
        for &id in ids {
            if !known(id) {
                warn!(taxonomy = self.label, id, "skipping unknown reference id during restore");
                continue;
            }
            if self.selected.len() >= self.max {
                warn!(taxonomy = self.label, id, "selection cap reached during restore");
                break;
            }
            self.selected.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.selected.contains(&id)
    }

    pub fn at_cap(&self) -> bool {
        self.selected.len() >= self.max
    }

    pub fn selected(&self) -> &[EntityId] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selects_and_deselects() {
        let mut sel = TaxonomySelector::principles();
        assert!(sel.toggle(3));
        assert!(sel.is_selected(3));
        assert!(!sel.toggle(3));
        assert!(!sel.is_selected(3));
    }

    #[test]
    fn cap_is_a_hard_ceiling() {
        // Cap reached at ten principles; the 11th toggle is a no-op.
        let mut sel = TaxonomySelector::principles();
        for id in 1..=10 {
            assert!(sel.toggle(id));
        }
        assert!(sel.at_cap());
        assert!(!sel.toggle(11));
        assert_eq!(sel.len(), 10);
        assert!(!sel.is_selected(11));

        // Deselecting frees a slot again.
        sel.toggle(1);
        assert!(sel.toggle(11));
    }

    #[test]
    fn asset_cap_is_twenty() {
        let mut sel = TaxonomySelector::assets();
        for id in 1..=20 {
            assert!(sel.toggle(id));
        }
        assert!(!sel.toggle(21));
        assert_eq!(sel.len(), 20);
    }

    #[test]
    fn selection_order_is_preserved() {
        let mut sel = TaxonomySelector::principles();
        sel.toggle(5);
        sel.toggle(2);
        sel.toggle(9);
        assert_eq!(sel.selected(), &[5, 2, 9]);
    }

    #[test]
    fn restore_skips_unknown_ids() {
        let mut sel = TaxonomySelector::principles();
        sel.toggle(1);
        sel.restore(&[4, 99, 7], |id| id < 50);
        assert_eq!(sel.selected(), &[4, 7]);
    }

    #[test]
    fn restore_replaces_prior_selection() {
        let mut sel = TaxonomySelector::assets();
        sel.toggle(1);
        sel.toggle(2);
        sel.restore(&[8], |_| true);
        assert_eq!(sel.selected(), &[8]);
    }
}
